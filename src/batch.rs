use crate::config::Config;
use crate::constants::PROGRESS_BAR_TEMPLATE;
use crate::error::{ImageRole, Result, StampError};
use crate::logger;
use crate::paths::{expand_target, resolve_output_path, Candidate};
use crate::processing::{stamp_image, CompositionOptions, SourceImage};
use crate::utils::format_file_size;
use crate::validation::validate_image;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// What a multi-file run reports when some files failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Print failures and still succeed, even if every file failed.
    #[default]
    Lenient,
    /// Process every file, then fail with `StampError::BatchFailed`.
    Strict,
}

/// How errors are handled, chosen once from the number of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Any error aborts the run.
    Single,
    /// Errors are printed and the run moves on to the next candidate.
    Multi,
}

impl RunMode {
    pub fn for_candidates(count: usize) -> Self {
        if count > 1 {
            RunMode::Multi
        } else {
            RunMode::Single
        }
    }
}

/// Shared flag set by a signal handler and checked between candidates.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying atomic, for registering with `signal_hook::flag`.
    pub fn as_atomic(&self) -> &Arc<AtomicBool> {
        &self.0
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Watermark applied to every file.
    pub watermark: PathBuf,
    /// Output suggestion, resolved per file.
    pub output: Option<PathBuf>,
    pub composition: CompositionOptions,
    pub policy: FailurePolicy,
}

impl BatchOptions {
    /// Options from the loaded config; an explicit watermark wins over the configured default.
    pub fn from_config(
        config: &Config,
        watermark: Option<PathBuf>,
        output: Option<PathBuf>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            watermark: watermark
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| config.watermark_img.clone()),
            output,
            composition: CompositionOptions::from(config),
            policy,
        }
    }
}

#[derive(Debug)]
pub enum BatchOutcome {
    Written {
        source: PathBuf,
        destination: PathBuf,
        bytes: u64,
    },
    Skipped {
        path: PathBuf,
    },
    Failed {
        path: PathBuf,
        error: StampError,
    },
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Failed { .. }))
    }

    pub fn bytes_written(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o {
                BatchOutcome::Written { bytes, .. } => *bytes,
                _ => 0,
            })
            .sum()
    }

    fn count(&self, pred: impl Fn(&BatchOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

pub struct BatchRunner {
    options: BatchOptions,
    cancel: CancelFlag,
}

impl BatchRunner {
    pub fn new(options: BatchOptions) -> Self {
        Self {
            options,
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Stamp every candidate under `target`.
    ///
    /// With a single candidate the first error is returned. With several,
    /// errors are printed and skipped, and the run succeeds unless the policy
    /// is [`FailurePolicy::Strict`].
    pub fn run(&self, target: &Path) -> Result<BatchReport> {
        let start_time = Instant::now();
        let candidates = expand_target(target)?;
        let mode = RunMode::for_candidates(candidates.len());

        verbose!(
            "{} candidate(s) in {} ({:?} mode)",
            candidates.len(),
            target.display(),
            mode
        );

        if candidates.is_empty() {
            warn!("No files found in {}", target.display());
            return Ok(BatchReport::default());
        }

        let progress = self.progress_bar(mode, candidates.len());
        let mut report = BatchReport::default();

        for candidate in &candidates {
            if self.cancel.is_cancelled() {
                progress.abandon_with_message("interrupted");
                return Err(StampError::Interrupted);
            }

            let outcome = match candidate {
                Candidate::Directory(path) => {
                    verbose!("Skipping directory {}", path.display());
                    BatchOutcome::Skipped { path: path.clone() }
                }
                Candidate::File(source) => match self.process_file(source) {
                    Ok((destination, bytes)) => {
                        progress.suspend(|| {
                            success!(
                                "Stamped {} -> {} ({})",
                                source.display(),
                                destination.display(),
                                format_file_size(bytes)
                            );
                        });
                        BatchOutcome::Written {
                            source: source.clone(),
                            destination,
                            bytes,
                        }
                    }
                    Err(e) if mode == RunMode::Single => return Err(e),
                    Err(e) => {
                        progress.suspend(|| {
                            error!("Failed to process {}:\n{}\n", source.display(), e);
                            let culprit = e.path().filter(|p| p.as_path() != source.as_path());
                            if let Some(culprit) = culprit {
                                verbose!("The failing file was {}", culprit.display());
                            }
                        });
                        BatchOutcome::Failed {
                            path: source.clone(),
                            error: e,
                        }
                    }
                },
            };

            report.outcomes.push(outcome);
            progress.inc(1);
        }

        progress.finish_and_clear();

        if mode == RunMode::Multi {
            print_summary(&report, start_time);
            if self.options.policy == FailurePolicy::Strict && report.failed() > 0 {
                return Err(StampError::BatchFailed {
                    failed: report.failed(),
                    total: report.failed() + report.written(),
                });
            }
        }

        Ok(report)
    }

    /// Sniff, resolve, decode, composite and write one file.
    fn process_file(&self, source: &Path) -> Result<(PathBuf, u64)> {
        let main_kind = validate_image(source, ImageRole::Main)?;
        verbose!("{} is {}", source.display(), main_kind);

        let watermark_path = self.options.watermark.as_path();
        let watermark_kind = validate_image(watermark_path, ImageRole::Watermark)?;
        verbose!("Watermark {} is {}", watermark_path.display(), watermark_kind);

        let destination = resolve_output_path(self.options.output.as_deref(), source)?;
        verbose!("Writing {}", destination.display());

        let bytes = stamp_image(
            SourceImage {
                path: source,
                kind: main_kind,
                role: ImageRole::Main,
            },
            SourceImage {
                path: watermark_path,
                kind: watermark_kind,
                role: ImageRole::Watermark,
            },
            &destination,
            &self.options.composition,
        )?;

        Ok((destination, bytes))
    }

    fn progress_bar(&self, mode: RunMode, len: usize) -> ProgressBar {
        if mode == RunMode::Single || logger::is_quiet() {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
            progress.set_style(style);
        }
        progress
    }
}

fn print_summary(report: &BatchReport, start_time: Instant) {
    info!("\n📊 Watermark Summary:");
    info!("  🖼️  Files stamped: {}", report.written());
    if report.skipped() > 0 {
        info!("  📁 Directories skipped: {}", report.skipped());
    }
    if report.failed() > 0 {
        info!("  ⚠️  Failed files: {}", report.failed());
    }
    info!("  📦 Total written: {}", format_file_size(report.bytes_written()));
    info!("  ⏱️  Total time: {:.2?}", start_time.elapsed());
}

/// Convenience wrapper: build a runner and stamp `target`.
pub fn stamp_target(
    target: &Path,
    options: BatchOptions,
    cancel: CancelFlag,
) -> Result<BatchReport> {
    BatchRunner::new(options).with_cancel_flag(cancel).run(target)
}
