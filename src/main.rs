use anyhow::{anyhow, Result};
use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;
use stamp::cli::{Args, Commands};
use stamp::logger::{self, Verbosity};
use stamp::{stamp_target, BatchOptions, CancelFlag, Config, FailurePolicy};
use std::process;
use std::sync::Arc;

fn main() {
    let args = Args::parse();
    logger::set_verbosity(Verbosity::from_flags(args.quiet, args.verbose));

    if let Err(e) = run(args) {
        stamp::error!("failed to execute command:\n{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    stamp::verbose!("\n{}", config.render()?);

    let cancel = trap_signals()?;

    match args.command {
        Commands::Watermark {
            target,
            watermark,
            output,
            strict,
        } => {
            let policy = if strict {
                FailurePolicy::Strict
            } else {
                FailurePolicy::Lenient
            };
            let options = BatchOptions::from_config(&config, watermark, output, policy);
            stamp_target(&target, options, cancel)?;
        }
    }

    Ok(())
}

/// The first SIGINT/SIGTERM stops the run before the next file; a second one exits at once.
fn trap_signals() -> Result<CancelFlag> {
    let cancel = CancelFlag::new();

    for signal in [SIGINT, SIGTERM] {
        flag::register_conditional_shutdown(signal, 1, Arc::clone(cancel.as_atomic()))
            .and_then(|_| flag::register(signal, Arc::clone(cancel.as_atomic())))
            .map_err(|e| anyhow!("failed to register handler for signal {}: {}", signal, e))?;
    }

    Ok(cancel)
}
