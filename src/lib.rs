#[macro_use]
pub mod logger;

pub mod batch;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod formats;
pub mod paths;
pub mod processing;
pub mod utils;
pub mod validation;

pub use batch::{
    stamp_target, BatchOptions, BatchOutcome, BatchReport, BatchRunner, CancelFlag, FailurePolicy,
    RunMode,
};
pub use config::{CompositionOffset, Config};
pub use error::{ImageRole, Result, StampError};
pub use formats::{sniff_file, ImageKind, SniffedContent};
pub use paths::{expand_target, resolve_output_path, Candidate};
pub use processing::{composite, encode_image, stamp_image, CompositionOptions, SourceImage};
pub use validation::validate_image;
