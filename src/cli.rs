use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "stamp",
    about = "Watermark images",
    long_about = "stamp overlays a watermark image onto JPEG and PNG images. \
                  The target can be a single image or a directory, whose immediate \
                  entries are all stamped. Formats are detected from file content, \
                  never from the extension, and each output keeps its input's format.",
    version,
    after_help = "EXAMPLES:\n  \
    stamp watermark photo.jpg\n  \
    stamp watermark ./album -o ./stamped\n  \
    stamp watermark banner.png -w logo.png -o final.png\n\n\
    ENVIRONMENT:\n  \
    STAMP_WATERMARK_IMG      default watermark (default: ~/.stamp/default.png)\n  \
    STAMP_OFFSET__X / __Y    watermark position (default: 470, 50)\n  \
    STAMP_JPEG_QUALITY       JPEG output quality (default: 75)\n  \
    STAMP_OPTIMIZE_PNG       run PNG output through oxipng (default: false)"
)]
pub struct Args {
    #[arg(short = 'q', long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Print each step and the loaded configuration",
        long_help = "Print each step and the loaded configuration. The configuration \
                     dump is only shown with this flag; normal runs do not print it."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Watermark images",
        long_about = "Overlay the watermark onto one image, or onto every file directly \
                      inside a directory. With a single file any error aborts; with a \
                      directory, failing files are reported and skipped."
    )]
    Watermark {
        #[arg(help = "Image file or directory to stamp")]
        target: PathBuf,

        #[arg(
            short = 'w',
            long,
            help = "Watermark image (default: ~/.stamp/default.png)",
            long_help = "Watermark image to overlay. JPEG or PNG; PNG alpha is honoured. \
                         Defaults to the configured watermark, ~/.stamp/default.png \
                         unless STAMP_WATERMARK_IMG is set."
        )]
        watermark: Option<PathBuf>,

        #[arg(
            short = 'o',
            long,
            help = "Output file or directory (default: stamped_<name>)",
            long_help = "Where to write results. An existing directory receives \
                         stamped_<name> files; an existing file means its directory is used \
                         with stamped_<name>; a path that does not exist is used as-is. \
                         Without this option, stamped_<name> is written to the working directory."
        )]
        output: Option<PathBuf>,

        #[arg(
            long,
            help = "Fail a directory run if any file failed",
            long_help = "By default a directory run succeeds even when files are skipped \
                         because of errors. With --strict every file is still processed, \
                         but the command exits with an error if any of them failed."
        )]
        strict: bool,
    },
}
