/// Where the watermark's top-left corner lands unless configured otherwise.
pub const DEFAULT_OFFSET_X: i32 = 470;
pub const DEFAULT_OFFSET_Y: i32 = 50;

pub const DEFAULT_JPEG_QUALITY: u8 = 75;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

pub const OXIPNG_PRESET: u8 = 2;

/// Number of leading bytes inspected when sniffing content.
pub const SNIFF_LEN: u64 = 512;

pub const STAMPED_PREFIX: &str = "stamped_";

pub const STAMP_DIR_NAME: &str = ".stamp";
pub const DEFAULT_WATERMARK_FILE: &str = "default.png";

pub const ENV_PREFIX: &str = "STAMP_";
pub const ENV_SEPARATOR: &str = "__";
pub const KEY_DELIMITER: &str = ".";

pub const CONFIG_BANNER_TOP: &str = "================ Loaded Configuration ================";
pub const CONFIG_BANNER_BOTTOM: &str = "======================================================";

pub const PROGRESS_BAR_TEMPLATE: &str = "{bar:40.cyan/blue} {pos}/{len} {msg}";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️ ";
pub const ERROR_PREFIX: &str = "❌";
pub const VERBOSE_PREFIX: &str = "🔍";
