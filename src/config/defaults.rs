/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.

// Config loading
pub const DEFAULT_CONFIG_FILE: &str = "m3u-transform.toml";
pub const ENV_PREFIX: &str = "M3U_TRANSFORM_";

// Logging defaults
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Pipeline defaults
pub const DEFAULT_STEPS: &[&str] = &["channel_list", "deduplicate"];

// Deduplication defaults
pub const DEFAULT_STRIP_SUFFIXES: bool = true;

/// Quality suffixes, highest priority first
pub const DEFAULT_SUFFIX_PRIORITY: &[&str] = &[
    " 4K",
    " UHD",
    " FHD",
    " HD 50 orig",
    " HD 50",
    " HD orig",
    " HD",
    " orig",
];

pub const DEFAULT_NORMALIZATION_CASE_INSENSITIVE: bool = true;

// Rename groups defaults
pub const DEFAULT_GROUP_NAME: &str = "HLS-Proxy";
