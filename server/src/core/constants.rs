// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "fmak";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".fmak";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "fmak.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "FMAK_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "FMAK_LOG";

// =============================================================================
// Query Compilation
// =============================================================================

/// Environment variable for search page size
pub const ENV_ROWS_PER_PAGE: &str = "FMAK_ROWS_PER_PAGE";

/// Default search page size
pub const DEFAULT_ROWS_PER_PAGE: u32 = 20;
