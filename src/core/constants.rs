// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for the store connection string
pub const ENV_DATABASE_URL: &str = "BR_SEARCH_DATABASE_URL";

/// Environment variable for the business request reporting view name
pub const ENV_BR_VIEW: &str = "BR_SEARCH_VIEW";

/// Environment variable for the statement timeout in seconds
pub const ENV_QUERY_TIMEOUT: &str = "BR_SEARCH_QUERY_TIMEOUT_SECS";

/// Environment variable for the maximum rows a search returns
pub const ENV_MAX_ROWS: &str = "BR_SEARCH_MAX_ROWS";

// =============================================================================
// Defaults
// =============================================================================

/// Default connection string (in-memory store, for local development)
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// Default reporting view name
pub const DEFAULT_BR_VIEW: &str = "BR_SEARCH_VIEW";

/// Default statement timeout in seconds
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

/// Default cap on rows returned by one search
pub const DEFAULT_MAX_ROWS: u32 = 500;
