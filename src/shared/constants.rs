/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum number of endpoints a single test run may target
pub const MAX_ENDPOINTS: usize = 5;

/// Maximum length of a prompt name
pub const MAX_PROMPT_NAME_LENGTH: usize = 200;
