/// Number of distinct active days retained per user
/// Oldest days are evicted first once the log is full
pub const MAX_ACTIVE_DAYS: usize = 90;

/// Number of most recent active days returned by the streak endpoint
/// Enough for the client's weekly/monthly calendar dots
pub const ACTIVE_DAYS_RETURNED: usize = 30;

/// Date format used for entries in the active-day log
pub const ACTIVE_DAY_FORMAT: &str = "%Y-%m-%d";

/// Content type tag that skips generation entirely
pub const CONTENT_TYPE_RAW: &str = "raw";

/// Days until a mastered card comes up for review again
pub const MASTERED_REVIEW_DELAY_DAYS: i64 = 3;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum length of a set title
pub const MAX_TITLE_LEN: usize = 200;

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for malformed set/card identifiers
pub const ERR_INVALID_ID: &str = "Invalid ID format";

/// Error message for a missing or blank set title
pub const ERR_TITLE_REQUIRED: &str = "Title is required";

/// Error message for an overly long set title
pub const ERR_TITLE_TOO_LONG: &str = "Title must be at most 200 characters";

/// Error message for registration with a blank name
pub const ERR_NAME_REQUIRED: &str = "Name is required";

/// Error message for an email without an @
pub const ERR_INVALID_EMAIL: &str = "A valid email is required";

/// Error message for passwords below the minimum length
pub const ERR_PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";

/// Error message when the current password does not match on password change
pub const ERR_WRONG_CURRENT_PASSWORD: &str = "Invalid current password";
