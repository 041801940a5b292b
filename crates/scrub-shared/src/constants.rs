/// Operations queued under one secret chat key before a rekey is requested
pub const REKEY_OPERATION_THRESHOLD: u32 = 100;

/// Upper bound on delete-user-history round trips for one purge
pub const DEFAULT_PURGE_MAX_ROUNDS: u32 = 1000;

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default API endpoint (local development)
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

/// Sticker set flag marking a mask pack
pub const STICKER_SET_FLAG_MASKS: i32 = 1 << 3;
