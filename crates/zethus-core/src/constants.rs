// Shared identifiers and defaults used by both the store and the web frontend.

// Persistence
pub const STORAGE_KEY: &str = "zethus_config"; // local storage slot for the last-known configuration

// URL query parameters
pub const PARAM_CONFIG: &str = "config"; // JSON-encoded configuration seed
pub const PARAM_SESSION: &str = "zethusId"; // embedding session identifier

// DOM events
pub const SET_CONFIG_EVENT: &str = "SetConfig"; // inbound, listened on the document
pub const UPDATE_CONFIG_EVENT_PREFIX: &str = "ZethusUpdateConfig"; // outbound, suffixed with the session id

// Option paths
pub const MAX_INDEX_GAP: usize = 1024; // how far past an array's end a path index may write

// Visualization keys
pub const KEY_LEN: usize = 9;
pub const KEY_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_-";

// Default ROS bridge
pub const DEFAULT_ROS_ENDPOINT: &str = "ws://localhost:9090";

// Path visualization defaults
pub const DEFAULT_PATH_COLOR: &str = "#ffffff";
pub const DEFAULT_PATH_ALPHA: f64 = 1.0;
pub const PATH_ALPHA_STEP: f64 = 0.1; // numeric input granularity

/// Name of the event dispatched on the parent document for a given session.
#[inline]
pub fn update_config_event_name(session: &str) -> String {
    format!("{UPDATE_CONFIG_EVENT_PREFIX}{session}")
}
