pub mod config;
pub mod constants;
pub mod error;
pub mod merge;
pub mod notify;
pub mod panel;
pub mod path;
pub mod storage;
pub mod store;

pub use config::*;
pub use constants::*;
pub use error::{ConfigError, Result};
pub use notify::*;
pub use panel::*;
pub use storage::*;
pub use store::*;
