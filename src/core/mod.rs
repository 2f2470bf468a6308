// Public modules
pub mod defaults;
pub mod error;
pub mod output;
pub mod stamp;
pub mod tidy;
pub mod version;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
