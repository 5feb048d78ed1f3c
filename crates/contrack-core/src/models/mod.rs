//! Data models for the application
//!
//! Wire shapes for the remote contract store plus the transient types the
//! workflows produce, organized by domain.

mod contract;
mod report;
mod upload;

// Re-export all models for convenient imports
pub use contract::*;
pub use report::*;
pub use upload::*;
