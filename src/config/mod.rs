//! Configuration module for pocket-ledger
//!
//! - Platform-aware path resolution
//! - User settings persistence (active user, theme, report defaults)

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::{Settings, Theme};
