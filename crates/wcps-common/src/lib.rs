//! Common types shared across the WCPS client crates.

pub mod error;
pub mod format;

pub use error::{ErrorKind, WcpsError, WcpsResult};
pub use format::OutputFormat;
