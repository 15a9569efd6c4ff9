//! # ideck-core - Core Domain Types
//!
//! Foundation crate for Insights Deck. Provides the dashboard tab identifiers,
//! the response envelope, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, serde_json, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Tabs (`tab`)
//! - [`TabId`] - Closed set of dashboard sections with labels and hot keys
//!
//! ### Envelope (`envelope`)
//! - [`Envelope`] - Decoded `{status, ...fields}` response object
//! - [`TabPayload`] - Fields of a successful response, looked up by path
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use ideck_core::prelude::*;
//! ```

pub mod envelope;
pub mod error;
pub mod logging;
pub mod tab;

/// Prelude for common imports used throughout all Insights Deck crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use envelope::{display_value, Envelope, TabPayload, STATUS_MISSING, STATUS_SUCCESS};
pub use error::{Error, Result, ResultExt};
pub use tab::TabId;
