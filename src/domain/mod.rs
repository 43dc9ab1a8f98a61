//! Domain types shared across Vigil.
//!
//! The domain layer provides:
//! - **Error types** ([`VigilError`], [`ModelError`], [`IdValidationError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, VigilError>`]:
//!
//! ```rust,no_run
//! use vigil::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = vigil::config::load_config("vigil.toml")?;
//!     println!("{}", config.moderation.primary_language);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::{IdValidationError, ModelError, VigilError};
pub use result::Result;
