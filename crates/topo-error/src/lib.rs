//! Error handling shared by the topo crates.
//!
//! An [`Error`] carries an [`ErrorKind`] (what went wrong), the name of the
//! failing operation, key/value context and an optional source error.
//!
//! ```rust
//! use topo_error::{Error, ErrorKind};
//!
//! fn parse() -> topo_error::Result<()> {
//!     Err(Error::malformed_id("adjacency ID", "host;10.0.0.1;80")
//!         .with_operation("report::parse_adjacency_id"))
//! }
//!
//! assert_eq!(parse().unwrap_err().kind(), ErrorKind::MalformedId);
//! ```
//!
//! Rendering itself never fails: malformed input is reported through a
//! diagnostic sink and skipped.

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

pub type Result<T> = std::result::Result<T, Error>;
