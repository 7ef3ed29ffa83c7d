//! Filesystem side of a submission review.
//!
//! - `workspace.rs` - Scoped scratch directory with guaranteed cleanup
//! - `resolve.rs` - Project root resolution over an extracted tree

pub use error::{Error, Result};
pub use resolve::{DEFAULT_MARKERS, MarkerResolver, RootResolver};
pub use workspace::Workspace;

mod error;
mod resolve;
mod workspace;
