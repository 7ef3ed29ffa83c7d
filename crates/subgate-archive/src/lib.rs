//! Guarded archive extraction with submission policy checks.
//!
//! # Architecture
//!
//! - `guard.rs` - Destination containment (zip-slip prevention)
//! - `policy.rs` - Prohibited directory, entry point and manifest rules
//! - `extract.rs` - Extraction pass and early-abort control flow
//! - `extract/` - Per-format entry sources
//! - `format.rs` - Format detection and tar decompression
//! - `verdict.rs` - Rejections, verdicts and pass counters

pub use entry::{PendingEntry, PendingEntryKind};
pub use error::{Error, Result};
pub use extract::{EntrySource, Flow, extract, extract_archive};
pub use guard::{Escape, guard_path};
pub use policy::Policy;
pub use verdict::{ExtractionReport, ExtractionVerdict, Outcome, Rejection};

pub mod entry;
mod error;
pub mod extract;
pub mod format;
mod guard;
pub mod policy;
mod verdict;
