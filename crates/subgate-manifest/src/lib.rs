//! `package.json` deny-list checks.
//!
//! Only the keys of `dependencies` and `devDependencies` are inspected. A
//! manifest that does not parse is reported as [`ManifestCheck::Unparseable`]
//! and passes.

pub use deny::{DEFAULT_DENIED, DenyList};
pub use manifest::{DependencyGroup, Manifest, ManifestCheck, Violation, check};

mod deny;
mod manifest;
