use std::fmt;

use subgate_manifest::Violation;

/// Why a submission was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    ProhibitedDirectory { entry: String, segment: String },
    DeniedDependency(Violation),
    MissingEntryPoint,
}

impl Rejection {
    pub fn denied_package(&self) -> Option<&str> {
        match self {
            Self::DeniedDependency(v) => Some(&v.package),
            _ => None,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProhibitedDirectory { entry, segment } => write!(
                f,
                "prohibited directory present: archive contains '{segment}' ({entry})"
            ),
            Self::DeniedDependency(violation) => fmt::Display::fmt(violation, f),
            Self::MissingEntryPoint => f.write_str("no entry point found anywhere in the project"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected(Rejection),
}

/// Counters collected during one extraction pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub entries_seen: usize,
    pub files_written: usize,
    pub directories_created: usize,
    /// Entries dropped because they would escape the root.
    pub escaped: Vec<String>,
    /// Entries dropped because their kind is never materialized.
    pub unsupported: Vec<String>,
    pub bytes_written: u64,
}

/// Terminal result of an extraction pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionVerdict {
    pub outcome: Outcome,
    pub entry_point_found: bool,
    pub report: ExtractionReport,
}

impl ExtractionVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, Outcome::Accepted)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match &self.outcome {
            Outcome::Rejected(r) => Some(r),
            Outcome::Accepted => None,
        }
    }
}
