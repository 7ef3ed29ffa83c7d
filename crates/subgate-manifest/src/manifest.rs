use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};

use crate::deny::DenyList;

const RUNTIME_KEY: &str = "dependencies";
const DEV_KEY: &str = "devDependencies";

/// Declared package names of the two dependency groups of a `package.json`.
///
/// Group keys match case-insensitively and repeated groups are merged.
/// Versions are never inspected, only key presence matters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    pub dependencies: HashSet<String>,
    pub dev_dependencies: HashSet<String>,
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ManifestVisitor)
    }
}

struct ManifestVisitor;

impl<'de> Visitor<'de> for ManifestVisitor {
    type Value = Manifest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a package manifest object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Manifest, A::Error> {
        let mut manifest = Manifest::default();

        while let Some(key) = map.next_key::<String>()? {
            let group = if key.eq_ignore_ascii_case(RUNTIME_KEY) {
                &mut manifest.dependencies
            } else if key.eq_ignore_ascii_case(DEV_KEY) {
                &mut manifest.dev_dependencies
            } else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };

            let names = map.next_value::<Option<HashMap<String, IgnoredAny>>>()?;
            group.extend(names.into_iter().flat_map(HashMap::into_keys));
        }

        Ok(manifest)
    }
}

impl Manifest {
    pub fn parse(content: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(content)
    }

    pub fn declares(&self, group: DependencyGroup, name: &str) -> bool {
        match group {
            DependencyGroup::Runtime => self.dependencies.contains(name),
            DependencyGroup::Dev => self.dev_dependencies.contains(name),
        }
    }

    /// First deny-listed package found, walking the deny-list in order and
    /// checking runtime dependencies before dev dependencies for each name.
    pub fn first_denied(&self, deny: &DenyList) -> Option<Violation> {
        for name in deny.iter() {
            for group in [DependencyGroup::Runtime, DependencyGroup::Dev] {
                if self.declares(group, name) {
                    return Some(Violation {
                        package: name.to_string(),
                        group,
                    });
                }
            }
        }
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DependencyGroup {
    Runtime,
    Dev,
}

impl fmt::Display for DependencyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime => f.write_str("dependencies"),
            Self::Dev => f.write_str("devDependencies"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub package: String,
    pub group: DependencyGroup,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "usage of prohibited framework detected: {} (in {})",
            self.package, self.group
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestCheck {
    Clean,
    /// Invalid JSON, or a top-level or group value that is not an object.
    /// Treated as passing.
    Unparseable,
    Denied(Violation),
}

impl ManifestCheck {
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Denied(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_violation(self) -> Option<Violation> {
        match self {
            Self::Denied(v) => Some(v),
            _ => None,
        }
    }
}

/// Check raw manifest bytes against a deny-list.
pub fn check(content: &[u8], deny: &DenyList) -> ManifestCheck {
    let manifest = match Manifest::parse(content) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unparseable manifest");
            return ManifestCheck::Unparseable;
        }
    };

    match manifest.first_denied(deny) {
        Some(v) => ManifestCheck::Denied(v),
        None => ManifestCheck::Clean,
    }
}
