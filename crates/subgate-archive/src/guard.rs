use std::fmt;
use std::path::{Component, Path, PathBuf};

/// An entry whose destination would land outside the extraction root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Escape {
    pub entry: String,
    pub resolved: PathBuf,
}

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "entry '{}' resolves to '{}' outside the extraction root",
            self.entry,
            self.resolved.display()
        )
    }
}

/// Compute where `entry_name` lands under `root` and verify it stays there.
///
/// `root` must be absolute and canonical. The joined path is normalized
/// lexically since the destination does not exist yet. Both `/` and `\` are
/// treated as separators and a leading separator is dropped, so `/index.html`
/// lands at the root. `..` segments that climb above the root are rejected.
pub fn guard_path(entry_name: &str, root: &Path) -> Result<PathBuf, Escape> {
    if entry_name.contains('\0') {
        return Err(Escape {
            entry: entry_name.to_string(),
            resolved: PathBuf::new(),
        });
    }

    let unified = entry_name.replace('\\', "/");
    let resolved = normalize_path(&root.join(unified.trim_start_matches('/')));

    // `starts_with` compares whole components, so `/tmp/ab` is not under `/tmp/a`.
    if !resolved.starts_with(root) {
        return Err(Escape {
            entry: entry_name.to_string(),
            resolved,
        });
    }

    Ok(resolved)
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push(component.as_os_str()),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/review/root")
        } else {
            Path::new("/review/root")
        }
    }

    #[test]
    fn plain_entry_stays_inside() {
        let guarded = guard_path("project/index.html", root()).unwrap();
        assert_eq!(guarded, root().join("project/index.html"));
    }

    #[test]
    fn parent_segments_inside_root_are_folded() {
        let guarded = guard_path("a/b/../c/./d.txt", root()).unwrap();
        assert_eq!(guarded, root().join("a/c/d.txt"));
    }

    #[test]
    fn parent_traversal_escapes() {
        let result = guard_path("../../etc/passwd", root());
        let escape = result.unwrap_err();
        assert_eq!(escape.entry, "../../etc/passwd");
        assert!(!escape.resolved.starts_with(root()));
    }

    #[test]
    fn traversal_hidden_inside_path_escapes() {
        assert!(guard_path("project/../../../evil.sh", root()).is_err());
    }

    #[test]
    fn sibling_with_shared_prefix_escapes() {
        // /review/root/../rootkit -> /review/rootkit
        assert!(guard_path("../rootkit/x", root()).is_err());
    }

    #[test]
    fn leading_separator_is_rerooted() {
        let guarded = guard_path("/index.html", root()).unwrap();
        assert_eq!(guarded, root().join("index.html"));
    }

    #[test]
    fn rerooted_traversal_still_escapes() {
        assert!(guard_path("/../../etc/passwd", root()).is_err());
    }

    #[test]
    fn backslash_traversal_escapes() {
        assert!(guard_path("..\\..\\windows\\system.ini", root()).is_err());
    }

    #[test]
    fn backslash_separators_are_normalized() {
        let guarded = guard_path("app\\js\\main.js", root()).unwrap();
        assert_eq!(guarded, root().join("app/js/main.js"));
    }

    #[test]
    fn root_level_entry_equals_root() {
        let guarded = guard_path("./", root()).unwrap();
        assert_eq!(guarded, root());
    }

    #[test]
    fn null_byte_is_rejected() {
        assert!(guard_path("index\0.html", root()).is_err());
    }

    #[test]
    fn normalization() {
        let result = normalize_path(Path::new("/foo//bar/baz/../qux"));
        assert_eq!(result, Path::new("/foo/bar/qux"));
    }
}
