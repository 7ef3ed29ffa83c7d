//! Extraction pass with on-the-fly policy checks.
//!
//! Entries are processed in the archive's native order. Each entry step
//! returns a [`Flow`]: keep going, or stop with a [`Rejection`]. I/O failures
//! travel on the `Err` side and are never confused with a rejection.
//!
//! # Platform Behavior
//!
//! **Unix**: declared permission bits are applied to extracted files as-is.
//! **Other platforms**: mode bits are ignored.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use subgate_manifest::ManifestCheck;

use crate::entry::{PendingEntry, PendingEntryKind};
use crate::error::{Error, Result};
use crate::format::{self, ArchiveFormat};
use crate::guard::guard_path;
use crate::policy::Policy;
use crate::verdict::{ExtractionReport, ExtractionVerdict, Outcome, Rejection};

/// Upper bound on the buffer reserved up front from a declared manifest size.
const MANIFEST_PREALLOC_LIMIT: u64 = 1 << 20;

#[cfg(feature = "tar")]
mod tar;
#[cfg(feature = "zip")]
mod zip;

#[cfg(feature = "tar")]
pub use tar::{TarArchive, TarSource};
#[cfg(feature = "zip")]
pub use zip::ZipSource;

/// Archive-specific entry source.
pub trait EntrySource {
    type Reader<'a>: Read
    where
        Self: 'a;

    fn next_entry(&mut self) -> Option<Result<PendingEntry<Self::Reader<'_>>>>;
    fn format(&self) -> ArchiveFormat;
}

/// Result of processing a single entry.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Reject(Rejection),
}

#[derive(Default)]
struct Pass {
    entry_point_found: bool,
    report: ExtractionReport,
}

impl Pass {
    fn finish(self, outcome: Outcome) -> ExtractionVerdict {
        ExtractionVerdict {
            outcome,
            entry_point_found: self.entry_point_found,
            report: self.report,
        }
    }
}

/// Open `archive`, detect its format and extract it under `destination`.
///
/// `destination` must exist and be canonical.
pub fn extract_archive(archive: &Path, destination: &Path, policy: &Policy) -> Result<ExtractionVerdict> {
    let mut file = File::open(archive).map_err(|e| Error::Open {
        path: archive.to_path_buf(),
        source: e,
    })?;

    let detected = format::detect_from_reader(&mut file).map_err(|e| Error::Open {
        path: archive.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(archive = %archive.display(), format = ?detected, "opened archive");

    match detected {
        #[cfg(feature = "zip")]
        Some(ArchiveFormat::Zip) => {
            let mut source = ZipSource::new(file)?;
            extract(&mut source, destination, policy)
        }
        #[cfg(feature = "tar")]
        Some(ArchiveFormat::Tar(codec)) => {
            let mut archive = TarArchive::new(file, codec);
            let mut source = archive.entries()?;
            extract(&mut source, destination, policy)
        }
        _ => Err(Error::UnsupportedFormat {
            path: archive.to_path_buf(),
        }),
    }
}

/// Run the extraction pass over an explicit source.
pub fn extract<S: EntrySource>(source: &mut S, destination: &Path, policy: &Policy) -> Result<ExtractionVerdict> {
    let format = source.format();
    let mut pass = Pass::default();

    while let Some(pending) = source.next_entry() {
        let pending = pending?;
        pass.report.entries_seen += 1;

        if let Flow::Reject(rejection) = process_entry(pending, destination, policy, &mut pass)? {
            tracing::debug!(?format, %rejection, "extraction aborted");
            return Ok(pass.finish(Outcome::Rejected(rejection)));
        }
    }

    if !pass.entry_point_found {
        return Ok(pass.finish(Outcome::Rejected(Rejection::MissingEntryPoint)));
    }

    tracing::debug!(
        ?format,
        files = pass.report.files_written,
        bytes = pass.report.bytes_written,
        "extraction accepted"
    );
    Ok(pass.finish(Outcome::Accepted))
}

fn process_entry<R: Read>(
    pending: PendingEntry<R>,
    destination: &Path,
    policy: &Policy,
    pass: &mut Pass,
) -> Result<Flow> {
    let PendingEntry {
        name,
        size,
        mode,
        kind,
    } = pending;

    if policy.is_prohibited(&name) {
        return Ok(Flow::Reject(Rejection::ProhibitedDirectory {
            entry: name,
            segment: policy.prohibited_dir.clone(),
        }));
    }

    if policy.is_entry_point(&name) {
        pass.entry_point_found = true;
    }

    let target = match guard_path(&name, destination) {
        Ok(target) => target,
        Err(escape) => {
            tracing::warn!(%escape, "skipping entry");
            pass.report.escaped.push(name);
            return Ok(Flow::Continue);
        }
    };

    let mut reader = match kind {
        PendingEntryKind::Directory => {
            ensure_directory(&target)?;
            pass.report.directories_created += 1;
            return Ok(Flow::Continue);
        }
        PendingEntryKind::Unsupported => {
            tracing::debug!(entry = %name, "skipping unsupported entry kind");
            pass.report.unsupported.push(name);
            return Ok(Flow::Continue);
        }
        PendingEntryKind::File(_) if target == destination => {
            pass.report.unsupported.push(name);
            return Ok(Flow::Continue);
        }
        PendingEntryKind::File(reader) => reader,
    };

    if let Some(parent) = target.parent() {
        ensure_directory(parent)?;
    }

    if !policy.is_manifest(&name) {
        let written = write_stream(&mut reader, &target)?;
        apply_mode(&target, mode)?;
        pass.report.files_written += 1;
        pass.report.bytes_written += written;
        return Ok(Flow::Continue);
    }

    // The check needs the whole document; buffer once, inspect, then write.
    let mut content = Vec::with_capacity(size.min(MANIFEST_PREALLOC_LIMIT) as usize);
    reader.read_to_end(&mut content).map_err(|e| Error::ReadEntry {
        entry: name.clone(),
        source: e,
    })?;

    let check = subgate_manifest::check(&content, &policy.deny_list);
    if check == ManifestCheck::Unparseable {
        tracing::debug!(entry = %name, "manifest is not valid JSON, skipping dependency check");
    }

    write_bytes(&content, &target)?;
    apply_mode(&target, mode)?;
    pass.report.files_written += 1;
    pass.report.bytes_written += content.len() as u64;

    match check.into_violation() {
        Some(violation) => Ok(Flow::Reject(Rejection::DeniedDependency(violation))),
        None => Ok(Flow::Continue),
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

fn create_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| Error::ExtractionFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_stream<R: Read>(reader: &mut R, target: &Path) -> Result<u64> {
    let mut file = create_file(target)?;
    io::copy(reader, &mut file).map_err(|e| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source: e,
    })
}

fn write_bytes(content: &[u8], target: &Path) -> Result<()> {
    let mut file = create_file(target)?;
    file.write_all(content).map_err(|e| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source: e,
    })
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let Some(mode) = mode else {
        return Ok(());
    };
    // Applied after the content is written, so read-only bits cannot block the write.
    let perms = std::fs::Permissions::from_mode(mode & 0o777);
    std::fs::set_permissions(path, perms).map_err(|e| Error::PermissionFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::Cursor;

    use super::*;

    /// In-memory source yielding entries in insertion order.
    struct MemorySource {
        entries: VecDeque<(String, Option<Vec<u8>>)>,
        current: Option<Cursor<Vec<u8>>>,
    }

    impl MemorySource {
        fn new(entries: &[(&str, Option<&[u8]>)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|(n, c)| (n.to_string(), c.map(<[u8]>::to_vec)))
                    .collect(),
                current: None,
            }
        }
    }

    impl EntrySource for MemorySource {
        type Reader<'a>
            = &'a mut Cursor<Vec<u8>>
        where
            Self: 'a;

        fn next_entry(&mut self) -> Option<Result<PendingEntry<Self::Reader<'_>>>> {
            let (name, content) = self.entries.pop_front()?;
            let kind = match content {
                None => PendingEntryKind::Directory,
                Some(bytes) => {
                    self.current = Some(Cursor::new(bytes));
                    PendingEntryKind::File(self.current.as_mut()?)
                }
            };
            Some(Ok(PendingEntry {
                name,
                size: 0,
                mode: Some(0o644),
                kind,
            }))
        }

        fn format(&self) -> ArchiveFormat {
            ArchiveFormat::Zip
        }
    }

    fn root() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let canonical = std::fs::canonicalize(dir.path()).unwrap();
        (dir, canonical)
    }

    #[test]
    fn accepts_tree_with_entry_point() {
        let (_dir, dest) = root();
        let mut source = MemorySource::new(&[
            ("site/", None),
            ("site/index.html", Some(b"<h1>hi</h1>")),
            ("site/js/app.js", Some(b"console.log(1)")),
        ]);

        let verdict = extract(&mut source, &dest, &Policy::default()).unwrap();

        assert!(verdict.is_accepted());
        assert!(verdict.entry_point_found);
        assert_eq!(verdict.report.files_written, 2);
        assert_eq!(verdict.report.directories_created, 1);
        assert_eq!(
            std::fs::read(dest.join("site/js/app.js")).unwrap(),
            b"console.log(1)"
        );
    }

    #[test]
    fn prohibited_directory_stops_before_writing_entry() {
        let (_dir, dest) = root();
        let mut source = MemorySource::new(&[
            ("index.html", Some(b"<h1>hi</h1>")),
            ("node_modules/left-pad/index.js", Some(b"module.exports = 1")),
            ("after.js", Some(b"never")),
        ]);

        let verdict = extract(&mut source, &dest, &Policy::default()).unwrap();

        assert!(matches!(
            verdict.rejection(),
            Some(Rejection::ProhibitedDirectory { .. })
        ));
        assert!(!dest.join("node_modules").exists());
        assert!(!dest.join("after.js").exists());
        assert_eq!(verdict.report.entries_seen, 2);
    }

    #[test]
    fn denied_manifest_is_written_then_rejects() {
        let (_dir, dest) = root();
        let manifest: &[u8] = br#"{"devDependencies":{"vue":"^3"}}"#;
        let mut source = MemorySource::new(&[
            ("index.html", Some(b"<h1>hi</h1>")),
            ("package.json", Some(manifest)),
            ("later.js", Some(b"never")),
        ]);

        let verdict = extract(&mut source, &dest, &Policy::default()).unwrap();

        assert_eq!(verdict.rejection().and_then(Rejection::denied_package), Some("vue"));
        assert_eq!(std::fs::read(dest.join("package.json")).unwrap(), manifest);
        assert!(!dest.join("later.js").exists());
    }

    #[test]
    fn broken_manifest_passes() {
        let (_dir, dest) = root();
        let mut source = MemorySource::new(&[
            ("package.json", Some(b"{ not json")),
            ("index.html", Some(b"<h1>hi</h1>")),
        ]);

        let verdict = extract(&mut source, &dest, &Policy::default()).unwrap();
        assert!(verdict.is_accepted());
        assert_eq!(std::fs::read(dest.join("package.json")).unwrap(), b"{ not json");
    }

    #[test]
    fn missing_entry_point_rejects_after_full_pass() {
        let (_dir, dest) = root();
        let mut source = MemorySource::new(&[
            ("README.md", Some(b"# notes")),
            ("src/main.js", Some(b"1")),
        ]);

        let verdict = extract(&mut source, &dest, &Policy::default()).unwrap();

        assert_eq!(verdict.rejection(), Some(&Rejection::MissingEntryPoint));
        assert!(!verdict.entry_point_found);
        assert_eq!(verdict.report.files_written, 2);
    }

    #[test]
    fn escaping_entry_is_skipped_and_pass_continues() {
        let (dir, dest) = root();
        let mut source = MemorySource::new(&[
            ("../../escaped.txt", Some(b"pwned")),
            ("index.html", Some(b"<h1>hi</h1>")),
        ]);

        let verdict = extract(&mut source, &dest, &Policy::default()).unwrap();

        assert!(verdict.is_accepted());
        assert_eq!(verdict.report.escaped, vec!["../../escaped.txt".to_string()]);
        assert!(!dir.path().parent().unwrap().join("escaped.txt").exists());
    }

    #[test]
    fn escaping_entry_point_still_counts_as_seen() {
        let (_dir, dest) = root();
        let mut source = MemorySource::new(&[("../outside/index.html", Some(b"<h1>hi</h1>"))]);

        let verdict = extract(&mut source, &dest, &Policy::default()).unwrap();

        assert!(verdict.is_accepted());
        assert_eq!(verdict.report.files_written, 0);
    }

    #[cfg(unix)]
    #[test]
    fn declared_mode_is_applied() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, dest) = root();
        let target = dest.join("run.sh");
        std::fs::write(&target, "#!/bin/sh").unwrap();

        apply_mode(&target, Some(0o100755)).unwrap();
        let mode = std::fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);

        apply_mode(&target, Some(0o100400)).unwrap();
        let mode = std::fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o400);

        apply_mode(&target, None).unwrap();
        let mode = std::fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o400);
    }
}
