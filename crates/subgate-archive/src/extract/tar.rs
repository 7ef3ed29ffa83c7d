use std::io::Read;

use crate::entry::{PendingEntry, PendingEntryKind};
use crate::error::{Error, Result};
use crate::extract::EntrySource;
use crate::format::{ArchiveFormat, Compression, Decoder};

/// Owns the tar stream; [`TarArchive::entries`] borrows it for one pass.
pub struct TarArchive<R: Read> {
    archive: tar::Archive<Decoder<R>>,
    codec: Compression,
}

impl<R: Read> TarArchive<R> {
    pub fn new(reader: R, codec: Compression) -> Self {
        Self {
            archive: tar::Archive::new(Decoder::new(reader, codec)),
            codec,
        }
    }

    pub fn entries(&mut self) -> Result<TarSource<'_, Decoder<R>>> {
        let entries = self.archive.entries().map_err(|e| Error::Corrupted {
            reason: e.to_string(),
        })?;
        Ok(TarSource {
            entries,
            codec: self.codec,
        })
    }
}

pub struct TarSource<'a, R: 'a + Read> {
    entries: tar::Entries<'a, R>,
    codec: Compression,
}

impl<'a, R: Read + 'a> EntrySource for TarSource<'a, R> {
    // Entries borrow the archive for 'a, not the source.
    type Reader<'b>
        = tar::Entry<'a, R>
    where
        Self: 'b;

    fn next_entry(&mut self) -> Option<Result<PendingEntry<Self::Reader<'_>>>> {
        let entry = match self.entries.next()? {
            Ok(e) => e,
            Err(e) => {
                return Some(Err(Error::ReadEntry {
                    entry: "<tar header>".to_string(),
                    source: e,
                }));
            }
        };

        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let header = entry.header();
        let size = entry.size();
        let mode = header.mode().ok();
        let entry_type = header.entry_type();

        let kind = if entry_type.is_dir() {
            PendingEntryKind::Directory
        } else if entry_type.is_file() || entry_type.is_contiguous() {
            PendingEntryKind::File(entry)
        } else {
            PendingEntryKind::Unsupported
        };

        Some(Ok(PendingEntry {
            name,
            size,
            mode,
            kind,
        }))
    }

    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Tar(self.codec)
    }
}
