use std::io::{self, Read, Seek};

use crate::entry::{PendingEntry, PendingEntryKind};
use crate::error::{Error, Result};
use crate::extract::EntrySource;
use crate::format::ArchiveFormat;

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

pub struct ZipSource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    index: usize,
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader).map_err(|e| Error::Corrupted {
            reason: e.to_string(),
        })?;
        Ok(Self { archive, index: 0 })
    }
}

impl<R: Read + Seek> EntrySource for ZipSource<R> {
    type Reader<'a>
        = zip::read::ZipFile<'a, R>
    where
        Self: 'a;

    fn next_entry(&mut self) -> Option<Result<PendingEntry<Self::Reader<'_>>>> {
        if self.index >= self.archive.len() {
            return None;
        }
        let index = self.index;
        self.index += 1;

        let file = match self.archive.by_index(index) {
            Ok(f) => f,
            Err(e) => {
                return Some(Err(Error::ReadEntry {
                    entry: format!("#{index}"),
                    source: io::Error::other(e),
                }));
            }
        };

        // Raw name on purpose: the guard decides what is safe, not the reader.
        let name = file.name().to_string();
        let size = file.size();
        let mode = file.unix_mode();

        let kind = if file.is_dir() {
            PendingEntryKind::Directory
        } else if mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
            PendingEntryKind::Unsupported
        } else {
            PendingEntryKind::File(file)
        };

        Some(Ok(PendingEntry {
            name,
            size,
            mode,
            kind,
        }))
    }

    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Zip
    }
}
