/// An entry read from an archive but not yet processed.
///
/// `name` is the raw name recorded in the archive, before any sanitization.
pub struct PendingEntry<R> {
    pub name: String,
    /// Declared uncompressed size. Not trusted for anything but a hint.
    pub size: u64,
    pub mode: Option<u32>,
    pub kind: PendingEntryKind<R>,
}

pub enum PendingEntryKind<R> {
    Directory,
    File(R),
    /// Symlinks, hard links, devices. Never materialized.
    Unsupported,
}
