use std::io::{self, Read, Seek};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar(Compression),
}

/// Compression codec wrapping a tar stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

pub fn detect_format(data: &[u8]) -> Option<ArchiveFormat> {
    match data {
        [0x50, 0x4B, 0x03, 0x04, ..] | [0x50, 0x4B, 0x05, 0x06, ..] => Some(ArchiveFormat::Zip),
        [0x1F, 0x8B, ..] => Some(ArchiveFormat::Tar(Compression::Gzip)),
        _ if is_tar_header(data) => Some(ArchiveFormat::Tar(Compression::None)),
        _ => None,
    }
}

fn is_tar_header(data: &[u8]) -> bool {
    data.len() >= 263 && data[257..262] == *b"ustar"
}

/// Sniff the format from the first block and rewind the reader.
pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> io::Result<Option<ArchiveFormat>> {
    let mut header = Vec::with_capacity(512);
    reader.by_ref().take(512).read_to_end(&mut header)?;
    reader.rewind()?;
    Ok(detect_format(&header))
}

/// Decompression wrapper for tar streams.
#[cfg(feature = "tar")]
pub enum Decoder<R: Read> {
    Passthrough(R),
    Gzip(Box<flate2::read::GzDecoder<R>>),
}

#[cfg(feature = "tar")]
impl<R: Read> Decoder<R> {
    pub fn new(reader: R, codec: Compression) -> Self {
        match codec {
            Compression::None => Self::Passthrough(reader),
            Compression::Gzip => Self::Gzip(Box::new(flate2::read::GzDecoder::new(reader))),
        }
    }
}

#[cfg(feature = "tar")]
impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
        }
    }
}
