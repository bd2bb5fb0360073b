//! Character sources
//!
//! The interpreters read one byte at a time with one byte of lookahead.
//! Attribute lookups additionally need to rewind and to restore a saved
//! position, which both sources below support.

use drawall_core::{Error, ErrorCode, Result};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// Sequential byte stream with lookahead and seeking
pub trait CharSource {
    /// Consume the next byte, `None` at the end of the stream.
    fn read_byte(&mut self) -> Option<u8>;

    /// The next byte, without consuming it.
    fn peek_byte(&mut self) -> Option<u8>;

    /// Offset of the next byte to be read
    fn position(&self) -> u64;

    /// Move the read offset to `position`.
    fn seek(&mut self, position: u64) -> Result<()>;

    fn seek_to_start(&mut self) -> Result<()> {
        self.seek(0)
    }

    /// Whether at least one more byte can be read.
    fn available(&mut self) -> bool {
        self.peek_byte().is_some()
    }
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn peek_byte(&mut self) -> Option<u8> {
        (**self).peek_byte()
    }

    fn position(&self) -> u64 {
        (**self).position()
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        (**self).seek(position)
    }
}

/// In-memory source
#[derive(Debug, Clone, Default)]
pub struct StringSource {
    data: Vec<u8>,
    pos: usize,
}

impl StringSource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<&str> for StringSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl CharSource for StringSource {
    fn read_byte(&mut self) -> Option<u8> {
        let byte = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    fn peek_byte(&mut self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        self.pos = usize::try_from(position)
            .unwrap_or(usize::MAX)
            .min(self.data.len());
        Ok(())
    }
}

/// Buffered file source
///
/// A read error ends the stream; it is logged, and the interpreter then
/// reports the truncated input through its own error codes.
#[derive(Debug)]
pub struct FileSource {
    reader: BufReader<File>,
    pos: u64,
    peeked: Option<u8>,
}

impl FileSource {
    /// Open `path`, mapping failures onto the storage error codes.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            let code = match e.kind() {
                ErrorKind::NotFound => ErrorCode::FileNotFound,
                _ => ErrorCode::FileNotReadable,
            };
            Error::fatal(code, format!("{}: {}", path.display(), e))
        })?;
        tracing::debug!("Opened {}", path.display());
        Ok(Self {
            reader: BufReader::new(file),
            pos: 0,
            peeked: None,
        })
    }

    fn fill(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return None,
                Ok(_) => return Some(byte[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!("Read error at offset {}: {}", self.pos, e);
                    return None;
                }
            }
        }
    }
}

impl CharSource for FileSource {
    fn read_byte(&mut self) -> Option<u8> {
        let byte = match self.peeked.take() {
            Some(byte) => Some(byte),
            None => self.fill(),
        }?;
        self.pos += 1;
        Some(byte)
    }

    fn peek_byte(&mut self) -> Option<u8> {
        if self.peeked.is_none() {
            self.peeked = self.fill();
        }
        self.peeked
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        self.reader.seek(SeekFrom::Start(position))?;
        self.pos = position;
        self.peeked = None;
        Ok(())
    }
}
