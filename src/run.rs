//! Streaming readers and writers for run files
//!
//! A run file is a raw concatenation of 8-byte little-endian signed
//! integers, no header or framing. The page file, slot files, and merge
//! temporaries all share this format.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Bytes per stored element
pub const ELEMENT_BYTES: u64 = 8;

/// Pull-based reader over a run file
pub struct RunReader {
    reader: BufReader<File>,
    remaining: usize,
}

impl RunReader {
    /// Open a whole run file; length in elements comes from the file size
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len() / ELEMENT_BYTES;
        Ok(Self {
            reader: BufReader::new(file),
            remaining: len as usize,
        })
    }

    /// Open a sub-range of a run file, starting at element `start`
    pub fn open_range(path: &Path, start: usize, count: usize) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(start as u64 * ELEMENT_BYTES))?;
        Ok(Self {
            reader,
            remaining: count,
        })
    }

    /// Next element, or None when the run is exhausted.
    ///
    /// A file shorter than its declared element count surfaces as
    /// `UnexpectedEof` — the run is treated as corrupt, not as ended.
    pub fn next(&mut self) -> io::Result<Option<i64>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let mut buf = [0u8; ELEMENT_BYTES as usize];
        self.reader.read_exact(&mut buf)?;
        self.remaining -= 1;
        Ok(Some(i64::from_le_bytes(buf)))
    }
}

/// Buffered writer producing a run file
pub struct RunWriter {
    writer: BufWriter<File>,
    written: usize,
}

impl RunWriter {
    /// Create (truncate) a run file
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
            written: 0,
        })
    }

    /// Open a run file for appending
    pub fn append(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn push(&mut self, value: i64) -> io::Result<()> {
        self.writer.write_all(&value.to_le_bytes())?;
        self.written += 1;
        Ok(())
    }

    /// Flush and return the number of elements written by this writer
    pub fn finish(mut self) -> io::Result<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}
