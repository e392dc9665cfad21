//! On-disk half of the paged array
//!
//! Owns the scratch directory holding the committed prefix of the array
//! (`page.dat`), the numbered slot files used during sort (`{i}.dat`),
//! and merge temporaries (`temp_{id}.dat`). The scratch directory is
//! created lazily on first overflow and removed wholesale on purge.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{PagesortError, Result};
use crate::run::{RunReader, RunWriter};
use crate::window::Window;

const PAGE_FILE: &str = "page.dat";

struct Scratch {
    dir: TempDir,
    /// Elements committed to the page file
    committed: usize,
    /// Monotonic id for merge temporaries
    temp_counter: u64,
}

impl Scratch {
    fn page_path(&self) -> PathBuf {
        self.dir.path().join(PAGE_FILE)
    }
}

/// Manages the committed prefix and sort scratch files
pub struct PageStore {
    capacity: usize,
    scratch: Option<Scratch>,
}

impl PageStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            scratch: None,
        }
    }

    /// Whether any paging has happened yet
    pub fn has_scratch(&self) -> bool {
        self.scratch.is_some()
    }

    /// Elements committed to the page file
    pub fn committed(&self) -> usize {
        self.scratch.as_ref().map_or(0, |s| s.committed)
    }

    /// Scratch directory location, if one exists
    pub fn scratch_path(&self) -> Option<PathBuf> {
        self.scratch.as_ref().map(|s| s.dir.path().to_path_buf())
    }

    /// Create the scratch directory and an empty page file on first use;
    /// a no-op on every later call.
    ///
    /// Uniqueness and collision checking come from the platform temp-dir
    /// primitive rather than a hand-rolled generate-and-retry loop.
    pub fn ensure_scratch(&mut self) -> Result<()> {
        if self.scratch.is_none() {
            let dir = tempfile::Builder::new().prefix("pagesort-").tempdir()?;
            File::create(dir.path().join(PAGE_FILE))?;
            self.scratch = Some(Scratch {
                dir,
                committed: 0,
                temp_counter: 0,
            });
        }
        Ok(())
    }

    fn scratch(&self) -> Result<&Scratch> {
        self.scratch
            .as_ref()
            .ok_or(PagesortError::IllegalState("no scratch directory"))
    }

    fn scratch_mut(&mut self) -> Result<&mut Scratch> {
        self.scratch
            .as_mut()
            .ok_or(PagesortError::IllegalState("no scratch directory"))
    }

    /// Append the window's valid elements to the page file, in order
    pub fn append_window(&mut self, window: &Window) -> Result<()> {
        self.ensure_scratch()?;
        let scratch = self.scratch_mut()?;
        let mut writer = RunWriter::append(&scratch.page_path())?;
        for &value in window.values() {
            writer.push(value)?;
        }
        writer.finish()?;
        scratch.committed += window.len();
        Ok(())
    }

    /// Read `count` elements starting at `offset` into a fresh read-cache
    /// window. A negative `offset` counts from the end of the committed
    /// prefix and is resolved before bounds checking.
    pub fn read_range(&self, offset: i64, count: usize) -> Result<Window> {
        let scratch = self.scratch()?;
        let committed = scratch.committed as i64;
        let start = if offset < 0 { committed + offset } else { offset };
        if start < 0 || start + count as i64 > committed {
            return Err(PagesortError::InvalidArgument(format!(
                "range {offset}+{count} outside committed length {committed}"
            )));
        }
        let start = start as usize;
        let mut reader = RunReader::open_range(&scratch.page_path(), start, count)?;
        let mut values = Vec::with_capacity(count);
        while let Some(value) = reader.next()? {
            values.push(value);
        }
        Ok(Window::read_cache(start, values, self.capacity))
    }

    /// Path of slot file `index` (`{index}.dat`)
    pub fn slot_path(&self, index: usize) -> Result<PathBuf> {
        Ok(self.scratch()?.dir.path().join(format!("{index}.dat")))
    }

    /// Path for a fresh merge temporary (`temp_{id}.dat`)
    pub fn next_temp_path(&mut self) -> Result<PathBuf> {
        let scratch = self.scratch_mut()?;
        scratch.temp_counter += 1;
        Ok(scratch
            .dir
            .path()
            .join(format!("temp_{}.dat", scratch.temp_counter)))
    }

    /// Atomically replace the page file with `path`. The element count
    /// must be unchanged, so `committed` stays as-is.
    pub fn replace_page(&mut self, path: &Path) -> Result<()> {
        let page = self.scratch()?.page_path();
        fs::rename(path, page)?;
        Ok(())
    }

    /// Delete the page file and scratch directory recursively
    pub fn purge(&mut self) -> Result<()> {
        if let Some(scratch) = self.scratch.take() {
            scratch.dir.close()?;
        }
        Ok(())
    }
}
