//! External merge sort over the page file
//!
//! Sorts the whole array ascending with O(capacity) resident memory and
//! O(log(size / capacity)) slot files. Slot `i` is occupied iff bit `i`
//! of the running block count is set and then holds a sorted run of
//! exactly `capacity * 2^i` elements; folding each freshly sorted block
//! into the slot array mirrors incrementing a binary counter, with a
//! two-way merge playing the role of the carry.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{PagesortError, Result};
use crate::run::{RunReader, RunWriter};
use crate::store::PageStore;
use crate::window::Window;

/// Handle to a sorted run sitting on disk
struct Run {
    path: PathBuf,
    len: usize,
}

/// A sorted source for the two-way merge, in memory or on disk
enum Source {
    Memory(std::vec::IntoIter<i64>),
    Disk(RunReader),
}

impl Source {
    fn next(&mut self) -> io::Result<Option<i64>> {
        match self {
            Source::Memory(values) => Ok(values.next()),
            Source::Disk(reader) => reader.next(),
        }
    }
}

/// Sort the array ascending, leaving the first block resident.
///
/// Any I/O failure is fatal: the array contents can no longer be
/// trusted and the caller must dispose and reconstruct.
pub fn sort(store: &mut PageStore, window: &mut Window, size: usize, capacity: usize) -> Result<()> {
    if size == 0 {
        return Ok(());
    }
    if !store.has_scratch() {
        // Never paged: the tail window holds the whole array
        window.sort_in_place();
        return Ok(());
    }
    if window.is_tail() && !window.is_empty() {
        store.append_window(window)?;
    }

    let total_blocks = size.div_ceil(capacity);
    if total_blocks == 1 {
        // Single committed block: sort it in memory and write it back
        let mut block = store.read_range(0, size)?;
        block.sort_in_place();
        let temp = store.next_temp_path()?;
        let mut out = RunWriter::create(&temp)?;
        for &value in block.values() {
            out.push(value)?;
        }
        out.finish()?;
        store.replace_page(&temp)?;
        *window = store.read_range(0, size)?;
        return Ok(());
    }

    // Slot i can hold capacity * 2^i elements; bit width of total_blocks
    // bounds the highest index a carry can reach.
    let slot_bound = (usize::BITS - total_blocks.leading_zeros()) as usize + 1;
    let mut slots: Vec<Option<Run>> = (0..slot_bound).map(|_| None).collect();

    for block in 0..total_blocks {
        let start = block * capacity;
        let count = capacity.min(size - start);
        let mut loaded = store.read_range(start as i64, count)?;
        loaded.sort_in_place();
        carry_in(store, &mut slots, loaded.into_values())?;
    }

    // Occupied slots now spell total_blocks in binary; fold them into one
    // run, lowest index first.
    let mut merged: Option<Run> = None;
    for slot in slots.into_iter().flatten() {
        merged = Some(match merged {
            None => slot,
            Some(acc) => merge_runs(store, acc, slot)?,
        });
    }
    let sorted = merged.ok_or(PagesortError::IllegalState("sort produced no output run"))?;

    store.replace_page(&sorted.path)?;
    *window = store.read_range(0, capacity.min(size))?;
    Ok(())
}

/// Fold one freshly sorted block into the slot array, cascading carries
/// upward until an empty slot absorbs the run.
fn carry_in(store: &mut PageStore, slots: &mut Vec<Option<Run>>, values: Vec<i64>) -> Result<()> {
    let mut incoming = MemoryOrDisk::Memory(values);
    let mut level = 0;
    loop {
        if level == slots.len() {
            slots.push(None);
        }
        match slots[level].take() {
            None => {
                let slot_path = store.slot_path(level)?;
                let len = incoming.settle_at(&slot_path)?;
                slots[level] = Some(Run {
                    path: slot_path,
                    len,
                });
                return Ok(());
            }
            Some(existing) => {
                incoming = MemoryOrDisk::Disk(merge_with(store, existing, incoming)?);
                level += 1;
            }
        }
    }
}

/// A sorted run not yet settled into a slot
enum MemoryOrDisk {
    Memory(Vec<i64>),
    Disk(Run),
}

impl MemoryOrDisk {
    /// Materialize the run at `path`, returning its element count
    fn settle_at(self, path: &Path) -> Result<usize> {
        match self {
            MemoryOrDisk::Memory(values) => {
                let mut out = RunWriter::create(path)?;
                for &value in &values {
                    out.push(value)?;
                }
                Ok(out.finish()?)
            }
            MemoryOrDisk::Disk(run) => {
                fs::rename(&run.path, path)?;
                Ok(run.len)
            }
        }
    }
}

/// Two-way merge an on-disk run with a carried run into a fresh temporary
fn merge_with(store: &mut PageStore, existing: Run, carried: MemoryOrDisk) -> Result<Run> {
    let temp = store.next_temp_path()?;
    let mut out = RunWriter::create(&temp)?;
    let left = Source::Disk(RunReader::open(&existing.path)?);
    let (right, carried_path) = match carried {
        MemoryOrDisk::Memory(values) => (Source::Memory(values.into_iter()), None),
        MemoryOrDisk::Disk(run) => (Source::Disk(RunReader::open(&run.path)?), Some(run.path)),
    };
    merge_into(left, right, &mut out)?;
    let len = out.finish()?;
    fs::remove_file(&existing.path)?;
    if let Some(path) = carried_path {
        fs::remove_file(path)?;
    }
    Ok(Run { path: temp, len })
}

/// Two-way merge two settled runs, consuming both
fn merge_runs(store: &mut PageStore, a: Run, b: Run) -> Result<Run> {
    let len = a.len + b.len;
    let merged = merge_with(store, a, MemoryOrDisk::Disk(b))?;
    debug_assert_eq!(merged.len, len);
    Ok(merged)
}

/// Single forward pass over two ascending sources into one ascending
/// output; O(1) auxiliary memory beyond buffered I/O.
fn merge_into(mut left: Source, mut right: Source, out: &mut RunWriter) -> Result<()> {
    let mut a = left.next()?;
    let mut b = right.next()?;
    loop {
        match (a, b) {
            (None, None) => return Ok(()),
            (Some(x), None) => {
                out.push(x)?;
                a = left.next()?;
            }
            (None, Some(y)) => {
                out.push(y)?;
                b = right.next()?;
            }
            (Some(x), Some(y)) => {
                if x <= y {
                    out.push(x)?;
                    a = left.next()?;
                } else {
                    out.push(y)?;
                    b = right.next()?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn collect(path: &Path) -> Vec<i64> {
        let mut reader = RunReader::open(path).unwrap();
        let mut out = Vec::new();
        while let Some(v) = reader.next().unwrap() {
            out.push(v);
        }
        out
    }

    #[test]
    fn test_merge_memory_with_disk() {
        let dir = tempdir().unwrap();
        let disk_path = dir.path().join("a.dat");
        let mut w = RunWriter::create(&disk_path).unwrap();
        for v in [1i64, 4, 9] {
            w.push(v).unwrap();
        }
        w.finish().unwrap();

        let out_path = dir.path().join("out.dat");
        let mut out = RunWriter::create(&out_path).unwrap();
        let left = Source::Disk(RunReader::open(&disk_path).unwrap());
        let right = Source::Memory(vec![2i64, 3, 10].into_iter());
        merge_into(left, right, &mut out).unwrap();
        assert_eq!(out.finish().unwrap(), 6);

        assert_eq!(collect(&out_path), vec![1, 2, 3, 4, 9, 10]);
    }

    #[test]
    fn test_merge_uneven_sources() {
        let dir = tempdir().unwrap();
        let out_path = dir.path().join("out.dat");
        let mut out = RunWriter::create(&out_path).unwrap();
        let left = Source::Memory(vec![].into_iter());
        let right = Source::Memory(vec![-5i64, 0, 5].into_iter());
        merge_into(left, right, &mut out).unwrap();
        out.finish().unwrap();

        assert_eq!(collect(&out_path), vec![-5, 0, 5]);
    }
}
