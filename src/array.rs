//! The paging array: an i64 sequence bigger than its memory budget
//!
//! Owns one resident [`Window`] and one [`PageStore`]. Appends land in a
//! tail window; when it fills, it is paged out and a fresh tail starts.
//! Random-access reads outside the resident range page in the aligned
//! block containing the index. `sort` hands off to the external sorter.

use crate::error::{PagesortError, Result};
use crate::sorter;
use crate::store::PageStore;
use crate::window::Window;

/// Out-of-core array of signed 64-bit integers
pub struct PagedArray {
    capacity: usize,
    size: usize,
    window: Window,
    store: PageStore,
    disposed: bool,
}

impl PagedArray {
    /// Create an empty array holding at most `capacity_hint` elements in
    /// memory, rounded down to a positive multiple of 8.
    pub fn new(capacity_hint: usize) -> Result<Self> {
        let capacity = (capacity_hint / 8) * 8;
        if capacity == 0 {
            return Err(PagesortError::InvalidArgument(format!(
                "capacity hint {capacity_hint} rounds down to zero"
            )));
        }
        Ok(Self {
            capacity,
            size: 0,
            window: Window::new_tail(capacity),
            store: PageStore::new(capacity),
            disposed: false,
        })
    }

    /// Resident element budget after rounding
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of elements appended so far
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn check_live(&self) -> Result<()> {
        if self.disposed {
            Err(PagesortError::IllegalState("array has been disposed"))
        } else {
            Ok(())
        }
    }

    /// Append one element at the logical end
    pub fn append(&mut self, value: i64) -> Result<()> {
        self.check_live()?;
        if !self.window.is_tail() {
            // Resuming writes after a random-access read: the read window
            // caches committed data, so it is abandoned unsaved and a
            // fresh tail starts at the current end.
            self.window.reset(self.size, true);
        }
        if self.window.is_full() {
            self.store.append_window(&self.window)?;
            self.window.reset(self.size, true);
        }
        self.window.push(value);
        self.size += 1;
        Ok(())
    }

    /// Element at `index`, paging in its block if it is not resident
    pub fn get(&mut self, index: usize) -> Result<i64> {
        self.check_live()?;
        if index >= self.size {
            return Err(PagesortError::InvalidArgument(format!(
                "index {index} out of range for length {}",
                self.size
            )));
        }
        if self.window.contains(index) {
            return Ok(self.window.get(index));
        }
        if self.window.is_tail() {
            if !self.store.has_scratch() {
                // Nothing ever paged, so the tail must cover 0..size
                return Err(PagesortError::IllegalState(
                    "index missing from the only resident window",
                ));
            }
            self.store.append_window(&self.window)?;
        }
        let block_start = (index / self.capacity) * self.capacity;
        let count = self.capacity.min(self.size - block_start);
        self.window = self.store.read_range(block_start as i64, count)?;
        Ok(self.window.get(index))
    }

    /// Sort the whole array ascending.
    ///
    /// On return the array is in random-access mode with the first block
    /// resident (or, if nothing was ever paged, with the sorted tail
    /// still resident). A failed sort leaves the array unusable; dispose
    /// it and start over.
    pub fn sort(&mut self) -> Result<()> {
        self.check_live()?;
        sorter::sort(&mut self.store, &mut self.window, self.size, self.capacity)
    }

    /// Release the scratch directory and make the array permanently
    /// inert. Idempotent; every other operation afterwards fails.
    pub fn dispose(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;
        self.window.reset(0, false);
        if self.store.has_scratch() {
            self.store.purge()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_rounds_down_to_multiple_of_8() {
        assert_eq!(PagedArray::new(8).unwrap().capacity(), 8);
        assert_eq!(PagedArray::new(15).unwrap().capacity(), 8);
        assert_eq!(PagedArray::new(4096).unwrap().capacity(), 4096);
    }

    #[test]
    fn test_capacity_rounding_to_zero_rejected() {
        for hint in [0, 1, 5, 7] {
            assert!(matches!(
                PagedArray::new(hint),
                Err(PagesortError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_append_and_get_within_one_window() {
        let mut array = PagedArray::new(8).unwrap();
        for v in 0..8 {
            array.append(v).unwrap();
        }
        assert_eq!(array.len(), 8);
        for i in 0..8 {
            assert_eq!(array.get(i).unwrap(), i as i64);
        }
    }

    #[test]
    fn test_append_pages_out_across_blocks() {
        let mut array = PagedArray::new(8).unwrap();
        for v in 0..30 {
            array.append(v).unwrap();
        }
        assert_eq!(array.len(), 30);
        // Walk backwards to force page-ins of every block
        for i in (0..30).rev() {
            assert_eq!(array.get(i).unwrap(), i as i64);
        }
    }

    #[test]
    fn test_get_out_of_range() {
        let mut array = PagedArray::new(8).unwrap();
        array.append(1).unwrap();
        assert!(matches!(
            array.get(1),
            Err(PagesortError::InvalidArgument(_))
        ));
        assert!(matches!(
            array.get(usize::MAX),
            Err(PagesortError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_append_resumes_after_read() {
        let mut array = PagedArray::new(8).unwrap();
        for v in 0..20 {
            array.append(v).unwrap();
        }
        // Page in block 0, then keep appending
        assert_eq!(array.get(0).unwrap(), 0);
        for v in 20..29 {
            array.append(v).unwrap();
        }
        assert_eq!(array.len(), 29);
        for i in 0..29 {
            assert_eq!(array.get(i).unwrap(), i as i64);
        }
    }

    #[test]
    fn test_dispose_is_terminal_and_idempotent() {
        let mut array = PagedArray::new(8).unwrap();
        for v in 0..20 {
            array.append(v).unwrap();
        }
        array.dispose().unwrap();

        assert!(matches!(
            array.append(1),
            Err(PagesortError::IllegalState(_))
        ));
        assert!(matches!(array.get(0), Err(PagesortError::IllegalState(_))));
        assert!(matches!(array.sort(), Err(PagesortError::IllegalState(_))));
        array.dispose().unwrap();
    }
}
