//! The single resident in-memory segment of the paged array
//!
//! Exactly one window is live per array. A *tail* window is the writable,
//! not-yet-persisted segment at the logical end; a non-tail window is a
//! read-only cache of a committed range and is dropped (never re-saved)
//! when superseded.

/// Fixed-capacity run of elements resident in memory
pub struct Window {
    /// Logical index of the first element
    offset: usize,
    /// Valid elements, at most `capacity`
    data: Vec<i64>,
    /// Maximum number of resident elements
    capacity: usize,
    /// Whether this window is the writable tail
    tail: bool,
}

impl Window {
    /// Create an empty tail window at logical offset 0
    pub fn new_tail(capacity: usize) -> Self {
        Self {
            offset: 0,
            data: Vec::with_capacity(capacity),
            capacity,
            tail: true,
        }
    }

    /// Create a read-only cache of a committed range
    pub fn read_cache(offset: usize, values: Vec<i64>, capacity: usize) -> Self {
        Self {
            offset,
            data: values,
            capacity,
            tail: false,
        }
    }

    /// Discard current contents and re-base the window. No I/O.
    pub fn reset(&mut self, offset: usize, tail: bool) {
        self.data.clear();
        self.offset = offset;
        self.tail = tail;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }

    pub fn is_tail(&self) -> bool {
        self.tail
    }

    /// Whether `index` falls inside the resident range
    pub fn contains(&self, index: usize) -> bool {
        index >= self.offset && index < self.offset + self.data.len()
    }

    /// Element at logical `index`; caller must check `contains` first
    pub fn get(&self, index: usize) -> i64 {
        self.data[index - self.offset]
    }

    /// Append one element; caller must ensure the window is a non-full tail
    pub fn push(&mut self, value: i64) {
        debug_assert!(self.tail && !self.is_full());
        self.data.push(value);
    }

    pub fn values(&self) -> &[i64] {
        &self.data
    }

    pub fn into_values(self) -> Vec<i64> {
        self.data
    }

    /// Sort the resident elements ascending
    pub fn sort_in_place(&mut self) {
        self.data.sort_unstable();
    }
}
