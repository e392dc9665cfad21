//! Out-of-core sorting of 64-bit integers
//!
//! [`PagedArray`] behaves like an in-memory `Vec<i64>` far larger than
//! its memory budget permits: appends beyond a fixed element capacity
//! spill to an append-only page file in a private scratch directory, and
//! `sort` runs a bounded-memory external merge sort over the spilled
//! blocks. Single-threaded and synchronous throughout; one instance,
//! one caller.

pub mod array;
pub mod cli;
pub mod error;
pub mod input;
pub mod run;
pub mod sorter;
pub mod store;
pub mod window;

pub use array::PagedArray;
pub use error::{PagesortError, Result};
