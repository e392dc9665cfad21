use std::io::BufRead;

use bstr::{ByteSlice, io::BufReadExt};

use crate::array::PagedArray;
use crate::error::{PagesortError, Result};

/// Append one parsed integer per line into the array.
///
/// Lines are split on `\n`; surrounding whitespace is trimmed and blank
/// lines are skipped. A line that does not parse as an i64 is an error.
pub fn append_values<R: BufRead>(reader: R, array: &mut PagedArray) -> Result<()> {
    for line in reader.byte_lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed
            .to_str()
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| PagesortError::BadInteger(trimmed.as_bstr().to_string()))?;
        array.append(value)?;
    }
    Ok(())
}
