//! `Range` request header parsing
//!
//! Only the `bytes` unit is understood. Parsing keeps every requested range
//! so callers can reject multi-range requests before resolving sizes.

use thiserror::Error;

/// Errors from a `Range` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("malformed range header")]
    Malformed,
    #[error("range not satisfiable")]
    Unsatisfiable,
}

/// One requested range, before the resource size is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// `first-last`, both inclusive
    FromTo(u64, u64),
    /// `first-`
    From(u64),
    /// `-count`: the final `count` bytes
    Suffix(u64),
}

/// A concrete byte range within a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub length: u64,
}

impl ByteRange {
    /// Inclusive last byte offset
    pub fn end(&self) -> u64 {
        self.start + self.length - 1
    }

    /// `Content-Range` value for a resource of `size` bytes
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end(), size)
    }
}

impl RangeSpec {
    /// Clamp to a resource of `size` bytes.
    ///
    /// Ranges starting at or beyond the end, and empty ranges, are unsatisfiable.
    pub fn resolve(self, size: u64) -> Result<ByteRange, RangeError> {
        let (start, length) = match self {
            Self::FromTo(start, end) => {
                if start >= size {
                    return Err(RangeError::Unsatisfiable);
                }
                let end = end.min(size - 1);
                (start, end - start + 1)
            }
            Self::From(start) => {
                if start >= size {
                    return Err(RangeError::Unsatisfiable);
                }
                (start, size - start)
            }
            Self::Suffix(count) => {
                let count = count.min(size);
                (size - count, count)
            }
        };
        if length == 0 {
            return Err(RangeError::Unsatisfiable);
        }
        Ok(ByteRange { start, length })
    }
}

/// Parse a `Range` header value into its requested ranges
pub fn parse(header: &str) -> Result<Vec<RangeSpec>, RangeError> {
    let ranges = header
        .trim()
        .strip_prefix("bytes=")
        .ok_or(RangeError::Malformed)?;

    let mut specs = Vec::new();
    for part in ranges.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (first, last) = part.split_once('-').ok_or(RangeError::Malformed)?;
        let (first, last) = (first.trim(), last.trim());

        let spec = match (first.is_empty(), last.is_empty()) {
            (true, true) => return Err(RangeError::Malformed),
            (true, false) => RangeSpec::Suffix(parse_offset(last)?),
            (false, true) => RangeSpec::From(parse_offset(first)?),
            (false, false) => {
                let (first, last) = (parse_offset(first)?, parse_offset(last)?);
                if first > last {
                    return Err(RangeError::Malformed);
                }
                RangeSpec::FromTo(first, last)
            }
        };
        specs.push(spec);
    }

    if specs.is_empty() {
        return Err(RangeError::Malformed);
    }
    Ok(specs)
}

fn parse_offset(value: &str) -> Result<u64, RangeError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeError::Malformed);
    }
    value.parse().map_err(|_| RangeError::Malformed)
}
