use crate::TransferError;

/// Inclusive byte range `[start, end]` of the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Range starting at `cursor`, at most `chunk_size` bytes long, clipped to
    /// the end of a `total_size`-byte file. `None` once `cursor` reaches the end.
    pub fn at(cursor: u64, total_size: u64, chunk_size: u64) -> Option<Self> {
        if cursor >= total_size || chunk_size == 0 {
            return None;
        }
        let end = cursor.saturating_add(chunk_size - 1).min(total_size - 1);
        Some(Self { start: cursor, end })
    }

    /// Number of bytes covered.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always `false`: a range covers at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value of an HTTP `Range` request header for this range.
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

impl std::fmt::Display for ByteRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Fixed chunking policy for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePlan {
    total_size: u64,
    chunk_size: u64,
}

impl RangePlan {
    pub fn new(total_size: u64, chunk_size: u64) -> Result<Self, TransferError> {
        if chunk_size == 0 {
            return Err(TransferError::ZeroChunkSize);
        }
        Ok(Self {
            total_size,
            chunk_size,
        })
    }

    /// Range to request next when the platform expects data from `cursor`.
    pub fn range_at(&self, cursor: u64) -> Option<ByteRange> {
        ByteRange::at(cursor, self.total_size, self.chunk_size)
    }

    /// Number of requests needed when every chunk is acknowledged in full.
    pub fn chunk_count(&self) -> u64 {
        self.total_size.div_ceil(self.chunk_size)
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }
}
