use adupload_protocol::TransferResponse;

use crate::TransferError;

/// Platform acknowledgment of a transferred chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkAck {
    /// Offset the platform wants the next chunk to start at.
    pub next_offset: u64,
}

impl From<&TransferResponse> for ChunkAck {
    fn from(resp: &TransferResponse) -> Self {
        Self {
            next_offset: resp.next_offset(),
        }
    }
}

/// One negotiated upload session.
///
/// Owned by a single upload attempt and dropped when the attempt ends; a
/// retry negotiates a new one. Not shared across tasks, so no locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    session_id: String,
    video_id: String,
    cursor: u64,
    total_size: u64,
}

impl UploadSession {
    /// Creates a session positioned at the platform-provided `start_offset`.
    pub fn new(
        session_id: impl Into<String>,
        video_id: impl Into<String>,
        start_offset: u64,
        total_size: u64,
    ) -> Result<Self, TransferError> {
        if start_offset > total_size {
            return Err(TransferError::InvalidStartOffset {
                start_offset,
                total_size,
            });
        }
        Ok(Self {
            session_id: session_id.into(),
            video_id: video_id.into(),
            cursor: start_offset,
            total_size,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Offset the platform has accepted data up to.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Bytes still to be accepted.
    pub fn remaining(&self) -> u64 {
        self.total_size - self.cursor
    }

    /// Returns `true` once the platform has accepted the whole file.
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.total_size
    }

    /// Moves the cursor to the acknowledged offset.
    ///
    /// The acknowledgment must be strictly past the current cursor and no
    /// further than the end of the file. On error the cursor is unchanged.
    pub fn advance(&mut self, ack: ChunkAck) -> Result<u64, TransferError> {
        if ack.next_offset <= self.cursor {
            return Err(TransferError::Stalled {
                offset: self.cursor,
                next_offset: ack.next_offset,
            });
        }
        if ack.next_offset > self.total_size {
            return Err(TransferError::Overshoot {
                next_offset: ack.next_offset,
                total_size: self.total_size,
            });
        }
        self.cursor = ack.next_offset;
        Ok(self.cursor)
    }

    /// Accepted share of the file, 0-100.
    pub fn percentage(&self) -> f64 {
        if self.total_size == 0 {
            return 0.0;
        }
        self.cursor as f64 / self.total_size as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunked::ByteRange;

    fn session(start: u64, total: u64) -> UploadSession {
        UploadSession::new("s1", "v1", start, total).unwrap()
    }

    #[test]
    fn new_session_uses_platform_start_offset() {
        let s = session(512, 1024);
        assert_eq!(s.cursor(), 512);
        assert_eq!(s.remaining(), 512);
        assert!(!s.is_complete());
        assert_eq!(s.session_id(), "s1");
        assert_eq!(s.video_id(), "v1");
    }

    #[test]
    fn new_session_rejects_start_beyond_eof() {
        let err = UploadSession::new("s", "v", 11, 10).unwrap_err();
        assert_eq!(
            err,
            TransferError::InvalidStartOffset {
                start_offset: 11,
                total_size: 10
            }
        );
    }

    #[test]
    fn advance_trusts_platform_offset() {
        let mut s = session(0, 10);
        // Platform accepted fewer bytes than were sent.
        assert_eq!(s.advance(ChunkAck { next_offset: 3 }).unwrap(), 3);
        assert_eq!(
            ByteRange::at(s.cursor(), s.total_size(), 4),
            Some(ByteRange { start: 3, end: 6 })
        );
        assert_eq!(s.advance(ChunkAck { next_offset: 10 }).unwrap(), 10);
        assert!(s.is_complete());
        assert!(ByteRange::at(s.cursor(), s.total_size(), 4).is_none());
    }

    #[test]
    fn advance_rejects_no_progress() {
        let mut s = session(0, 10);
        s.advance(ChunkAck { next_offset: 4 }).unwrap();
        let err = s.advance(ChunkAck { next_offset: 4 }).unwrap_err();
        assert_eq!(
            err,
            TransferError::Stalled {
                offset: 4,
                next_offset: 4
            }
        );
        assert_eq!(s.cursor(), 4);
    }

    #[test]
    fn advance_rejects_backwards() {
        let mut s = session(6, 10);
        assert!(matches!(
            s.advance(ChunkAck { next_offset: 2 }),
            Err(TransferError::Stalled { .. })
        ));
        assert_eq!(s.cursor(), 6);
    }

    #[test]
    fn advance_rejects_overshoot() {
        let mut s = session(0, 10);
        assert!(matches!(
            s.advance(ChunkAck { next_offset: 11 }),
            Err(TransferError::Overshoot { .. })
        ));
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn ack_from_transfer_response() {
        let resp = TransferResponse {
            start_offset: 4096,
            end_offset: 8192,
        };
        assert_eq!(ChunkAck::from(&resp).next_offset, 4096);
    }

    #[test]
    fn percentage() {
        let mut s = session(0, 1000);
        s.advance(ChunkAck { next_offset: 500 }).unwrap();
        assert!((s.percentage() - 50.0).abs() < f64::EPSILON);
    }
}
