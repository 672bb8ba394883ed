//! In-memory source and platform used by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use adupload_protocol::ProcessingStatus;
use adupload_transfer::{ByteRange, ChunkAck};

use crate::error::UploadError;
use crate::platform::{SessionStart, UploadFuture, VideoPlatform, VideoSource};

/// Serves a fixed byte buffer and records every requested range.
pub struct MockSource {
    data: Vec<u8>,
    probe_error: Mutex<Option<UploadError>>,
    fetch_errors: Mutex<VecDeque<UploadError>>,
    ranges: Mutex<Vec<ByteRange>>,
}

impl MockSource {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            probe_error: Mutex::new(None),
            fetch_errors: Mutex::new(VecDeque::new()),
            ranges: Mutex::new(Vec::new()),
        }
    }

    /// Source of `len` bytes where byte `i` is `i % 251`.
    pub fn patterned(len: usize) -> Self {
        Self::new((0..len).map(|i| (i % 251) as u8).collect())
    }

    pub fn fail_probe(&self, err: UploadError) {
        *self.probe_error.lock().unwrap() = Some(err);
    }

    pub fn fail_next_fetch(&self, err: UploadError) {
        self.fetch_errors.lock().unwrap().push_back(err);
    }

    pub fn ranges(&self) -> Vec<ByteRange> {
        self.ranges.lock().unwrap().clone()
    }
}

impl VideoSource for MockSource {
    fn probe_size<'a>(&'a self, _url: &'a str) -> UploadFuture<'a, u64> {
        let result = match self.probe_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(self.data.len() as u64),
        };
        Box::pin(async move { result })
    }

    fn fetch_range<'a>(&'a self, _url: &'a str, range: ByteRange) -> UploadFuture<'a, Vec<u8>> {
        self.ranges.lock().unwrap().push(range);
        let result = match self.fetch_errors.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(self.data[range.start as usize..=range.end as usize].to_vec()),
        };
        Box::pin(async move { result })
    }
}

/// A call observed by [`MockPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Start { file_size: u64 },
    Transfer { session_id: String, offset: u64, len: u64 },
    Finish { session_id: String },
    Status { video_id: String },
}

/// Scripted response to one transfer call.
#[derive(Debug, Clone)]
pub enum Ack {
    /// Acknowledge every byte sent.
    Full,
    /// Acknowledge up to this offset.
    Next(u64),
    Fail(UploadError),
}

/// Scripted platform. Unscripted calls succeed: sessions `s1`, `s2`, ...
/// start at offset zero, transfers are fully acknowledged, finish succeeds
/// and status reports `default_status`.
pub struct MockPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    starts: Mutex<VecDeque<Result<SessionStart, UploadError>>>,
    acks: Mutex<VecDeque<Ack>>,
    finishes: Mutex<VecDeque<Result<(), UploadError>>>,
    statuses: Mutex<VecDeque<Result<ProcessingStatus, UploadError>>>,
    default_status: Mutex<ProcessingStatus>,
    session_count: Mutex<u32>,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            starts: Mutex::new(VecDeque::new()),
            acks: Mutex::new(VecDeque::new()),
            finishes: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(VecDeque::new()),
            default_status: Mutex::new(ProcessingStatus::Ready),
            session_count: Mutex::new(0),
        }
    }

    pub fn push_start(&self, result: Result<SessionStart, UploadError>) {
        self.starts.lock().unwrap().push_back(result);
    }

    pub fn push_ack(&self, ack: Ack) {
        self.acks.lock().unwrap().push_back(ack);
    }

    pub fn push_finish(&self, result: Result<(), UploadError>) {
        self.finishes.lock().unwrap().push_back(result);
    }

    pub fn push_status(&self, result: Result<ProcessingStatus, UploadError>) {
        self.statuses.lock().unwrap().push_back(result);
    }

    pub fn set_default_status(&self, status: ProcessingStatus) {
        *self.default_status.lock().unwrap() = status;
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn start_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, PlatformCall::Start { .. }))
            .count()
    }

    /// `(session_id, offset, len)` of every transfer, in order.
    pub fn transfers(&self) -> Vec<(String, u64, u64)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PlatformCall::Transfer {
                    session_id,
                    offset,
                    len,
                } => Some((session_id, offset, len)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl VideoPlatform for MockPlatform {
    fn start<'a>(&'a self, _account_id: &'a str, file_size: u64) -> UploadFuture<'a, SessionStart> {
        self.record(PlatformCall::Start { file_size });
        let result = self.starts.lock().unwrap().pop_front().unwrap_or_else(|| {
            let mut count = self.session_count.lock().unwrap();
            *count += 1;
            Ok(SessionStart {
                session_id: format!("s{count}"),
                video_id: format!("v{count}"),
                start_offset: 0,
            })
        });
        Box::pin(async move { result })
    }

    fn transfer<'a>(
        &'a self,
        _account_id: &'a str,
        session_id: &'a str,
        offset: u64,
        chunk: Vec<u8>,
    ) -> UploadFuture<'a, ChunkAck> {
        let len = chunk.len() as u64;
        self.record(PlatformCall::Transfer {
            session_id: session_id.to_string(),
            offset,
            len,
        });
        let ack = self.acks.lock().unwrap().pop_front().unwrap_or(Ack::Full);
        let result = match ack {
            Ack::Full => Ok(ChunkAck {
                next_offset: offset + len,
            }),
            Ack::Next(next_offset) => Ok(ChunkAck { next_offset }),
            Ack::Fail(err) => Err(err),
        };
        Box::pin(async move { result })
    }

    fn finish<'a>(&'a self, _account_id: &'a str, session_id: &'a str) -> UploadFuture<'a, ()> {
        self.record(PlatformCall::Finish {
            session_id: session_id.to_string(),
        });
        let result = self.finishes.lock().unwrap().pop_front().unwrap_or(Ok(()));
        Box::pin(async move { result })
    }

    fn video_status<'a>(&'a self, video_id: &'a str) -> UploadFuture<'a, ProcessingStatus> {
        self.record(PlatformCall::Status {
            video_id: video_id.to_string(),
        });
        let default = *self.default_status.lock().unwrap();
        let result = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(default));
        Box::pin(async move { result })
    }
}
