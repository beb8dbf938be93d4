use bytes::Bytes;

/// The `[start_offset, end_offset)` byte span of one payload in the network's storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkRange {
    pub start_offset: u64,
    pub end_offset:   u64,
}

impl ChunkRange {
    pub fn new(start_offset: u64, end_offset: u64) -> Self {
        Self {
            start_offset,
            end_offset,
        }
    }

    /// Payload size in bytes, or `None` when the range is inverted.
    pub fn len(&self) -> Option<u64> { self.end_offset.checked_sub(self.start_offset) }

    pub fn is_empty(&self) -> bool { self.start_offset >= self.end_offset }
}

/// One unit returned by a chunk fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkRecord {
    /// How far the offset cursor advances past this chunk.
    pub parsed_length: u64,

    /// Bytes appended to the reconstructed payload.
    pub raw_bytes: Bytes,
}

impl ChunkRecord {
    /// A record whose advance equals its byte length.
    pub fn from_bytes(raw_bytes: impl Into<Bytes>) -> Self {
        let raw_bytes = raw_bytes.into();
        Self {
            parsed_length: raw_bytes.len() as u64,
            raw_bytes,
        }
    }
}
