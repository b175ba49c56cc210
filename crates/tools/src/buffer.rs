//! Growable byte buffer with a hard size limit.
//!
//! Readers are drained in fixed-size chunks; the limit is checked before each
//! chunk is appended so oversized input is rejected without first allocating it.

use std::fmt;
use std::io::{self, Read};

const CHUNK: usize = 16 * 1024;

#[derive(Debug)]
pub enum BufferError {
    LimitExceeded { limit: usize },
    Io(io::Error),
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::LimitExceeded { limit } => {
                write!(f, "input exceeds the {limit} byte limit")
            }
            BufferError::Io(err) => write!(f, "read failed: {err}"),
        }
    }
}

impl std::error::Error for BufferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BufferError::Io(err) => Some(err),
            BufferError::LimitExceeded { .. } => None,
        }
    }
}

impl From<io::Error> for BufferError {
    fn from(err: io::Error) -> Self {
        BufferError::Io(err)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Buffer {
    bytes: Vec<u8>,
    limit: usize,
}

impl Buffer {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Append `data`, failing without modification when the limit would be exceeded.
    pub fn push(&mut self, data: &[u8]) -> Result<(), BufferError> {
        if self.bytes.len().saturating_add(data.len()) > self.limit {
            return Err(BufferError::LimitExceeded { limit: self.limit });
        }
        self.grow_for(data.len());
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    /// Drain `reader` to EOF. Returns the number of bytes appended.
    pub fn read_from(&mut self, mut reader: impl Read) -> Result<usize, BufferError> {
        let mut chunk = [0u8; CHUNK];
        let mut total = 0usize;
        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => return Ok(total),
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            self.push(&chunk[..n])?;
            total += n;
        }
    }

    fn grow_for(&mut self, extra: usize) {
        let needed = self.bytes.len() + extra;
        if needed <= self.bytes.capacity() {
            return;
        }
        let doubled = self.bytes.capacity().max(256).saturating_mul(2);
        let target = doubled.max(needed).min(self.limit.max(needed));
        self.bytes.reserve_exact(target - self.bytes.len());
    }
}
