use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};

use crate::codec::decode_frame;
use crate::error::{Result, TctfError};
use crate::frame::MAX_FRAME_LENGTH;

const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads complete transfer frames from any `Read` stream.
///
/// Handles partial reads internally. Callers always get whole frames, ready
/// for [`TransferFrame::new`](crate::TransferFrame::new).
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(2 * MAX_FRAME_LENGTH),
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(TctfError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        loop {
            if let Some(frame) = decode_frame(&mut self.buf)? {
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TctfError::Io(err)),
            };

            if read == 0 {
                if !self.buf.is_empty() {
                    tracing::debug!(
                        buffered = self.buf.len(),
                        "stream closed with a partial transfer frame"
                    );
                }
                return Err(TctfError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Bytes received but not yet returned as a frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Bytes>;

    /// Yields frames until a clean end of stream.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_frame() {
            Ok(frame) => Some(Ok(frame)),
            Err(TctfError::ConnectionClosed) if self.buf.is_empty() => None,
            Err(err) => Some(Err(err)),
        }
    }
}
