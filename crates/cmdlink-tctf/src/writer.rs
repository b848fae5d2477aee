use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, FrameHeader};
use crate::error::{Result, TctfError};
use crate::frame::{TransferFrame, MAX_FRAME_LENGTH};

/// Writes complete transfer frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MAX_FRAME_LENGTH),
        }
    }

    /// Write an already-encoded frame (blocking).
    ///
    /// Only the declared frame length is written; trailing bytes are dropped.
    pub fn write_frame(&mut self, frame: &TransferFrame<'_>) -> Result<()> {
        self.buf.clear();
        self.buf.extend_from_slice(frame.as_bytes());
        self.write_buffered()
    }

    /// Encode and send a payload under the given header.
    pub fn send(&mut self, header: &FrameHeader, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_frame(header, payload, &mut self.buf)?;
        self.write_buffered()
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(TctfError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TctfError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TctfError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::codec::decode_frame;
    use crate::frame::PRIHDR_SIZE;
    use crate::reader::FrameReader;

    #[test]
    fn write_single_frame() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(&FrameHeader::ad(3, 1, 9), b"hello").unwrap();

        let mut wire = BytesMut::from(writer.into_inner().into_inner().as_slice());
        let frame = decode_frame(&mut wire).unwrap().unwrap();
        let tf = TransferFrame::new(&frame).unwrap();
        assert_eq!(tf.spacecraft_id(), 3);
        assert_eq!(tf.seq_num(), 9);
        assert_eq!(&frame[PRIHDR_SIZE..], b"hello");
    }

    #[test]
    fn write_frame_drops_trailing_bytes() {
        let mut bytes = BytesMut::new();
        encode_frame(&FrameHeader::bd(1, 1), b"abc", &mut bytes).unwrap();
        bytes.extend_from_slice(&[0xEE; 3]);
        let tf = TransferFrame::new(&bytes).unwrap();

        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_frame(&tf).unwrap();

        assert_eq!(writer.into_inner().into_inner().len(), PRIHDR_SIZE + 3);
    }

    #[test]
    fn invalid_header_writes_nothing() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        let err = writer.send(&FrameHeader::ad(0, 99, 0), b"x").unwrap_err();
        assert!(matches!(err, TctfError::FieldOutOfRange { .. }));
        assert!(writer.get_ref().get_ref().is_empty());
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = FrameWriter::new(sink);

        writer.send(&FrameHeader::bd(0, 0), b"x").unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let writer_impl = InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        };

        let mut writer = FrameWriter::new(writer_impl);
        writer.send(&FrameHeader::bd(5, 5), b"retry").unwrap();

        assert_eq!(writer.into_inner().data.len(), PRIHDR_SIZE + 5);
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.send(&FrameHeader::bd(0, 0), b"x").unwrap_err();
        assert!(matches!(err, TctfError::ConnectionClosed));
    }

    #[test]
    fn written_bytes_read_back() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        for seq in 0..4u8 {
            writer.send(&FrameHeader::ad(1, 2, seq), &[seq; 3]).unwrap();
        }

        let wire = writer.into_inner().into_inner();
        let reader = FrameReader::new(Cursor::new(wire));
        let seqs: Vec<u8> = reader.map(|frame| frame.unwrap()[4]).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
    }

    #[test]
    #[cfg(unix)]
    fn roundtrip_over_pipe() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = FrameWriter::new(left);
        let mut reader = FrameReader::new(right);

        writer.send(&FrameHeader::bc(1, 1), &[0x00]).unwrap();
        let frame = reader.read_frame().unwrap();

        let tf = TransferFrame::new(&frame).unwrap();
        assert!(tf.bypass_flag() && tf.ctl_cmd_flag());
        assert_eq!(tf.data_field(), &[0x00]);
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
