use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use bytes::Bytes;
use cmdlink_tctf::{FrameReader, TctfError};

use crate::cmd::FrameInput;
use crate::exit::{hex_error, io_error, tctf_error, CliError, CliResult, USAGE};

/// Collect the frames named on the command line.
///
/// Each `--hex` value is one frame. A file (or `-` for stdin) is a stream of
/// back-to-back frames split on the primary header length field.
pub fn load_frames(input: &FrameInput) -> CliResult<Vec<Bytes>> {
    if !input.hex.is_empty() {
        return input
            .hex
            .iter()
            .enumerate()
            .map(|(index, text)| {
                parse_hex(text)
                    .map(Bytes::from)
                    .map_err(|err| hex_error(&format!("--hex #{index}"), err))
            })
            .collect();
    }

    match input.file.as_deref() {
        Some(path) if path == Path::new("-") => read_stream(io::stdin().lock()),
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            read_stream(file)
        }
        None => Err(CliError::new(
            USAGE,
            "no frames given (pass a FILE, '-' for stdin, or --hex)",
        )),
    }
}

fn read_stream(source: impl Read) -> CliResult<Vec<Bytes>> {
    let mut frames = Vec::new();
    for (index, frame) in FrameReader::new(source).enumerate() {
        match frame {
            Ok(frame) => frames.push(frame),
            Err(TctfError::ConnectionClosed) => {
                return Err(CliError::new(
                    crate::exit::DATA_INVALID,
                    format!("frame {index}: input ends inside a transfer frame"),
                ));
            }
            Err(err) => return Err(tctf_error(&format!("frame {index}"), err)),
        }
    }
    tracing::debug!(frames = frames.len(), "read frame stream");
    Ok(frames)
}

/// Decode hex text, ignoring whitespace, `:` separators and a `0x` prefix.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(digits)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn hex_accepts_separators() {
        assert_eq!(parse_hex("0x00 42:0C").unwrap(), vec![0x00, 0x42, 0x0C]);
        assert!(parse_hex("0G").is_err());
        assert!(parse_hex("123").is_err());
    }

    #[test]
    fn stream_splits_on_length_field() {
        let wire = [
            0x00, 0x42, 0x0C, 0x05, 0x00, 0xAA, // 6-byte frame
            0x20, 0x42, 0x0C, 0x04, 0x00, // 5-byte frame
        ];
        let frames = read_stream(Cursor::new(wire.to_vec())).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].len(), 6);
        assert_eq!(frames[1].len(), 5);
    }

    #[test]
    fn stream_with_partial_tail_is_invalid() {
        let wire = [0x00, 0x42, 0x0C, 0x07, 0x00, 0xAA];
        let err = read_stream(Cursor::new(wire.to_vec())).unwrap_err();
        assert_eq!(err.code, crate::exit::DATA_INVALID);
    }

    #[test]
    fn hex_frames_are_kept_as_given() {
        let input = FrameInput {
            file: None,
            hex: vec!["00420C0700AABBCC".into(), "00".into()],
        };
        let frames = load_frames(&input).unwrap();
        assert_eq!(frames[0].len(), 8);
        assert_eq!(frames[1].as_ref(), &[0x00]);
    }

    #[test]
    fn no_input_is_usage_error() {
        let input = FrameInput {
            file: None,
            hex: Vec::new(),
        };
        assert_eq!(load_frames(&input).unwrap_err().code, USAGE);
    }
}
