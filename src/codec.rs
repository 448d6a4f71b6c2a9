use bytes::{Buf, BufMut, BytesMut};
use std::env;
use tokio_util::codec::{Decoder, Encoder};

use crate::response::Response;
use crate::Error;

/// Frames the wire protocol: inbound, one command per line (`\n`-terminated,
/// `\r\n` tolerated, lossy UTF-8); outbound, one serialized response followed
/// by exactly one `\n`.
pub struct CommandCodec;

impl CommandCodec {
    fn max_line_size() -> usize {
        env::var("MAX_LINE_SIZE")
            .map(|s| s.parse().expect("MAX_LINE_SIZE must be a number"))
            .unwrap_or(64 * 1024)
    }
}

fn take_line(src: &mut BytesMut, length: usize) -> String {
    let line = src.split_to(length);
    let line = match line.last() {
        Some(&b'\r') => &line[..length - 1],
        _ => &line[..],
    };
    String::from_utf8_lossy(line).into_owned()
}

impl Decoder for CommandCodec {
    type Item = String;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match src.iter().position(|&b| b == b'\n') {
            Some(position) => {
                let line = take_line(src, position);
                src.advance(1); // consume the newline
                Ok(Some(line))
            }
            None if src.len() > CommandCodec::max_line_size() => {
                Err("command line exceeds size limit".into())
            }
            None => Ok(None),
        }
    }

    // A final chunk without a trailing newline is still one command.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => Ok(Some(take_line(src, src.len()))),
        }
    }
}

impl Encoder<Response> for CommandCodec {
    type Error = Error;

    fn encode(&mut self, response: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let bytes = response.serialize();
        dst.reserve(bytes.len() + 1);
        dst.extend_from_slice(&bytes);
        dst.put_u8(b'\n');
        Ok(())
    }
}
