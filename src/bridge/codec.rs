use bytes::BytesMut;
use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};
use tracing::warn;

/// Newline-delimited channel framing with a per-message size cap.
///
/// Over-long lines are discarded and decoding carries on with the next line,
/// so the stream never yields an error for them.
#[derive(Debug)]
pub struct ChannelCodec {
    inner: LinesCodec,
}

impl ChannelCodec {
    pub fn new(max_message_size: usize) -> Self {
        Self {
            inner: LinesCodec::new_with_max_length(max_message_size),
        }
    }
}

impl Decoder for ChannelCodec {
    type Item = String;
    type Error = LinesCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, LinesCodecError> {
        loop {
            match self.inner.decode(buf) {
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    warn!("Dropping message over {} bytes", self.inner.max_length());
                }
                other => return other,
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, LinesCodecError> {
        loop {
            match self.inner.decode_eof(buf) {
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    warn!("Dropping message over {} bytes", self.inner.max_length());
                }
                other => return other,
            }
        }
    }
}
