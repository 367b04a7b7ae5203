use super::{DecodeError, EncodeError, Encoding};
use bytes::Bytes;

/// Pass-through encoding for opaque binary payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesEncoding;

impl Encoding for BytesEncoding {
    type Item = Bytes;

    fn encode(&self, item: &Bytes) -> Result<Bytes, EncodeError> {
        Ok(item.clone())
    }

    fn decode(&self, payload: &[u8]) -> Result<Bytes, DecodeError> {
        Ok(Bytes::copy_from_slice(payload))
    }
}
