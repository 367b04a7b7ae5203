use super::{DecodeError, EncodeError, Encoding};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

/// UTF-8 JSON text encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoding;

impl JsonEncoding {
    /// Encode any serializable value, failing instead of dropping data
    /// that has no JSON representation (e.g. maps with non-string keys).
    pub fn encode_serializable<T: Serialize + ?Sized>(&self, item: &T) -> Result<Bytes, EncodeError> {
        Ok(Bytes::from(serde_json::to_vec(item)?))
    }
}

impl Encoding for JsonEncoding {
    type Item = Value;

    fn encode(&self, item: &Value) -> Result<Bytes, EncodeError> {
        self.encode_serializable(item)
    }

    fn decode(&self, payload: &[u8]) -> Result<Value, DecodeError> {
        let text = std::str::from_utf8(payload)?;
        Ok(serde_json::from_str(text)?)
    }
}
