//! Wire format v1 for the delivery endpoint response body.
//!
//! A batch travels as a single JSON array whose elements are the raw record
//! payloads, embedded verbatim: `[{"a":1},{"b":2}]`. The empty batch is `[]`.
//! Earlier service generations also shipped a newline-joined variant; v1
//! retires it, and the version is carried in the endpoint path (`/v1/next`).

use bytes::{BufMut, Bytes, BytesMut};
use serde_json::value::RawValue;

use crate::{Batch, ContractError, Record};

/// Wire format version, also the endpoint path segment
pub const WIRE_VERSION: &str = "v1";

/// Encode a batch as the v1 response body.
///
/// Record payloads are embedded verbatim; the corpus loader guarantees each
/// payload is one compact JSON document.
pub fn encode_batch(batch: &Batch) -> Bytes {
    let payload_len: usize = batch.iter().map(Record::len).sum();
    let mut buf = BytesMut::with_capacity(payload_len + batch.len() + 2);

    buf.put_u8(b'[');
    for (i, record) in batch.iter().enumerate() {
        if i > 0 {
            buf.put_u8(b',');
        }
        buf.put_slice(&record.payload);
    }
    buf.put_u8(b']');

    buf.freeze()
}

/// Decode a v1 response body into ordered records.
///
/// Element payloads are copied out verbatim, whitespace-trimmed but otherwise
/// untouched.
///
/// # Errors
/// [`ContractError::WireDecode`] when the body is not a JSON array.
pub fn decode_batch(body: &[u8]) -> Result<Vec<Record>, ContractError> {
    let elements: Vec<&RawValue> = serde_json::from_slice(body)
        .map_err(|e| ContractError::wire_decode(format!("expected JSON array: {e}")))?;

    Ok(elements
        .into_iter()
        .map(|raw| Record::new(raw.get().trim().to_owned().into_bytes()))
        .collect())
}
