//! Record / Corpus / Batch - Pacer 的输入输出
//!
//! 不透明事件载荷与其有序容器。

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One logical event: an opaque, already-serialized payload.
///
/// The payload is a compact JSON document produced at corpus load time.
/// Nothing downstream of the loader interprets its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Serialized payload (zero-copy clone)
    pub payload: Bytes,
}

impl Record {
    /// Create a record from any byte source
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl From<&str> for Record {
    fn from(s: &str) -> Self {
        Self::new(s.to_owned().into_bytes())
    }
}

/// The fixed, ordered set of records loaded at startup.
///
/// Immutable after construction; owned exclusively by the pacer.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<Record>,
}

impl Corpus {
    /// Build a corpus from an ordered record sequence
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index`, if in range
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Contiguous half-open slice `[start, end)` as a batch.
    ///
    /// Out-of-range bounds are clamped to the corpus length.
    pub fn slice(&self, start: usize, end: usize) -> Batch {
        let end = end.min(self.records.len());
        let start = start.min(end);
        Batch {
            records: self.records[start..end].to_vec(),
        }
    }
}

impl FromIterator<Record> for Corpus {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A contiguous window of the corpus released by one pacer invocation.
///
/// Transient: constructed per call, never retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    /// Records in corpus order
    pub records: Vec<Record>,
}

impl Batch {
    /// The empty batch
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of records in the window
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the window is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl From<Vec<Record>> for Batch {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(n: usize) -> Corpus {
        (0..n)
            .map(|i| Record::new(format!("{{\"i\":{i}}}").into_bytes()))
            .collect()
    }

    #[test]
    fn test_slice_half_open() {
        let c = corpus(5);
        let batch = c.slice(1, 3);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records[0], *c.get(1).unwrap());
        assert_eq!(batch.records[1], *c.get(2).unwrap());
    }

    #[test]
    fn test_slice_clamps_out_of_range() {
        let c = corpus(3);
        assert_eq!(c.slice(0, 10).len(), 3);
        assert_eq!(c.slice(5, 10).len(), 0);
        assert!(c.slice(2, 2).is_empty());
    }

    #[test]
    fn test_record_clone_is_cheap_and_equal() {
        let r = Record::from("{\"a\":1}");
        let cloned = r.clone();
        assert_eq!(r, cloned);
        assert_eq!(cloned.len(), 7);
    }
}
