//! Payload chunking
//!
//! Slices a payload into ordered, contiguous parts of a server-dictated
//! size. Chunk bytes are materialized up front; this is not a streaming
//! generator, the whole payload stays in memory during chunking.

use crate::error::{ClientError, Result};

/// One contiguous byte range of the payload
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Part number: 1-based, ascending, contiguous
    pub index: u32,

    /// Byte offset of the first byte
    pub start: usize,

    /// Byte offset one past the last byte
    pub end: usize,

    /// Chunk length in bytes
    pub size: usize,

    /// Materialized chunk bytes
    pub data: Vec<u8>,
}

/// Slice a payload into parts of `part_size` bytes
///
/// Produces ceil(len / part_size) chunks partitioning the payload exactly
/// once; only the final chunk may be smaller. A zero-length payload yields
/// zero chunks.
pub fn chunk_payload(data: &[u8], part_size: u64) -> Result<Vec<Chunk>> {
    if part_size == 0 {
        return Err(ClientError::InvalidPartSize(part_size));
    }

    let part_size = part_size as usize;
    let mut chunks = Vec::with_capacity(data.len().div_ceil(part_size));

    let mut start = 0usize;
    let mut index = 1u32;
    while start < data.len() {
        let end = (start + part_size).min(data.len());
        chunks.push(Chunk {
            index,
            start,
            end,
            size: end - start,
            data: data[start..end].to_vec(),
        });
        start = end;
        index += 1;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_multiple() {
        let data = vec![7u8; 12];
        let chunks = chunk_payload(&data, 4).unwrap();
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.size == 4));
    }

    #[test]
    fn test_last_chunk_smaller() {
        let data: Vec<u8> = (0..10).collect();
        let chunks = chunk_payload(&data, 4).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].size, 4);
        assert_eq!(chunks[1].size, 4);
        assert_eq!(chunks[2].size, 2);
    }

    #[test]
    fn test_chunks_partition_payload() {
        let data: Vec<u8> = (0..=255).collect();
        let chunks = chunk_payload(&data, 100).unwrap();

        let total: usize = chunks.iter().map(|c| c.size).sum();
        assert_eq!(total, data.len());

        let mut expected_start = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i as u32 + 1);
            assert_eq!(chunk.start, expected_start);
            assert_eq!(chunk.data, &data[chunk.start..chunk.end]);
            expected_start = chunk.end;
        }
        assert_eq!(expected_start, data.len());
    }

    #[test]
    fn test_part_size_larger_than_payload() {
        let data = vec![1u8; 5];
        let chunks = chunk_payload(&data, 1024).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].size, 5);
    }

    #[test]
    fn test_zero_length_payload_yields_no_chunks() {
        let chunks = chunk_payload(&[], 1024).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_zero_part_size_rejected() {
        let err = chunk_payload(&[1, 2, 3], 0).unwrap_err();
        assert!(matches!(err, ClientError::InvalidPartSize(0)));
    }
}
