//! Zlib (de)compression of packet bodies, applied once a `SetCompression` threshold has been
//! negotiated.

use crate::Error;
use flate2::Compression;
use flate2::bufread::ZlibEncoder;
use flate2::write::ZlibDecoder;
use std::io::{Read, Write};

/// Compression level used for every packet, matching vanilla's own zlib tuning: fast enough for
/// a busy connection without leaving much size on the table.
const LEVEL: Compression = Compression::new(4);

/// Compresses a packet body (packet id + fields) with zlib.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut encoder = ZlibEncoder::new(data, LEVEL);
    let mut out = Vec::with_capacity(data.len());
    encoder.read_to_end(&mut out)?;
    Ok(out)
}

/// Decompresses a zlib-compressed packet body and checks it against the length the sender
/// declared in `uncompressedDataSize`.
pub fn decompress(data: &[u8], expected_len: usize) -> Result<Vec<u8>, Error> {
    let mut decoder = ZlibDecoder::new(Vec::with_capacity(expected_len));
    decoder.write_all(data)?;
    let decompressed = decoder.finish()?;

    if decompressed.len() != expected_len {
        return Err(Error::DecompressionMismatch {
            expected: expected_len as packets::VarInt,
            actual: decompressed.len() as packets::VarInt,
        });
    }

    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_data() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(16);
        let compressed = compress(&data).expect("failed to compress");
        let decompressed = decompress(&compressed, data.len()).expect("failed to decompress");
        assert_eq!(data, decompressed);
    }

    #[test]
    fn round_trips_empty_data() {
        let compressed = compress(&[]).expect("failed to compress");
        let decompressed = decompress(&compressed, 0).expect("failed to decompress");
        assert!(decompressed.is_empty());
    }

    #[test]
    fn rejects_length_mismatch() {
        let data = b"mismatched".to_vec();
        let compressed = compress(&data).expect("failed to compress");
        let err = decompress(&compressed, data.len() + 1).expect_err("should reject mismatch");
        assert!(matches!(err, Error::DecompressionMismatch { .. }));
    }
}
