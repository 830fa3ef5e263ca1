use std::io::{self, Read};

use crate::{ContentHash, Hasher, Result, VerificationError};

/// Streaming reader that hashes data as it passes through.
///
/// Lets a caller copy an archive and compute its digest in one pass.
pub struct HashingReader<R, H> {
    reader: R,
    hasher: H,
    bytes_read: u64,
}

impl<R, H> HashingReader<R, H> {
    pub fn new(reader: R, hasher: H) -> Self {
        Self {
            reader,
            hasher,
            bytes_read: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

impl<R: Read, H: Hasher> Read for HashingReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.bytes_read += n as u64;
        }
        Ok(n)
    }
}

impl<R: Read, H: Hasher> HashingReader<R, H> {
    /// Digest of everything read so far.
    pub fn into_hash(self) -> ContentHash {
        self.hasher.finalize()
    }

    /// Finalize against an expected digest.
    pub fn finish(self, expected: &ContentHash) -> Result<ContentHash> {
        let actual = self.hasher.finalize();
        if &actual == expected {
            Ok(actual)
        } else {
            Err(VerificationError::Mismatch {
                expected: expected.to_base64(),
                actual: actual.to_base64(),
            })
        }
    }
}
