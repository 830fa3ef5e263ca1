//! Content hashing for package archives.
//!
//! Digests are computed incrementally while bytes stream through a
//! [`HashingReader`], so an archive can be copied and hashed in one pass.
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use nupkg_verify::{HashingReader, Sha512Hasher};
//!
//! let mut reader = HashingReader::new(&b"hello world"[..], Sha512Hasher::new());
//! let mut buffer = Vec::new();
//! reader.read_to_end(&mut buffer).unwrap();
//!
//! reader.finish(&Sha512Hasher::digest(b"hello world")).unwrap();
//! ```

pub use self::error::{Result, VerificationError};
pub use self::hasher::{ContentHash, Hasher, Sha512Hasher};
pub use self::reader::HashingReader;

mod error;
mod hasher;
mod reader;
