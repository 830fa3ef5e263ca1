use std::fs::File;
use std::io::{BufReader, Read, Seek};

use zip::result::ZipError;

use crate::error::{Error, Result};

/// Random access to the entries of a package archive.
///
/// Extraction lists every name up front, validates all of them, and only
/// then opens entries one at a time.
pub trait PackageArchive {
    /// Entry names in archive order, exactly as stored.
    fn entry_names(&self) -> Vec<String>;

    fn open_entry(&mut self, name: &str) -> Result<Box<dyn Read + '_>>;
}

/// A `.nupkg` (ZIP container) backed by any seekable reader.
pub struct ZipPackage<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
}

impl ZipPackage<BufReader<File>> {
    /// Read the package from an already opened file, from its current position.
    pub fn from_file(file: File) -> Result<Self> {
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipPackage<R> {
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader).map_err(corrupted)?;
        Ok(Self { archive })
    }
}

impl<R: Read + Seek> PackageArchive for ZipPackage<R> {
    fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_owned).collect()
    }

    fn open_entry(&mut self, name: &str) -> Result<Box<dyn Read + '_>> {
        match self.archive.by_name(name) {
            Ok(file) => Ok(Box::new(file)),
            Err(ZipError::FileNotFound) => Err(Error::EntryNotFound {
                entry: name.to_string(),
            }),
            Err(ZipError::Io(source)) => Err(Error::EntryRead {
                entry: name.to_string(),
                source,
            }),
            Err(e) => Err(corrupted(e)),
        }
    }
}

fn corrupted(e: ZipError) -> Error {
    Error::Corrupted {
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn package(entries: &[(&str, &[u8])]) -> Cursor<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn lists_names_in_archive_order() {
        let archive = ZipPackage::new(package(&[
            ("test.nuspec", b"<package/>"),
            ("lib/net45/test.dll", b"MZ"),
            ("[Content_Types].xml", b"<Types/>"),
        ]))
        .unwrap();
        assert_eq!(
            archive.entry_names(),
            vec!["test.nuspec", "lib/net45/test.dll", "[Content_Types].xml"]
        );
    }

    #[test]
    fn opens_entry_by_name() {
        let mut archive = ZipPackage::new(package(&[("readme.txt", b"hello")])).unwrap();
        let mut content = String::new();
        archive
            .open_entry("readme.txt")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "hello");
    }

    #[test]
    fn missing_entry() {
        let mut archive = ZipPackage::new(package(&[("readme.txt", b"hello")])).unwrap();
        assert!(matches!(
            archive.open_entry("other.txt"),
            Err(Error::EntryNotFound { .. })
        ));
    }

    #[test]
    fn rejects_non_zip_bytes() {
        let result = ZipPackage::new(Cursor::new(b"definitely not a zip".to_vec()));
        assert!(matches!(result, Err(Error::Corrupted { .. })));
    }
}
