//! Storage collaborators: where documents are read from and written to.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use super::error::StorageError;
use super::location::Location;

/// Opens byte streams for locations chosen by the user.
pub trait Storage {
    /// Open a read stream for `location`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the location cannot be opened.
    fn open_read(&mut self, location: &Location) -> Result<Box<dyn Read + '_>, StorageError>;

    /// Open a write stream for `location`, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the location cannot be created.
    fn open_write(&mut self, location: &Location) -> Result<Box<dyn Write + '_>, StorageError>;
}

/// Read everything at `location`.
///
/// # Errors
///
/// Propagates open failures and maps stream errors to [`StorageError::Read`].
pub fn read_all(storage: &mut dyn Storage, location: &Location) -> Result<Vec<u8>, StorageError> {
    let mut reader = storage.open_read(location)?;
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| StorageError::Read {
            location: location.to_string(),
            source,
        })?;
    Ok(bytes)
}

/// Write `bytes` to `location` and flush.
///
/// # Errors
///
/// Propagates open failures and maps stream errors to [`StorageError::Write`].
pub fn write_all(
    storage: &mut dyn Storage,
    location: &Location,
    bytes: &[u8],
) -> Result<(), StorageError> {
    let mut writer = storage.open_write(location)?;
    let to_storage_error = |source| StorageError::Write {
        location: location.to_string(),
        source,
    };
    writer.write_all(bytes).map_err(to_storage_error)?;
    writer.flush().map_err(to_storage_error)
}

/// Filesystem storage; a location's string form is a path.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorage;

impl FsStorage {
    pub const fn new() -> Self {
        Self
    }
}

impl Storage for FsStorage {
    fn open_read(&mut self, location: &Location) -> Result<Box<dyn Read + '_>, StorageError> {
        let file = File::open(location.to_path()).map_err(|source| StorageError::Open {
            location: location.to_string(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn open_write(&mut self, location: &Location) -> Result<Box<dyn Write + '_>, StorageError> {
        let file = File::create(location.to_path()).map_err(|source| StorageError::Open {
            location: location.to_string(),
            source,
        })?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// Failure to inject into a [`MemoryStorage`] location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Opening the location fails.
    Deny,
    /// Opening succeeds but every read or write on the stream fails.
    Break,
}

/// In-memory storage keyed by location string, with fault injection.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    files: HashMap<String, Vec<u8>>,
    read_faults: HashMap<String, Fault>,
    write_faults: HashMap<String, Fault>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, location: &str, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(location.to_string(), content.into());
        self
    }

    pub fn file(&self, location: &str) -> Option<&[u8]> {
        self.files.get(location).map(Vec::as_slice)
    }

    pub fn fail_reads(&mut self, location: &str, fault: Fault) {
        self.read_faults.insert(location.to_string(), fault);
    }

    pub fn fail_writes(&mut self, location: &str, fault: Fault) {
        self.write_faults.insert(location.to_string(), fault);
    }

    pub fn clear_faults(&mut self) {
        self.read_faults.clear();
        self.write_faults.clear();
    }

    /// Number of write streams opened so far.
    pub const fn write_count(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStorage {
    fn open_read(&mut self, location: &Location) -> Result<Box<dyn Read + '_>, StorageError> {
        let key = location.as_str();
        if self.read_faults.get(key) == Some(&Fault::Deny) {
            return Err(StorageError::Open {
                location: key.to_string(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        let Some(bytes) = self.files.get(key) else {
            return Err(StorageError::Open {
                location: key.to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        };
        if self.read_faults.get(key) == Some(&Fault::Break) {
            return Ok(Box::new(BrokenStream));
        }
        Ok(Box::new(bytes.as_slice()))
    }

    fn open_write(&mut self, location: &Location) -> Result<Box<dyn Write + '_>, StorageError> {
        let key = location.as_str();
        match self.write_faults.get(key) {
            Some(Fault::Deny) => Err(StorageError::Open {
                location: key.to_string(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            }),
            Some(Fault::Break) => {
                self.writes += 1;
                Ok(Box::new(BrokenStream))
            }
            None => {
                self.writes += 1;
                let slot = self.files.entry(key.to_string()).or_default();
                slot.clear();
                Ok(Box::new(slot))
            }
        }
    }
}

/// A stream whose every operation fails, like a disk that went away.
struct BrokenStream;

impl Read for BrokenStream {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("stream broken"))
    }
}

impl Write for BrokenStream {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("stream broken"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("stream broken"))
    }
}
