//! A named-array archive for storing the index.
//!
//! The archive is a flat container of named entries: arrays of unsigned
//! 16-bit or 32-bit integers and unsigned 64-bit scalars. Writing is
//! streaming through [`ArchiveWriter`]; reading loads the whole archive
//! eagerly into an [`Archive`], from which the arrays are taken by name.
//! All values are little-endian.
//!
//! Layout: a magic number (4 bytes), a format version (1 byte), and the
//! number of entries (8 bytes), followed by the entries. Each entry stores
//! the name (1-byte length + bytes), a type tag (1 byte), the element count
//! (8 bytes), and the elements.

use crate::{Error, Result};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use std::collections::HashMap;
use std::io::{Read, Write};
use std::io;

//-----------------------------------------------------------------------------

/// Magic number: "VMAP" in ASCII, in little-endian byte order.
pub const MAGIC: u32 = 0x50414D56;

/// Current version of the archive format.
pub const VERSION: u8 = 1;

// Type tags for the entries.
const TYPE_U16: u8 = 1;
const TYPE_U32: u8 = 2;
const TYPE_SCALAR: u8 = 3;

//-----------------------------------------------------------------------------

/// Streaming writer for a named-array archive.
///
/// The number of entries is declared up front; [`ArchiveWriter::finish`]
/// fails if a different number was written.
pub struct ArchiveWriter<W: Write> {
    inner: W,
    declared: usize,
    written: usize,
}

impl<W: Write> ArchiveWriter<W> {
    /// Creates a writer and writes the archive header.
    pub fn new(mut inner: W, entries: usize) -> io::Result<Self> {
        inner.write_u32::<LittleEndian>(MAGIC)?;
        inner.write_u8(VERSION)?;
        inner.write_u64::<LittleEndian>(entries as u64)?;
        Ok(ArchiveWriter { inner, declared: entries, written: 0 })
    }

    fn entry_header(&mut self, name: &str, type_tag: u8, len: usize) -> io::Result<()> {
        if name.len() > u8::MAX as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("array name {} is too long", name),
            ));
        }
        self.inner.write_u8(name.len() as u8)?;
        self.inner.write_all(name.as_bytes())?;
        self.inner.write_u8(type_tag)?;
        self.inner.write_u64::<LittleEndian>(len as u64)?;
        self.written += 1;
        Ok(())
    }

    /// Writes an array of 16-bit values.
    pub fn write_u16_array(&mut self, name: &str, data: &[u16]) -> io::Result<()> {
        self.entry_header(name, TYPE_U16, data.len())?;
        for value in data {
            self.inner.write_u16::<LittleEndian>(*value)?;
        }
        Ok(())
    }

    /// Writes an array of 32-bit values.
    pub fn write_u32_array(&mut self, name: &str, data: &[u32]) -> io::Result<()> {
        self.entry_header(name, TYPE_U32, data.len())?;
        for value in data {
            self.inner.write_u32::<LittleEndian>(*value)?;
        }
        Ok(())
    }

    /// Writes a scalar value.
    pub fn write_scalar(&mut self, name: &str, value: u64) -> io::Result<()> {
        self.entry_header(name, TYPE_SCALAR, 1)?;
        self.inner.write_u64::<LittleEndian>(value)
    }

    /// Flushes the writer and returns the underlying stream.
    ///
    /// Fails if the number of written entries does not match the declared
    /// number.
    pub fn finish(mut self) -> io::Result<W> {
        if self.written != self.declared {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} entries declared, {} written", self.declared, self.written),
            ));
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

//-----------------------------------------------------------------------------

// One loaded entry.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Entry {
    U16(Vec<u16>),
    U32(Vec<u32>),
    Scalar(u64),
}

impl Entry {
    fn type_name(&self) -> &'static str {
        match self {
            Entry::U16(_) => "u16 array",
            Entry::U32(_) => "u32 array",
            Entry::Scalar(_) => "scalar",
        }
    }
}

/// An eagerly loaded named-array archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Archive {
    entries: HashMap<String, Entry>,
}

impl Archive {
    /// Loads an archive from the reader.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Archive`] on an invalid magic number, an
    /// unsupported version, or a duplicate entry name, and with
    /// [`Error::Io`] on a truncated stream.
    pub fn load<R: Read>(reader: &mut R) -> Result<Self> {
        let magic = reader.read_u32::<LittleEndian>()?;
        if magic != MAGIC {
            return Err(Error::Archive(format!("invalid magic number {:#010x}", magic)));
        }
        let version = reader.read_u8()?;
        if version != VERSION {
            return Err(Error::Archive(format!("unsupported version {}", version)));
        }

        let count = reader.read_u64::<LittleEndian>()?;
        let mut entries: HashMap<String, Entry> = HashMap::new();
        for _ in 0..count {
            let name_len = reader.read_u8()? as usize;
            let mut name = vec![0; name_len];
            reader.read_exact(&mut name)?;
            let name = String::from_utf8(name).map_err(|err| {
                Error::Archive(format!("invalid entry name: {}", err))
            })?;

            let type_tag = reader.read_u8()?;
            let len = reader.read_u64::<LittleEndian>()? as usize;
            // The element count is untrusted; preallocation is capped and a
            // short stream fails with an I/O error.
            let capacity = len.min(1 << 20);
            let entry = match type_tag {
                TYPE_U16 => {
                    let mut data = Vec::with_capacity(capacity);
                    for _ in 0..len {
                        data.push(reader.read_u16::<LittleEndian>()?);
                    }
                    Entry::U16(data)
                },
                TYPE_U32 => {
                    let mut data = Vec::with_capacity(capacity);
                    for _ in 0..len {
                        data.push(reader.read_u32::<LittleEndian>()?);
                    }
                    Entry::U32(data)
                },
                TYPE_SCALAR => {
                    if len != 1 {
                        return Err(Error::Archive(format!(
                            "scalar {} with {} elements", name, len
                        )));
                    }
                    Entry::Scalar(reader.read_u64::<LittleEndian>()?)
                },
                _ => {
                    return Err(Error::Archive(format!(
                        "entry {} has unknown type {}", name, type_tag
                    )));
                },
            };
            if entries.insert(name.clone(), entry).is_some() {
                return Err(Error::Archive(format!("duplicate entry {}", name)));
            }
        }

        Ok(Archive { entries })
    }

    /// Returns the number of remaining entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no remaining entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn take(&mut self, name: &str) -> Result<Entry> {
        self.entries.remove(name).ok_or_else(|| {
            Error::Archive(format!("missing entry {}", name))
        })
    }

    /// Removes and returns the 16-bit array with the given name.
    pub fn take_u16_array(&mut self, name: &str) -> Result<Vec<u16>> {
        match self.take(name)? {
            Entry::U16(data) => Ok(data),
            entry => Err(Error::Archive(format!(
                "entry {} is a {}, not a u16 array", name, entry.type_name()
            ))),
        }
    }

    /// Removes and returns the 32-bit array with the given name.
    pub fn take_u32_array(&mut self, name: &str) -> Result<Vec<u32>> {
        match self.take(name)? {
            Entry::U32(data) => Ok(data),
            entry => Err(Error::Archive(format!(
                "entry {} is a {}, not a u32 array", name, entry.type_name()
            ))),
        }
    }

    /// Removes and returns the scalar with the given name.
    pub fn take_scalar(&mut self, name: &str) -> Result<u64> {
        match self.take(name)? {
            Entry::Scalar(value) => Ok(value),
            entry => Err(Error::Archive(format!(
                "entry {} is a {}, not a scalar", name, entry.type_name()
            ))),
        }
    }
}

//-----------------------------------------------------------------------------


//-----------------------------------------------------------------------------
