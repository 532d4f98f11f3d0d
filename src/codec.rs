//! Binary serialization of an index.
//!
//! Layout before compression, every field being a 4-byte slot unless noted:
//!
//! ```text
//! domain length, then one member per bit (bit position = array index)
//! table length, then for each key:
//!     key, number of byte entries, then per entry:
//!         byte offset, byte value (1 byte)
//! ```
//!
//! The whole stream is gzip-compressed.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use derivative::Derivative;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use log::{debug, info};

use crate::base::{Len, Member};
use crate::bitvector::BitVector;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::table::Table;
use crate::utils::buffer::open_buffer;

/// Width of every integer field
const FIELD_WIDTH: usize = 4;

/// Values from this one on need more than 4 varint bytes
const VARINT_LIMIT: u32 = 1 << 28;

/// Upper bound on what is reserved up-front from a (possibly corrupted)
/// length field
const MAX_PREALLOCATION: usize = 1 << 16;

/// How integer fields are written in their 4-byte slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEncoding {
    /// Unsigned LEB128 varint, zero padded; limited to values below 2^28
    Varint,
    /// Little-endian u32, covering the full range
    Fixed,
}

#[derive(Derivative, Clone, Debug)]
#[derivative(Default)]
pub struct CodecOptions {
    /// Must be the same when dumping and loading (it is not stored)
    #[derivative(Default(value = "FieldEncoding::Varint"))]
    pub encoding: FieldEncoding,

    /// gzip level (0-9)
    #[derivative(Default(value = "6"))]
    pub compression_level: u32,
}

fn encode_varint(value: u32) -> Result<[u8; FIELD_WIDTH]> {
    if value >= VARINT_LIMIT {
        return Err(Error::FieldOverflow(value as u64));
    }

    let mut slot = [0u8; FIELD_WIDTH];
    let mut rest = value;
    for byte in slot.iter_mut() {
        *byte = (rest & 0x7f) as u8;
        rest >>= 7;
        if rest == 0 {
            break;
        }
        *byte |= 0x80;
    }
    Ok(slot)
}

fn decode_varint(slot: &[u8; FIELD_WIDTH]) -> Option<u32> {
    let mut value = 0u32;
    for (ix, &byte) in slot.iter().enumerate() {
        value |= ((byte & 0x7f) as u32) << (7 * ix);
        if byte & 0x80 == 0 {
            return Some(value);
        }
    }
    None
}

struct FieldWriter<W: Write> {
    writer: W,
    encoding: FieldEncoding,
}

impl<W: Write> FieldWriter<W> {
    fn new(writer: W, encoding: FieldEncoding) -> Self {
        Self { writer, encoding }
    }

    fn write_u32(&mut self, value: u32) -> Result<()> {
        match self.encoding {
            FieldEncoding::Varint => self.writer.write_all(&encode_varint(value)?)?,
            FieldEncoding::Fixed => self.writer.write_u32::<LittleEndian>(value)?,
        }
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        let value = u32::try_from(len).map_err(|_| Error::FieldOverflow(len as u64))?;
        self.write_u32(value)
    }

    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer.write_u8(value)?;
        Ok(())
    }

    fn into_inner(self) -> W {
        self.writer
    }
}

struct FieldReader<R: Read> {
    reader: R,
    encoding: FieldEncoding,
}

impl<R: Read> FieldReader<R> {
    fn new(reader: R, encoding: FieldEncoding) -> Self {
        Self { reader, encoding }
    }

    fn read_u32(&mut self, what: &'static str) -> Result<u32> {
        let mut slot = [0u8; FIELD_WIDTH];
        self.reader
            .read_exact(&mut slot)
            .map_err(|e| Error::from_read(e, what))?;

        match self.encoding {
            FieldEncoding::Varint => decode_varint(&slot)
                .ok_or_else(|| Error::Malformed(format!("undecodable {}", what))),
            FieldEncoding::Fixed => Ok(LittleEndian::read_u32(&slot)),
        }
    }

    fn read_len(&mut self, what: &'static str) -> Result<usize> {
        Ok(self.read_u32(what)? as usize)
    }

    fn read_u8(&mut self, what: &'static str) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.reader
            .read_exact(&mut byte)
            .map_err(|e| Error::from_read(e, what))?;
        Ok(byte[0])
    }

    /// Fails if anything follows (this also checks the gzip trailer)
    fn expect_end(&mut self) -> Result<()> {
        let mut byte = [0u8; 1];
        match self.reader.read(&mut byte) {
            Ok(0) => Ok(()),
            Ok(_) => Err(Error::Malformed("trailing data after the table".into())),
            Err(e) => Err(Error::from_read(e, "end of stream")),
        }
    }
}

fn write_domain<W: Write>(fields: &mut FieldWriter<W>, domain: &Domain) -> Result<()> {
    fields.write_len(domain.len())?;
    for &member in domain.members() {
        fields.write_u32(member)?;
    }
    Ok(())
}

fn write_table<W: Write>(fields: &mut FieldWriter<W>, table: &Table) -> Result<()> {
    fields.write_len(table.len())?;

    let mut vectors: Vec<_> = table.iter().collect();
    vectors.sort_unstable_by_key(|(&key, _)| key);

    for (&key, vector) in vectors {
        let bytes = vector.bytes();

        fields.write_u32(key)?;
        fields.write_len(bytes.len())?;
        for (offset, value) in bytes {
            fields.write_u32(offset)?;
            fields.write_u8(value)?;
        }
    }
    Ok(())
}

fn read_domain<R: Read>(fields: &mut FieldReader<R>) -> Result<Domain> {
    let count = fields.read_len("domain length")?;
    let mut members = Vec::<Member>::with_capacity(count.min(MAX_PREALLOCATION));

    for _ in 0..count {
        members.push(fields.read_u32("domain member")?);
    }

    let domain = Domain::from_members(members.iter().copied());
    if domain.len() != members.len() {
        return Err(Error::Malformed("duplicated domain member".into()));
    }

    debug!("Read a domain of {} members", domain.len());
    Ok(domain)
}

fn read_table<R: Read>(fields: &mut FieldReader<R>, domain: &Domain) -> Result<Table> {
    let count = fields.read_len("table length")?;
    let bits = domain.len() as u64;
    let width = domain.byte_width();
    let mut table = Table::new();

    for _ in 0..count {
        let key = fields.read_u32("table key")?;
        let entries = fields.read_len("entry length")?;
        if entries == 0 {
            return Err(Error::Malformed(format!("key {} has no byte entry", key)));
        }
        let mut vector = BitVector::new();

        for _ in 0..entries {
            let offset = fields.read_u32("byte offset")?;
            let value = fields.read_u8("byte value")?;

            if offset as usize >= width {
                return Err(Error::Malformed(format!(
                    "byte offset {} of key {} is outside the domain",
                    offset, key
                )));
            }
            // One past the highest set bit
            let end = (offset as u64) * 8 + (8 - value.leading_zeros() as u64);
            if value != 0 && end > bits {
                return Err(Error::Malformed(format!(
                    "key {} has bits outside the domain",
                    key
                )));
            }

            if !vector.insert_byte(offset, value) {
                return Err(Error::Malformed(format!(
                    "byte offset {} of key {} appears twice",
                    offset, key
                )));
            }
        }

        if !table.insert(key, vector) {
            return Err(Error::Malformed(format!("key {} appears twice", key)));
        }
    }

    debug!(
        "Read a table of {} keys ({} bytes)",
        table.len(),
        table.allocated_bytes()
    );
    Ok(table)
}

/// Writes the index in its compressed binary form
pub fn dump_index<W: Write>(writer: W, index: &Index) -> Result<()> {
    dump_index_with(writer, index, &CodecOptions::default())
}

pub fn dump_index_with<W: Write>(writer: W, index: &Index, options: &CodecOptions) -> Result<()> {
    let encoder = GzEncoder::new(writer, Compression::new(options.compression_level));
    let mut fields = FieldWriter::new(BufWriter::new(encoder), options.encoding);

    write_domain(&mut fields, index.domain())?;
    write_table(&mut fields, index.table())?;

    let encoder = fields
        .into_inner()
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    encoder.finish()?;

    debug!(
        "Dumped {} members and {} keys",
        index.domain().len(),
        index.table().len()
    );
    Ok(())
}

/// Reads a complete index; nothing is returned unless the whole stream is valid
pub fn load_index<R: Read>(reader: R) -> Result<Index> {
    load_index_with(reader, &CodecOptions::default())
}

pub fn load_index_with<R: Read>(reader: R, options: &CodecOptions) -> Result<Index> {
    let mut fields = FieldReader::new(BufReader::new(GzDecoder::new(reader)), options.encoding);

    let domain = read_domain(&mut fields)?;
    let table = read_table(&mut fields, &domain)?;
    fields.expect_end()?;

    Ok(Index::from_parts(domain, table))
}

/// Reads only the domain at the start of a dumped index
pub fn load_domain<R: Read>(reader: R) -> Result<Domain> {
    load_domain_with(reader, &CodecOptions::default())
}

pub fn load_domain_with<R: Read>(reader: R, options: &CodecOptions) -> Result<Domain> {
    let mut fields = FieldReader::new(BufReader::new(GzDecoder::new(reader)), options.encoding);
    read_domain(&mut fields)
}

/// Dumps the index into a file, which is created or truncated
pub fn save_index_file(path: &Path, index: &Index, options: &CodecOptions) -> Result<()> {
    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    dump_index_with(&mut file, index, options)?;
    file.sync_all()?;

    info!("Index saved in {}", path.display());
    Ok(())
}

/// Loads an index file, either read in memory or memory mapped
pub fn load_index_file(path: &Path, in_memory: bool, options: &CodecOptions) -> Result<Index> {
    let buffer = open_buffer(path, in_memory)?;
    let index = load_index_with(buffer.data(), options)?;

    info!(
        "Loaded {} ({} members, {} keys)",
        path.display(),
        index.domain().len(),
        index.table().len()
    );
    Ok(index)
}

/// Loads the domain of an index file
pub fn load_domain_file(path: &Path, in_memory: bool, options: &CodecOptions) -> Result<Domain> {
    let buffer = open_buffer(path, in_memory)?;
    load_domain_with(buffer.data(), options)
}
