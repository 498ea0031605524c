//! Binary `.jdc` encode/decode (§6). All integers little-endian.
//!
//! Each `.jdc` file caches the ranked result of one qualified call (one
//! `CacheKey`), not a whole signature's table: `type_signature` is that
//! call's argument-type signature, and each [`JdcEntry`]'s `type_pattern`
//! is a [`crate::wyhash::wyhash64`] digest of the originating
//! implementation's own parameter types — a quick discriminator checked
//! before trusting a cached ranking, not a literal bit-packed type list
//! (the format has no room for variable-arity per-entry type ids).

use crate::wyhash::wyhash64;
use dispatch_common::TypeId;
use thiserror::Error;

/// Decode-time failures local to the `.jdc` byte format; the cache layer
/// (which has a path to report) wraps these into
/// `dispatch_common::CacheError::Corrupt`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JdcError {
    #[error("not a .jdc file")]
    BadMagic,
    #[error("format_version {0} is incompatible with this reader")]
    IncompatibleVersion(u32),
    #[error("CRC mismatch")]
    CrcMismatch,
    #[error("truncated before the declared length")]
    Truncated,
    #[error("{0}")]
    Malformed(String),
}

pub const MAGIC: u32 = 0x4A41_4E55;
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationApplied {
    None,
    DecisionTreeOnly,
    CompressionOnly,
    Both,
}

impl OptimizationApplied {
    const fn to_byte(self) -> u8 {
        match self {
            OptimizationApplied::None => 0,
            OptimizationApplied::DecisionTreeOnly => 1,
            OptimizationApplied::CompressionOnly => 2,
            OptimizationApplied::Both => 3,
        }
    }

    const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(OptimizationApplied::None),
            1 => Some(OptimizationApplied::DecisionTreeOnly),
            2 => Some(OptimizationApplied::CompressionOnly),
            3 => Some(OptimizationApplied::Both),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JdcEntry {
    pub type_pattern: u64,
    pub specificity: u32,
    pub call_frequency: u32,
    pub function_id: u32,
    pub fn_name: String,
    pub mod_name: String,
}

#[derive(Debug, Clone)]
pub struct JdcFile {
    pub table_hash: u64,
    pub creation_ts: u64,
    pub sig_name: String,
    pub type_signature: Vec<TypeId>,
    pub opt_applied: OptimizationApplied,
    pub compression: f32,
    pub memory_saved: u64,
    pub entries: Vec<JdcEntry>,
}

impl JdcFile {
    #[must_use]
    pub fn compute_table_hash(&self) -> u64 {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(self.sig_name.as_bytes());
        for ty in &self.type_signature {
            bytes.extend_from_slice(&ty.0.to_le_bytes());
        }
        for entry in &self.entries {
            bytes.extend_from_slice(&entry.function_id.to_le_bytes());
            bytes.extend_from_slice(&entry.specificity.to_le_bytes());
        }
        wyhash64(&bytes, 0)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(self.sig_name.as_bytes());
        for ty in &self.type_signature {
            body.extend_from_slice(&ty.0.to_le_bytes());
        }
        for entry in &self.entries {
            body.extend_from_slice(&entry.type_pattern.to_le_bytes());
            body.extend_from_slice(&entry.specificity.to_le_bytes());
            body.extend_from_slice(&entry.call_frequency.to_le_bytes());
            body.extend_from_slice(&(entry.fn_name.len() as u32).to_le_bytes());
            body.extend_from_slice(&(entry.mod_name.len() as u32).to_le_bytes());
            body.extend_from_slice(&entry.function_id.to_le_bytes());
            body.extend_from_slice(entry.fn_name.as_bytes());
            body.extend_from_slice(entry.mod_name.as_bytes());
        }
        let data_crc32 = crc32fast::hash(&body);

        let mut header = Vec::with_capacity(48);
        header.extend_from_slice(&MAGIC.to_le_bytes());
        header.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        header.extend_from_slice(&self.table_hash.to_le_bytes());
        header.extend_from_slice(&self.creation_ts.to_le_bytes());
        header.extend_from_slice(&(self.sig_name.len() as u32).to_le_bytes());
        header.extend_from_slice(&(self.type_signature.len() as u32).to_le_bytes());
        header.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        header.push(self.opt_applied.to_byte());
        header.extend_from_slice(&self.compression.to_le_bytes());
        header.extend_from_slice(&self.memory_saved.to_le_bytes());
        let metadata_crc32 = crc32fast::hash(&header);
        header.extend_from_slice(&metadata_crc32.to_le_bytes());
        header.extend_from_slice(&data_crc32.to_le_bytes());

        let mut out = header;
        out.extend_from_slice(&body);
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, JdcError> {
        let mut cursor = Cursor::new(bytes);
        let magic = cursor.read_u32()?;
        if magic != MAGIC {
            return Err(JdcError::BadMagic);
        }
        let format_version = cursor.read_u32()?;
        if format_version != FORMAT_VERSION {
            return Err(JdcError::IncompatibleVersion(format_version));
        }
        let table_hash = cursor.read_u64()?;
        let creation_ts = cursor.read_u64()?;
        let sig_name_len = cursor.read_u32()? as usize;
        let type_sig_len = cursor.read_u32()? as usize;
        let entry_count = cursor.read_u32()? as usize;
        let opt_applied_byte = cursor.read_u8()?;
        let compression = cursor.read_f32()?;
        let memory_saved = cursor.read_u64()?;
        let metadata_crc32 = cursor.read_u32()?;
        let data_crc32 = cursor.read_u32()?;

        let header_len_without_crcs = cursor.position - 8;
        let mut header_for_crc = bytes[..header_len_without_crcs].to_vec();
        let computed_metadata_crc = crc32fast::hash(&header_for_crc);
        header_for_crc.clear();
        if computed_metadata_crc != metadata_crc32 {
            return Err(JdcError::CrcMismatch);
        }

        let body_start = cursor.position;
        let body = &bytes[body_start..];
        let computed_data_crc = crc32fast::hash(body);
        if computed_data_crc != data_crc32 {
            return Err(JdcError::CrcMismatch);
        }

        let sig_name_bytes = cursor.read_exact(sig_name_len)?;
        let sig_name = String::from_utf8_lossy(sig_name_bytes).into_owned();

        let mut type_signature = Vec::with_capacity(type_sig_len);
        for _ in 0..type_sig_len {
            type_signature.push(TypeId(cursor.read_u32()?));
        }

        let mut entries = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            let type_pattern = cursor.read_u64()?;
            let specificity = cursor.read_u32()?;
            let call_frequency = cursor.read_u32()?;
            let fn_name_len = cursor.read_u32()? as usize;
            let mod_name_len = cursor.read_u32()? as usize;
            let function_id = cursor.read_u32()?;
            let fn_name = String::from_utf8_lossy(cursor.read_exact(fn_name_len)?).into_owned();
            let mod_name = String::from_utf8_lossy(cursor.read_exact(mod_name_len)?).into_owned();
            entries.push(JdcEntry {
                type_pattern,
                specificity,
                call_frequency,
                function_id,
                fn_name,
                mod_name,
            });
        }

        let opt_applied = OptimizationApplied::from_byte(opt_applied_byte)
            .ok_or_else(|| JdcError::Malformed("unknown opt_applied byte".to_string()))?;

        Ok(Self {
            table_hash,
            creation_ts,
            sig_name,
            type_signature,
            opt_applied,
            compression,
            memory_saved,
            entries,
        })
    }
}

/// Minimal forward-only byte cursor; avoids pulling in a full I/O crate
/// for a format this workspace only ever reads/writes as an in-memory
/// byte buffer (the cache layer owns actual file I/O).
struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn read_exact(&mut self, len: usize) -> Result<&'a [u8], JdcError> {
        if self.position + len > self.bytes.len() {
            return Err(JdcError::Truncated);
        }
        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, JdcError> {
        Ok(self.read_exact(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32, JdcError> {
        Ok(u32::from_le_bytes(self.read_exact(4)?.try_into().unwrap()))
    }

    fn read_u64(&mut self) -> Result<u64, JdcError> {
        Ok(u64::from_le_bytes(self.read_exact(8)?.try_into().unwrap()))
    }

    fn read_f32(&mut self) -> Result<f32, JdcError> {
        Ok(f32::from_le_bytes(self.read_exact(4)?.try_into().unwrap()))
    }
}
