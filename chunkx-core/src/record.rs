//! Self-describing field record.
//!
//! A record is an ordered list of named, typed fields serialized with bincode
//! (fixed-width little-endian integers, u64 length prefixes):
//!
//! ```text
//! record := count:u64 field{count}
//! field  := name_len:u64 name value
//! value  := tag:u32 payload      0 Str | 1 U8 | 2 U32 | 3 U64
//! ```
//!
//! Readers look fields up by name, so fields can be added or dropped across
//! format versions without breaking old readers. The encoding is
//! self-delimiting and decoding never reads past the last field.

use std::collections::HashSet;
use std::io::{Read, Write};

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::error::ChunkError;
use crate::limits::HeaderLimits;

/// Typed field payload. Variant order is part of the wire format.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Str(String),
    U8(u8),
    U32(u32),
    U64(u64),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::U8(_) => "u8",
            FieldValue::U32(_) => "u32",
            FieldValue::U64(_) => "u64",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<Field>,
}

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new().with_fixint_encoding().with_little_endian()
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: FieldValue) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: &str, value: FieldValue) {
        self.fields.push(Field { name: name.to_string(), value });
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Number of bytes `write_to` produces.
    pub fn encoded_len(&self) -> Result<u64, ChunkError> {
        wire_options().serialized_size(self).map_err(ChunkError::from_bincode)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ChunkError> {
        wire_options().serialize(self).map_err(ChunkError::from_bincode)
    }

    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), ChunkError> {
        let bytes = self.to_bytes()?;
        out.write_all(&bytes)?;
        Ok(())
    }

    /// Decode one record, consuming exactly its bytes.
    ///
    /// Duplicate field names are rejected; lookups by name would otherwise be
    /// ambiguous.
    pub fn read_from<R: Read + ?Sized>(
        input: &mut R,
        limits: &HeaderLimits,
    ) -> Result<Self, ChunkError> {
        let record: Record = wire_options()
            .with_limit(limits.max_record_bytes)
            .deserialize_from(input)
            .map_err(ChunkError::from_bincode)?;
        let mut seen = HashSet::with_capacity(record.fields.len());
        for f in &record.fields {
            if !seen.insert(f.name.as_str()) {
                return Err(ChunkError::Malformed(format!("duplicate field {:?}", f.name)));
            }
        }
        Ok(record)
    }

    pub fn require(&self, name: &str) -> Result<&FieldValue, ChunkError> {
        self.get(name).ok_or_else(|| ChunkError::Malformed(format!("missing field {name:?}")))
    }

    pub fn require_str(&self, name: &str) -> Result<&str, ChunkError> {
        match self.require(name)? {
            FieldValue::Str(s) => Ok(s),
            other => Err(type_mismatch(name, "string", other)),
        }
    }

    pub fn require_u8(&self, name: &str) -> Result<u8, ChunkError> {
        match self.require(name)? {
            FieldValue::U8(v) => Ok(*v),
            other => Err(type_mismatch(name, "u8", other)),
        }
    }

    pub fn require_u32(&self, name: &str) -> Result<u32, ChunkError> {
        match self.require(name)? {
            FieldValue::U32(v) => Ok(*v),
            other => Err(type_mismatch(name, "u32", other)),
        }
    }

    pub fn require_u64(&self, name: &str) -> Result<u64, ChunkError> {
        match self.require(name)? {
            FieldValue::U64(v) => Ok(*v),
            other => Err(type_mismatch(name, "u64", other)),
        }
    }
}

fn type_mismatch(name: &str, expected: &str, found: &FieldValue) -> ChunkError {
    ChunkError::Malformed(format!(
        "field {name:?} has type {}, expected {expected}",
        found.type_name()
    ))
}
