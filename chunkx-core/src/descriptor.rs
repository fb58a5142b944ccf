use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ChunkError;
use crate::limits::HeaderLimits;
use crate::record::{FieldValue, Record};
use crate::technique::EncoderTechnique;

// Record field names. Renaming any of these breaks every stored chunk.
pub const FIELD_KEY: &str = "Key";
pub const FIELD_CHUNK_INDEX: &str = "ChunkIndex";
pub const FIELD_ORIGINAL_LENGTH: &str = "OriginalLength";
pub const FIELD_ENCODER_K: &str = "EncoderK";
pub const FIELD_ENCODER_M: &str = "EncoderM";
pub const FIELD_ENCODER_TECHNIQUE: &str = "EncoderTechnique";

const KNOWN_FIELDS: [&str; 6] = [
    FIELD_KEY,
    FIELD_CHUNK_INDEX,
    FIELD_ORIGINAL_LENGTH,
    FIELD_ENCODER_K,
    FIELD_ENCODER_M,
    FIELD_ENCODER_TECHNIQUE,
];

/// Metadata stored ahead of a chunk's payload.
///
/// `original_length` is the size of the data before erasure encoding. The
/// payload that follows the header on the wire is a shard and its length is
/// not recorded here.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChunkDescriptor {
    pub key: String,
    pub chunk_index: u64,
    pub original_length: u32,
    pub encoder_k: u8,
    pub encoder_m: u8,
    pub encoder_technique: EncoderTechnique,
}

impl ChunkDescriptor {
    pub fn new(
        key: impl Into<String>,
        chunk_index: u64,
        original_length: u32,
        encoder_k: u8,
        encoder_m: u8,
        encoder_technique: EncoderTechnique,
    ) -> Result<Self, ChunkError> {
        let d = Self {
            key: key.into(),
            chunk_index,
            original_length,
            encoder_k,
            encoder_m,
            encoder_technique,
        };
        d.validate()?;
        Ok(d)
    }

    /// Check the descriptor against the default header limits.
    pub fn validate(&self) -> Result<(), ChunkError> {
        self.validate_with(&HeaderLimits::default())
    }

    pub fn validate_with(&self, limits: &HeaderLimits) -> Result<(), ChunkError> {
        if self.key.is_empty() {
            return Err(ChunkError::invalid(FIELD_KEY, "must not be empty"));
        }
        if self.key.len() > limits.max_key_len {
            return Err(ChunkError::invalid(
                FIELD_KEY,
                format!("{} bytes exceeds limit of {}", self.key.len(), limits.max_key_len),
            ));
        }
        if self.encoder_k == 0 {
            return Err(ChunkError::invalid(FIELD_ENCODER_K, "must be positive"));
        }
        if self.encoder_m == 0 {
            return Err(ChunkError::invalid(FIELD_ENCODER_M, "must be positive"));
        }
        Ok(())
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with(FIELD_KEY, FieldValue::Str(self.key.clone()))
            .with(FIELD_CHUNK_INDEX, FieldValue::U64(self.chunk_index))
            .with(FIELD_ORIGINAL_LENGTH, FieldValue::U32(self.original_length))
            .with(FIELD_ENCODER_K, FieldValue::U8(self.encoder_k))
            .with(FIELD_ENCODER_M, FieldValue::U8(self.encoder_m))
            .with(FIELD_ENCODER_TECHNIQUE, FieldValue::U8(self.encoder_technique.code()))
    }

    /// Rebuild a descriptor from a decoded record. Unknown fields are skipped.
    pub fn from_record(record: &Record, limits: &HeaderLimits) -> Result<Self, ChunkError> {
        for f in record.fields() {
            if !KNOWN_FIELDS.contains(&f.name.as_str()) {
                debug!(field = %f.name, kind = f.value.type_name(), "skipping unknown header field");
            }
        }
        let d = Self {
            key: record.require_str(FIELD_KEY)?.to_string(),
            chunk_index: record.require_u64(FIELD_CHUNK_INDEX)?,
            original_length: record.require_u32(FIELD_ORIGINAL_LENGTH)?,
            encoder_k: record.require_u8(FIELD_ENCODER_K)?,
            encoder_m: record.require_u8(FIELD_ENCODER_M)?,
            encoder_technique: EncoderTechnique::try_from(
                record.require_u8(FIELD_ENCODER_TECHNIQUE)?,
            )?,
        };
        d.validate_with(limits)?;
        Ok(d)
    }
}
