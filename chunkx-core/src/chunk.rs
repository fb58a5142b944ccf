//! Chunk stream framing.
//!
//! ```text
//! [0:4)    format version, u32 LE
//! [4:N)    descriptor record (see `record`)
//! [N:end)  payload, verbatim, no length prefix or trailer
//! ```
//!
//! The codec never tracks where the payload ends; callers know that from
//! stream closure or the shard size agreed with the erasure layer.

use std::io::{self, Read, Write};

use tracing::{debug, warn};

use crate::descriptor::ChunkDescriptor;
use crate::error::ChunkError;
use crate::limits::HeaderLimits;
use crate::record::Record;

/// Version tag written at the start of every chunk.
pub const FORMAT_VERSION: u32 = 1;

const VERSION_LEN: u64 = 4;

/// Only the current version is accepted. Older layouts do not exist yet.
pub fn is_supported_version(version: u32) -> bool {
    version == FORMAT_VERSION
}

/// Byte offset at which the payload begins for `descriptor`.
pub fn encoded_header_len(descriptor: &ChunkDescriptor) -> Result<u64, ChunkError> {
    Ok(VERSION_LEN + descriptor.to_record().encoded_len()?)
}

/// Write the version tag and descriptor record. Returns the header length.
///
/// The descriptor is validated before anything reaches `out`.
pub fn write_chunk_header<W: Write + ?Sized>(
    out: &mut W,
    descriptor: &ChunkDescriptor,
) -> Result<u64, ChunkError> {
    let limits = HeaderLimits::default();
    descriptor.validate_with(&limits)?;
    let record = descriptor.to_record();
    let record_len = record.encoded_len()?;
    // Unreachable with today's fields and key cap; guards fields added later.
    if record_len > limits.max_record_bytes {
        return Err(ChunkError::invalid(
            "descriptor record",
            format!("{record_len} bytes exceeds limit of {}", limits.max_record_bytes),
        ));
    }
    out.write_all(&FORMAT_VERSION.to_le_bytes())?;
    record.write_to(out)?;
    let header_len = VERSION_LEN + record_len;
    debug!(
        key = %descriptor.key,
        chunk_index = descriptor.chunk_index,
        header_len,
        "wrote chunk header"
    );
    Ok(header_len)
}

/// Write a full chunk: header followed by every byte of `data`.
///
/// The payload is streamed, so memory use does not grow with chunk size.
/// Returns the number of payload bytes copied. On failure the sink holds
/// whatever was written before the error; nothing is rolled back.
pub fn write_chunk<W, R>(
    out: &mut W,
    descriptor: &ChunkDescriptor,
    data: &mut R,
) -> Result<u64, ChunkError>
where
    W: Write + ?Sized,
    R: Read + ?Sized,
{
    write_chunk_header(out, descriptor)?;
    let copied = io::copy(data, out)?;
    debug!(key = %descriptor.key, chunk_index = descriptor.chunk_index, payload_len = copied, "wrote chunk payload");
    Ok(copied)
}

/// Read a chunk header with the default limits.
pub fn read_chunk_header<R: Read + ?Sized>(input: &mut R) -> Result<ChunkDescriptor, ChunkError> {
    read_chunk_header_with_limits(input, &HeaderLimits::default())
}

/// Read the version tag and descriptor record.
///
/// Consumes exactly the header bytes; the next read from `input` returns the
/// first payload byte. No payload bytes are touched.
pub fn read_chunk_header_with_limits<R: Read + ?Sized>(
    input: &mut R,
    limits: &HeaderLimits,
) -> Result<ChunkDescriptor, ChunkError> {
    let mut tag = [0u8; VERSION_LEN as usize];
    input.read_exact(&mut tag).map_err(|e| ChunkError::from_read(e, "version tag"))?;
    let version = u32::from_le_bytes(tag);
    if !is_supported_version(version) {
        warn!(found = version, supported = FORMAT_VERSION, "rejecting chunk header version");
        return Err(ChunkError::UnsupportedVersion { found: version, supported: FORMAT_VERSION });
    }
    let record = Record::read_from(input, limits)?;
    let descriptor = ChunkDescriptor::from_record(&record, limits)?;
    debug!(key = %descriptor.key, chunk_index = descriptor.chunk_index, "read chunk header");
    Ok(descriptor)
}

/// A chunk stream positioned past its header.
///
/// Reading from a `ChunkReader` yields payload bytes only.
pub struct ChunkReader<R> {
    inner: R,
    descriptor: ChunkDescriptor,
    payload_read: u64,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R) -> Result<Self, ChunkError> {
        Self::with_limits(inner, &HeaderLimits::default())
    }

    pub fn with_limits(mut inner: R, limits: &HeaderLimits) -> Result<Self, ChunkError> {
        let descriptor = read_chunk_header_with_limits(&mut inner, limits)?;
        Ok(Self { inner, descriptor, payload_read: 0 })
    }

    pub fn descriptor(&self) -> &ChunkDescriptor {
        &self.descriptor
    }

    /// Payload bytes handed out so far.
    pub fn payload_read(&self) -> u64 {
        self.payload_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn into_parts(self) -> (ChunkDescriptor, R) {
        (self.descriptor, self.inner)
    }
}

impl<R: Read> Read for ChunkReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.payload_read += n as u64;
        Ok(n)
    }
}
