pub mod chunk;
pub mod descriptor;
pub mod error;
pub mod limits;
pub mod record;
pub mod technique;

pub use chunk::{
    encoded_header_len, is_supported_version, read_chunk_header, read_chunk_header_with_limits,
    write_chunk, write_chunk_header, ChunkReader, FORMAT_VERSION,
};
pub use descriptor::ChunkDescriptor;
pub use error::ChunkError;
pub use limits::HeaderLimits;
pub use technique::EncoderTechnique;
