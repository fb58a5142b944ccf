use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChunkError;

/// Erasure algorithm a chunk was encoded with.
///
/// The wire code of each variant is fixed forever; new techniques get new codes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EncoderTechnique {
    /// Reed-Solomon over a Vandermonde generator matrix.
    Vandermonde,
    /// Cauchy Reed-Solomon.
    Cauchy,
}

impl EncoderTechnique {
    pub const ALL: [EncoderTechnique; 2] = [EncoderTechnique::Vandermonde, EncoderTechnique::Cauchy];

    /// Code stored in the descriptor record.
    pub fn code(self) -> u8 {
        match self {
            EncoderTechnique::Vandermonde => 0,
            EncoderTechnique::Cauchy => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EncoderTechnique::Vandermonde => "vandermonde",
            EncoderTechnique::Cauchy => "cauchy",
        }
    }
}

impl TryFrom<u8> for EncoderTechnique {
    type Error = ChunkError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(EncoderTechnique::Vandermonde),
            1 => Ok(EncoderTechnique::Cauchy),
            other => Err(ChunkError::UnknownTechnique(other)),
        }
    }
}

impl fmt::Display for EncoderTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncoderTechnique {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EncoderTechnique::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown technique {s:?} (expected vandermonde or cauchy)"))
    }
}

