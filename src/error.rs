use thiserror::Error;

/// Everything here is scoped to a single operation attempt. Validation
/// errors surface before any byte buffer is produced; a proof that simply
/// fails to verify is reported as `false`, never as an error.
#[derive(Error, Debug)]
pub enum GumshoeError {
    #[error("Invalid tree configuration: {0}")]
    InvalidTreeConfig(String),

    #[error("Proof length {0} outside the supported depth range")]
    InvalidProofLength(usize),

    #[error("Leaf index {index} is out of bounds for a depth {depth} tree")]
    LeafIndexOutOfBounds { index: u32, depth: usize },

    #[error("Expected a 32 byte node, got {0} bytes")]
    InvalidNodeLength(usize),

    #[error("Asset proof malformed: {0}")]
    ProofMalformed(String),

    #[error("Creator shares must sum to 100, got {0}")]
    InvalidCreatorShareTotal(u32),

    #[error("Too many creators: {0}")]
    TooManyCreators(usize),

    #[error("Seller fee basis points {0} exceed 10000")]
    InvalidBasisPoints(u16),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Proof source error: {0}")]
    ProofSourceError(String),
}

impl From<std::io::Error> for GumshoeError {
    fn from(err: std::io::Error) -> Self {
        GumshoeError::SerializationError(err.to_string())
    }
}
