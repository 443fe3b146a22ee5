//! The proof acquisition boundary: the payload shape a DAS-style indexer
//! serves and its conversion into a verifiable proof.
//!
//! Transport is the implementor's concern, and so are retries and backoff.
//! The tree root changes on every confirmed mutation, so a response is only
//! good for the one operation it was fetched for.

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::error::GumshoeError;
use crate::hash::Node;
use crate::proof::{ConcurrentMerkleProof, MAX_TREE_DEPTH};

/// Proof payload served by the indexer. Node hashes travel base58-encoded;
/// `node_index` is the level-order position of the leaf in the full tree,
/// root numbered 1.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AssetProof {
    pub root: String,
    pub proof: Vec<String>,
    pub node_index: i64,
    pub leaf: String,
    pub tree_id: String,
}

/// Supplies a fresh proof for one mutating operation. Failures propagate
/// as-is; retry policy belongs to the caller.
#[async_trait]
pub trait ProofSource: Sync + Send {
    async fn get_asset_proof(&self, asset_id: &Pubkey) -> Result<AssetProof, GumshoeError>;
}

fn decode_node(encoded: &str) -> Result<Node, GumshoeError> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| GumshoeError::ProofMalformed(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(GumshoeError::InvalidNodeLength(bytes.len()));
    }
    let mut node = [0u8; 32];
    node.copy_from_slice(&bytes);
    Ok(node)
}

impl AssetProof {
    pub fn tree(&self) -> Result<Pubkey, GumshoeError> {
        Pubkey::from_str(&self.tree_id).map_err(|e| GumshoeError::ProofMalformed(e.to_string()))
    }

    /// Position of the leaf within its level. The leaf layer of a depth `d`
    /// tree occupies level-order indices `2^d .. 2^(d+1)`.
    pub fn leaf_index(&self) -> Result<u32, GumshoeError> {
        let depth = self.proof.len();
        if depth == 0 || depth > MAX_TREE_DEPTH {
            return Err(GumshoeError::InvalidProofLength(depth));
        }
        let base = 1i64 << depth;
        if self.node_index < base || self.node_index >= base * 2 {
            return Err(GumshoeError::ProofMalformed(format!(
                "node index {} is not a leaf of a depth {} tree",
                self.node_index, depth
            )));
        }
        Ok((self.node_index - base) as u32)
    }

    /// Decodes into a verifiable proof, enforcing 32-byte nodes throughout.
    pub fn to_merkle_proof(&self) -> Result<ConcurrentMerkleProof, GumshoeError> {
        let index = self.leaf_index()?;
        let mut nodes = Vec::with_capacity(self.proof.len());
        for encoded in &self.proof {
            nodes.push(decode_node(encoded)?);
        }
        Ok(ConcurrentMerkleProof::new(
            decode_node(&self.root)?,
            decode_node(&self.leaf)?,
            nodes,
            index,
        ))
    }
}
