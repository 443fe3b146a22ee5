//! Value types shared by the proof, codec and encoding layers. All of them
//! are created and consumed per call; canonical tree state lives with the
//! on-chain programs, never here.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::keccak::hashv;
use solana_program::pubkey::Pubkey;

use crate::error::GumshoeError;
use crate::hash::Node;
use crate::proof::MAX_TREE_DEPTH;

pub mod leaf_schema;
pub mod metadata;

pub use leaf_schema::{LeafSchema, Version};
pub use metadata::{
    Collection, Creator, MetadataArgs, TokenProgramVersion, TokenStandard, UseMethod, Uses,
};

/// Capacity parameters of a concurrent Merkle tree. Immutable once the tree
/// is initialized.
#[derive(BorshDeserialize, BorshSerialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Depth of the tree. Capacity is `2^max_depth` leaves.
    pub max_depth: u32,

    /// Number of changelog entries buffered on-chain, bounding how many
    /// concurrent unconfirmed mutations the tree absorbs before in-flight
    /// proofs go stale. Must be a power of 2.
    pub max_buffer_size: u32,
}

impl TreeConfig {
    pub fn new(max_depth: u32, max_buffer_size: u32) -> Result<Self, GumshoeError> {
        let config = Self {
            max_depth,
            max_buffer_size,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GumshoeError> {
        if self.max_depth == 0 || self.max_depth as usize > MAX_TREE_DEPTH {
            return Err(GumshoeError::InvalidTreeConfig(format!(
                "max depth must be between 1 and {}, got {}",
                MAX_TREE_DEPTH, self.max_depth
            )));
        }
        if self.max_buffer_size == 0 || !self.max_buffer_size.is_power_of_two() {
            return Err(GumshoeError::InvalidTreeConfig(format!(
                "max buffer size must be a power of 2, got {}",
                self.max_buffer_size
            )));
        }
        Ok(())
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.max_depth
    }
}

/// One fungible-balance leaf. Ownership and balance only change through a
/// verified replace-leaf operation.
#[derive(BorshDeserialize, BorshSerialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompressedTokenAccount {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    /// Leaf hash currently in the tree, as reported by the indexer.
    pub hash: Node,
    pub leaf_index: u32,
    pub tree: Pubkey,
}

impl CompressedTokenAccount {
    /// Hash of the balance record itself. Equals `hash` while the indexer
    /// view is current.
    pub fn to_node(&self) -> Node {
        hashv(&[
            self.owner.as_ref(),
            self.mint.as_ref(),
            self.amount.to_le_bytes().as_ref(),
        ])
        .to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use borsh::BorshDeserialize;
    use solana_sdk::{signature::Keypair, signer::Signer};

    #[test]
    fn tree_config_accepts_documented_shapes() {
        for (depth, buffer) in [(14, 64), (20, 256), (30, 2048), (1, 8)] {
            assert!(TreeConfig::new(depth, buffer).is_ok());
        }
    }

    #[test]
    fn tree_config_rejects_bad_shapes() {
        assert!(TreeConfig::new(0, 64).is_err());
        assert!(TreeConfig::new(31, 64).is_err());
        assert!(TreeConfig::new(14, 0).is_err());
        assert!(TreeConfig::new(14, 100).is_err());
    }

    #[test]
    fn tree_config_capacity() {
        assert_eq!(TreeConfig::new(14, 64).unwrap().capacity(), 1 << 14);
    }

    #[test]
    fn compressed_token_account_round_trips() {
        let account = CompressedTokenAccount {
            owner: Keypair::new().pubkey(),
            mint: Keypair::new().pubkey(),
            amount: 1_000_000,
            hash: [3u8; 32],
            leaf_index: 42,
            tree: Keypair::new().pubkey(),
        };
        let bytes = borsh::BorshSerialize::try_to_vec(&account).unwrap();
        assert_eq!(bytes.len(), 32 + 32 + 8 + 32 + 4 + 32);
        let decoded = CompressedTokenAccount::try_from_slice(&bytes).unwrap();
        assert_eq!(decoded, account);
    }

    #[test]
    fn token_account_node_binds_amount() {
        let owner = Keypair::new().pubkey();
        let mint = Keypair::new().pubkey();
        let mut account = CompressedTokenAccount {
            owner,
            mint,
            amount: 5,
            hash: [0u8; 32],
            leaf_index: 0,
            tree: Keypair::new().pubkey(),
        };
        let node = account.to_node();
        account.amount = 6;
        assert_ne!(node, account.to_node());
    }
}
