//! Gumshoe is the client-side toolkit for Gummyroll concurrent Merkle trees
//! and the Bubblegum compressed-asset contract built on top of them.
//!
//! A compressed asset never gets its own account. It lives as one 32-byte
//! leaf of an on-chain Merkle tree, and only the tree's root plus a small
//! changelog buffer are persisted. Everything a client needs to work against
//! that scheme without running a validator is here:
//! - recomputing and checking membership proofs ([`proof`])
//! - the canonical leaf record and its byte codec ([`state::leaf_schema`])
//! - encoding every supported operation into the exact instruction buffer
//!   and account order the programs consume ([`instructions`])
//! - deriving the program-owned addresses those operations reference ([`pda`])
//! - the proof payload shape served by a DAS-style indexer ([`das`])
//!
//! The canonical tree state is owned by the on-chain programs; proofs are
//! supplied on demand by an off-chain indexer. Gumshoe holds no state of its
//! own, performs no I/O, and every function here is safe to call from any
//! number of threads at once. A proof is only valid until the next confirmed
//! mutation of its tree, so fetch one per operation and do not reuse it.

pub mod das;
pub mod error;
pub mod hash;
pub mod instructions;
pub mod pda;
pub mod proof;
pub mod state;

use solana_program::declare_id;

pub use crate::error::GumshoeError;
pub use crate::hash::{combine, empty_node, recompute, Node, EMPTY};
pub use crate::proof::ConcurrentMerkleProof;
pub use crate::state::leaf_schema::{LeafSchema, Version};
pub use crate::state::metadata::MetadataArgs;
pub use crate::state::TreeConfig;

declare_id!("BGUMAp9Gq7iTEuizy4pqaxsTyUCBK68MDfK752saRPUY");

/// Program that owns the concurrent Merkle tree accounts.
pub mod gummyroll {
    solana_program::declare_id!("GRoLLzvxpxxu2PGNJMMeZPyMxjAUH9pKqxGXV9DGiceU");
}

/// Program used to emit changelogs as instruction data.
pub mod candy_wrapper {
    solana_program::declare_id!("WRAPYChf58WFCnyjXKJHtrPgzKXgHp6MD9aVDqJBbGh");
}

/// Token metadata program, referenced by the collection and decompress paths.
pub mod token_metadata {
    solana_program::declare_id!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
}

pub mod spl_token {
    solana_program::declare_id!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
}

pub mod associated_token {
    solana_program::declare_id!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");
}
