//! Keccak hashing for tree nodes and leaf preimages.
//!
//! The remote verifier recomputes roots with keccak-256. The same primitive
//! is pinned here: a proof hashed with any other function will verify
//! locally and still be rejected on-chain, so this is a compatibility
//! contract rather than an implementation detail.

use borsh::BorshSerialize;
use solana_program::keccak::hashv;

use crate::error::GumshoeError;
use crate::state::metadata::{Creator, MetadataArgs};

/// A node of the Merkle tree: 32 bytes of keccak output.
pub type Node = [u8; 32];

/// The content of an unoccupied leaf.
pub const EMPTY: Node = [0; 32];

/// Hashes two child nodes into their parent.
pub fn combine(left: &Node, right: &Node) -> Node {
    hashv(&[left.as_ref(), right.as_ref()]).to_bytes()
}

/// Recomputes the root implied by `leaf` sitting at `index` under `proof`.
///
/// Bit `i` of `index` gives the child order at level `i`: 0 means the
/// running node is the left child of its parent.
pub fn recompute(leaf: Node, proof: &[Node], index: u32) -> Node {
    let mut node = leaf;
    for (i, sibling) in proof.iter().enumerate() {
        if index >> i & 1 == 0 {
            node = combine(&node, sibling);
        } else {
            node = combine(sibling, &node);
        }
    }
    node
}

/// Root of a fully empty subtree of height `level`.
pub fn empty_node(level: u32) -> Node {
    let mut data = EMPTY;
    if level != 0 {
        let lower = empty_node(level - 1);
        data = combine(&lower, &lower);
    }
    data
}

/// Data-hash preimage for a compressed asset: the keccak of the serialized
/// metadata, hashed again with the LE seller fee basis points.
pub fn hash_metadata(metadata: &MetadataArgs) -> Result<[u8; 32], GumshoeError> {
    let bytes = metadata.try_to_vec()?;
    let metadata_hash = hashv(&[bytes.as_slice()]);
    Ok(hashv(&[
        metadata_hash.as_ref(),
        metadata.seller_fee_basis_points.to_le_bytes().as_ref(),
    ])
    .to_bytes())
}

/// Creator-hash preimage: address, verified byte and share per creator, in
/// list order.
pub fn hash_creators(creators: &[Creator]) -> [u8; 32] {
    let creator_data: Vec<Vec<u8>> = creators
        .iter()
        .map(|c| {
            let mut data = Vec::with_capacity(34);
            data.extend_from_slice(c.address.as_ref());
            data.push(c.verified as u8);
            data.push(c.share);
            data
        })
        .collect();
    hashv(
        creator_data
            .iter()
            .map(|d| d.as_slice())
            .collect::<Vec<&[u8]>>()
            .as_slice(),
    )
    .to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_program::pubkey::Pubkey;

    #[test]
    fn combine_is_order_sensitive() {
        let left = [1u8; 32];
        let right = [2u8; 32];
        assert_eq!(combine(&left, &right), combine(&left, &right));
        assert_ne!(combine(&left, &right), combine(&right, &left));
    }

    #[test]
    fn empty_node_chains_upward() {
        assert_eq!(empty_node(0), EMPTY);
        assert_eq!(empty_node(1), combine(&EMPTY, &EMPTY));
        let two = empty_node(2);
        assert_eq!(two, combine(&empty_node(1), &empty_node(1)));
    }

    #[test]
    fn recompute_depth_two_by_hand() {
        let leaves = [[1u8; 32], [2u8; 32], [3u8; 32], [4u8; 32]];
        let left = combine(&leaves[0], &leaves[1]);
        let right = combine(&leaves[2], &leaves[3]);
        let root = combine(&left, &right);

        // Leaf 2 is the left child of the right subtree.
        assert_eq!(recompute(leaves[2], &[leaves[3], left], 2), root);
        // The same proof contents at the wrong index miss the root.
        assert_ne!(recompute(leaves[2], &[leaves[3], left], 3), root);
    }

    #[test]
    fn creator_hash_reflects_order_and_flags() {
        let a = Creator {
            address: Pubkey::new_unique(),
            verified: false,
            share: 60,
        };
        let b = Creator {
            address: Pubkey::new_unique(),
            verified: true,
            share: 40,
        };
        assert_eq!(hash_creators(&[a, b]), hash_creators(&[a, b]));
        assert_ne!(hash_creators(&[a, b]), hash_creators(&[b, a]));

        let mut unverified = b;
        unverified.verified = false;
        assert_ne!(hash_creators(&[a, b]), hash_creators(&[a, unverified]));
    }

    #[test]
    fn metadata_hash_binds_seller_fee() {
        let mut metadata = MetadataArgs::test_default();
        let before = hash_metadata(&metadata).unwrap();
        assert_eq!(before, hash_metadata(&metadata).unwrap());

        metadata.seller_fee_basis_points += 1;
        assert_ne!(before, hash_metadata(&metadata).unwrap());
    }
}
