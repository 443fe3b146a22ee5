//! Stateless verification of concurrent Merkle tree membership proofs.
//!
//! Verification is pure: recompute the root from the leaf and its sibling
//! path, compare against the claimed root. A failed comparison is an
//! expected business outcome and is reported as `false`; malformed shapes
//! also report `false` rather than panicking past the caller.

use crate::error::GumshoeError;
use crate::hash::{recompute, Node};

/// Deepest tree the tree program will initialize.
pub const MAX_TREE_DEPTH: usize = 30;

/// Evidence that `leaf` occupies position `index` in the tree whose root is
/// `root`. One sibling hash per level, ordered leaf to root.
///
/// Proofs are constructed fresh for every mutating operation. The tree root
/// changes on every confirmed append or replace, so a held proof goes stale
/// and must be refetched, not retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConcurrentMerkleProof {
    pub root: Node,
    pub leaf: Node,
    pub proof: Vec<Node>,
    pub index: u32,
}

impl ConcurrentMerkleProof {
    pub fn new(root: Node, leaf: Node, proof: Vec<Node>, index: u32) -> Self {
        Self {
            root,
            leaf,
            proof,
            index,
        }
    }

    /// Tree depth this proof claims to span.
    pub fn depth(&self) -> usize {
        self.proof.len()
    }

    /// Checks the proof length against a known tree depth.
    pub fn expect_depth(&self, depth: usize) -> Result<(), GumshoeError> {
        if self.proof.len() != depth {
            return Err(GumshoeError::InvalidProofLength(self.proof.len()));
        }
        Ok(())
    }

    /// Recomputes the root and compares it to the claimed one.
    pub fn verify(&self) -> bool {
        verify_proof(self.root, self.leaf, &self.proof, self.index)
    }
}

/// Returns true iff `proof` reduces `leaf` at `index` to `root`.
///
/// Fails closed: an empty proof, a proof deeper than [`MAX_TREE_DEPTH`], or
/// an index outside the tree's capacity all return false.
pub fn verify_proof(root: Node, leaf: Node, proof: &[Node], index: u32) -> bool {
    if proof.is_empty() || proof.len() > MAX_TREE_DEPTH {
        return false;
    }
    if (index as u64) >= (1u64 << proof.len()) {
        return false;
    }
    recompute(leaf, proof, index) == root
}


#[cfg(test)]
mod tests {
    use super::test_tree::MerkleTree;
    use super::*;
    use crate::hash::combine;
    use rand::{thread_rng, Rng};

    fn random_leaves(count: usize) -> Vec<Node> {
        let mut rng = thread_rng();
        (0..count).map(|_| rng.gen::<Node>()).collect()
    }

    #[test]
    fn verifies_every_leaf_of_reference_tree() {
        let depth = 4;
        let tree = MerkleTree::new(depth, random_leaves(1 << depth));
        let root = tree.root();
        for i in 0..(1 << depth) {
            let proof = ConcurrentMerkleProof::new(root, tree.get_leaf(i), tree.get_proof(i), i as u32);
            assert_eq!(proof.depth(), depth);
            assert!(proof.verify(), "leaf {} failed to verify", i);
        }
    }

    #[test]
    fn verifies_after_leaf_replacement() {
        let depth = 3;
        let mut tree = MerkleTree::new(depth, random_leaves(1 << depth));
        let mut rng = thread_rng();
        tree.set_leaf(5, rng.gen::<Node>());
        let proof = ConcurrentMerkleProof::new(tree.root(), tree.get_leaf(5), tree.get_proof(5), 5);
        assert!(proof.verify());
    }

    #[test]
    fn rejects_any_single_byte_mutation() {
        let depth = 3;
        let tree = MerkleTree::new(depth, random_leaves(1 << depth));
        let root = tree.root();
        let leaf = tree.get_leaf(2);
        let proof = tree.get_proof(2);

        let mut bad_leaf = leaf;
        bad_leaf[7] ^= 1;
        assert!(!verify_proof(root, bad_leaf, &proof, 2));

        let mut bad_root = root;
        bad_root[31] ^= 1;
        assert!(!verify_proof(bad_root, leaf, &proof, 2));

        for level in 0..depth {
            let mut bad_proof = proof.clone();
            bad_proof[level][0] ^= 1;
            assert!(
                !verify_proof(root, leaf, &bad_proof, 2),
                "mutated proof node at level {} still verified",
                level
            );
        }
    }

    #[test]
    fn two_leaf_tree_by_hand() {
        let l0 = [11u8; 32];
        let l1 = [22u8; 32];
        let root = combine(&l0, &l1);

        assert!(verify_proof(root, l0, &[l1], 0));
        assert!(!verify_proof(root, l0, &[l1], 1));
        assert!(verify_proof(root, l1, &[l0], 1));
    }

    #[test]
    fn index_flips_outcome_unless_children_collide() {
        let leaf = [9u8; 32];
        let degenerate = combine(&leaf, &leaf);
        // Both orderings hash identically when the children are identical.
        assert!(verify_proof(degenerate, leaf, &[leaf], 0));
        assert!(verify_proof(degenerate, leaf, &[leaf], 1));
    }

    #[test]
    fn fails_closed_on_malformed_shapes() {
        let node = [1u8; 32];
        assert!(!verify_proof(node, node, &[], 0));
        assert!(!verify_proof(node, node, &vec![node; MAX_TREE_DEPTH + 1], 0));
        // Index beyond the capacity of a depth-2 tree.
        assert!(!verify_proof(node, node, &[node, node], 4));
    }

    #[test]
    fn expect_depth_flags_length_mismatch() {
        let tree = MerkleTree::new(3, random_leaves(8));
        let proof = ConcurrentMerkleProof::new(tree.root(), tree.get_leaf(0), tree.get_proof(0), 0);
        assert!(proof.expect_depth(3).is_ok());
        assert!(matches!(
            proof.expect_depth(4),
            Err(GumshoeError::InvalidProofLength(3))
        ));
    }
}
