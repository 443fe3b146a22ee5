use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::keccak;
use solana_program::pubkey::Pubkey;

use crate::error::GumshoeError;
use crate::hash::Node;

#[derive(BorshDeserialize, BorshSerialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Version {
    V1,
}

/// Canonical record behind one tree leaf. The tree stores the hash of this
/// record, never the record itself, so the serialization must stay
/// deterministic and fixed-width per field.
#[derive(BorshDeserialize, BorshSerialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafSchema {
    V1 {
        id: Pubkey,
        owner: Pubkey,
        delegate: Pubkey, // Defaults to owner
        nonce: u64,
        data_hash: [u8; 32],
        creator_hash: [u8; 32],
    },
}

impl LeafSchema {
    pub fn new_v1(
        id: Pubkey,
        owner: Pubkey,
        delegate: Pubkey,
        nonce: u64,
        data_hash: [u8; 32],
        creator_hash: [u8; 32],
    ) -> Self {
        Self::V1 {
            id,
            owner,
            delegate,
            nonce,
            data_hash,
            creator_hash,
        }
    }

    pub fn version(&self) -> Version {
        match self {
            LeafSchema::V1 { .. } => Version::V1,
        }
    }

    pub fn id(&self) -> Pubkey {
        match self {
            LeafSchema::V1 { id, .. } => *id,
        }
    }

    pub fn owner(&self) -> Pubkey {
        match self {
            LeafSchema::V1 { owner, .. } => *owner,
        }
    }

    pub fn delegate(&self) -> Pubkey {
        match self {
            LeafSchema::V1 { delegate, .. } => *delegate,
        }
    }

    pub fn nonce(&self) -> u64 {
        match self {
            LeafSchema::V1 { nonce, .. } => *nonce,
        }
    }

    /// Serializes to the fixed wire layout. Inverse of [`LeafSchema::decode`].
    pub fn encode(&self) -> Result<Vec<u8>, GumshoeError> {
        self.try_to_vec().map_err(Into::into)
    }

    /// Rejects trailing bytes as well as truncated input.
    pub fn decode(buf: &[u8]) -> Result<Self, GumshoeError> {
        Self::try_from_slice(buf).map_err(Into::into)
    }

    /// The 32 bytes that occupy the tree leaf. The preimage field order is
    /// what the mint, transfer and burn paths all verify against.
    pub fn to_node(&self) -> Node {
        match self {
            LeafSchema::V1 {
                id,
                owner,
                delegate,
                nonce,
                data_hash,
                creator_hash,
            } => keccak::hashv(&[
                id.as_ref(),
                owner.as_ref(),
                delegate.as_ref(),
                nonce.to_le_bytes().as_ref(),
                data_hash.as_ref(),
                creator_hash.as_ref(),
            ])
            .to_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{signature::Keypair, signer::Signer};

    fn sample() -> LeafSchema {
        LeafSchema::new_v1(
            Keypair::new().pubkey(),
            Keypair::new().pubkey(),
            Keypair::new().pubkey(),
            7,
            [5u8; 32],
            [6u8; 32],
        )
    }

    #[test]
    fn round_trips() {
        let schema = sample();
        let bytes = schema.encode().unwrap();
        assert_eq!(LeafSchema::decode(&bytes).unwrap(), schema);
    }

    #[test]
    fn v1_wire_layout_is_fixed_width() {
        let bytes = sample().encode().unwrap();
        // version tag, three addresses, LE nonce, two hashes
        assert_eq!(bytes.len(), 1 + 32 * 3 + 8 + 32 * 2);
        assert_eq!(bytes[0], 0);
        // nonce 7 sits after the tag and addresses, little-endian
        assert_eq!(&bytes[97..105], &[7, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn decode_rejects_truncation_and_trailing_bytes() {
        let mut bytes = sample().encode().unwrap();
        assert!(LeafSchema::decode(&bytes[..bytes.len() - 1]).is_err());
        bytes.push(0);
        assert!(LeafSchema::decode(&bytes).is_err());
    }

    #[test]
    fn to_node_matches_manual_preimage() {
        let schema = sample();
        let expected = keccak::hashv(&[
            schema.id().as_ref(),
            schema.owner().as_ref(),
            schema.delegate().as_ref(),
            schema.nonce().to_le_bytes().as_ref(),
            &[5u8; 32],
            &[6u8; 32],
        ])
        .to_bytes();
        assert_eq!(schema.to_node(), expected);
    }

    #[test]
    fn to_node_is_sensitive_to_every_field() {
        let base = sample();
        let node = base.to_node();

        let mut owner_changed = base;
        if let LeafSchema::V1 { ref mut owner, .. } = owner_changed {
            *owner = Keypair::new().pubkey();
        }
        assert_ne!(node, owner_changed.to_node());

        let mut nonce_changed = base;
        if let LeafSchema::V1 { ref mut nonce, .. } = nonce_changed {
            *nonce += 1;
        }
        assert_ne!(node, nonce_changed.to_node());
    }
}
