//! Off-chain-style attributes embedded in a compressed asset's data hash.
//! The borsh layout here is part of the wire format: little-endian
//! fixed-width integers, 4-byte LE length-prefixed strings, and a one-byte
//! presence tag for every optional field.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::GumshoeError;

pub const MAX_CREATORS: usize = 5;

#[derive(BorshDeserialize, BorshSerialize, PartialEq, Eq, Copy, Clone, Debug)]
pub enum TokenProgramVersion {
    Original,
    Token2022,
}

#[derive(BorshDeserialize, BorshSerialize, PartialEq, Eq, Copy, Clone, Debug)]
pub struct Creator {
    pub address: Pubkey,
    pub verified: bool,
    // In percentages, NOT basis points ;) Watch out!
    pub share: u8,
}

#[derive(BorshDeserialize, BorshSerialize, PartialEq, Eq, Copy, Clone, Debug)]
pub enum TokenStandard {
    NonFungible,        // This is a master edition
    FungibleAsset,      // A token with metadata that can also have attrributes
    Fungible,           // A token with simple metadata
    NonFungibleEdition, // This is a limited edition
}

#[derive(BorshDeserialize, BorshSerialize, PartialEq, Eq, Copy, Clone, Debug)]
pub enum UseMethod {
    Burn,
    Multiple,
    Single,
}

#[derive(BorshDeserialize, BorshSerialize, PartialEq, Eq, Copy, Clone, Debug)]
pub struct Uses {
    pub use_method: UseMethod,
    pub remaining: u64,
    pub total: u64,
}

#[derive(BorshDeserialize, BorshSerialize, PartialEq, Eq, Copy, Clone, Debug)]
pub struct Collection {
    pub verified: bool,
    pub key: Pubkey,
}

#[derive(BorshDeserialize, BorshSerialize, PartialEq, Eq, Clone, Debug)]
pub struct MetadataArgs {
    /// The name of the asset
    pub name: String,
    /// The symbol for the asset
    pub symbol: String,
    /// URI pointing to JSON representing the asset
    pub uri: String,
    /// Royalty basis points that goes to creators in secondary sales (0-10000)
    pub seller_fee_basis_points: u16,
    // Immutable, once flipped, all sales of this metadata are considered secondary.
    pub primary_sale_happened: bool,
    // Whether or not the data struct is mutable, default is not
    pub is_mutable: bool,
    /// nonce for easy calculation of editions, if present
    pub edition_nonce: Option<u8>,
    /// Since we cannot easily change Metadata, we add the new DataV2 fields here at the end.
    pub token_standard: Option<TokenStandard>,
    /// Collection
    pub collection: Option<Collection>,
    /// Uses
    pub uses: Option<Uses>,
    pub token_program_version: TokenProgramVersion,
    pub creators: Vec<Creator>,
}

impl MetadataArgs {
    /// Caller-side validation; the instruction encoders do not call this.
    pub fn validate(&self) -> Result<(), GumshoeError> {
        if self.seller_fee_basis_points > 10000 {
            return Err(GumshoeError::InvalidBasisPoints(
                self.seller_fee_basis_points,
            ));
        }
        if self.creators.len() > MAX_CREATORS {
            return Err(GumshoeError::TooManyCreators(self.creators.len()));
        }
        if !self.creators.is_empty() {
            let total: u32 = self.creators.iter().map(|c| c.share as u32).sum();
            if total != 100 {
                return Err(GumshoeError::InvalidCreatorShareTotal(total));
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn test_default() -> Self {
        Self {
            name: String::from("Test #1"),
            symbol: String::from("BUBBLE"),
            uri: String::from("https://arweave.net/abc"),
            seller_fee_basis_points: 500,
            primary_sale_happened: false,
            is_mutable: true,
            edition_nonce: None,
            token_standard: Some(TokenStandard::NonFungible),
            collection: None,
            uses: None,
            token_program_version: TokenProgramVersion::Original,
            creators: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use borsh::BorshSerialize;
    use solana_sdk::{signature::Keypair, signer::Signer};

    #[test]
    fn minimal_args_have_the_documented_layout() {
        let args = MetadataArgs {
            name: String::new(),
            symbol: String::new(),
            uri: String::new(),
            seller_fee_basis_points: 500,
            primary_sale_happened: false,
            is_mutable: true,
            edition_nonce: None,
            token_standard: None,
            collection: None,
            uses: None,
            token_program_version: TokenProgramVersion::Original,
            creators: vec![],
        };
        let bytes = args.try_to_vec().unwrap();
        let expected: Vec<u8> = vec![
            0, 0, 0, 0, // name length
            0, 0, 0, 0, // symbol length
            0, 0, 0, 0, // uri length
            244, 1, // seller fee, LE
            0, // primary_sale_happened
            1, // is_mutable
            0, // edition_nonce absent
            0, // token_standard absent
            0, // collection absent
            0, // uses absent
            0, // token_program_version
            0, 0, 0, 0, // creators length
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn optional_fields_encode_presence_byte_then_payload() {
        let mut args = MetadataArgs::test_default();
        args.token_standard = None;
        let absent = args.try_to_vec().unwrap();

        args.token_standard = Some(TokenStandard::Fungible);
        let present = args.try_to_vec().unwrap();
        assert_eq!(present.len(), absent.len() + 1);

        args.edition_nonce = Some(255);
        let with_nonce = args.try_to_vec().unwrap();
        assert_eq!(with_nonce.len(), present.len() + 1);
    }

    #[test]
    fn strings_are_length_prefixed() {
        let mut args = MetadataArgs::test_default();
        args.name = String::from("AB");
        let bytes = args.try_to_vec().unwrap();
        assert_eq!(&bytes[..6], &[2, 0, 0, 0, b'A', b'B']);
    }

    #[test]
    fn encoding_is_deterministic() {
        let args = MetadataArgs::test_default();
        assert_eq!(args.try_to_vec().unwrap(), args.try_to_vec().unwrap());
    }

    #[test]
    fn validate_checks_creator_shares() {
        let mut args = MetadataArgs::test_default();
        assert!(args.validate().is_ok());

        args.creators = vec![
            Creator {
                address: Keypair::new().pubkey(),
                verified: true,
                share: 60,
            },
            Creator {
                address: Keypair::new().pubkey(),
                verified: false,
                share: 40,
            },
        ];
        assert!(args.validate().is_ok());

        args.creators[1].share = 50;
        assert!(matches!(
            args.validate(),
            Err(GumshoeError::InvalidCreatorShareTotal(110))
        ));
    }

    #[test]
    fn validate_bounds_fee_and_creator_count() {
        let mut args = MetadataArgs::test_default();
        args.seller_fee_basis_points = 10001;
        assert!(matches!(
            args.validate(),
            Err(GumshoeError::InvalidBasisPoints(10001))
        ));

        let mut args = MetadataArgs::test_default();
        args.creators = (0..6)
            .map(|_| Creator {
                address: Keypair::new().pubkey(),
                verified: false,
                share: 0,
            })
            .collect();
        assert!(matches!(
            args.validate(),
            Err(GumshoeError::TooManyCreators(6))
        ));
    }
}
