//! Builders for every instruction the tree and asset programs accept.
//!
//! Each builder returns a fully formed [`Instruction`]: the program address,
//! the account list in the exact role order the program expects, and a byte
//! buffer of `discriminator ‖ borsh-serialized arguments`. Proof-carrying
//! operations append one read-only account per proof node after the fixed
//! roles, in proof order.
//!
//! The account ordering contract lives in the per-operation tables below so
//! it can be checked independently of the builders. The builders only zip
//! keys against their table; they never reorder.

use borsh::BorshSerialize;
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;
use solana_program::system_program;
use solana_program::sysvar;

use crate::error::GumshoeError;
use crate::hash::Node;
use crate::pda;
use crate::proof::{ConcurrentMerkleProof, MAX_TREE_DEPTH};
use crate::state::metadata::MetadataArgs;
use crate::state::TreeConfig;

/// 8-byte tags prefixed to every instruction buffer. Protocol constants,
/// never derived at runtime.
pub mod discriminator {
    pub const INIT_EMPTY_GUMMYROLL: [u8; 8] = [0x93, 0x71, 0xd9, 0x19, 0x51, 0xcd, 0xfd, 0xb8];
    pub const APPEND: [u8; 8] = [0x95, 0x78, 0x12, 0xde, 0xec, 0xe1, 0x58, 0xcb];
    pub const REPLACE_LEAF: [u8; 8] = [0xcc, 0xa5, 0x4c, 0x64, 0x49, 0x93, 0x00, 0x80];
    pub const VERIFY_LEAF: [u8; 8] = [0x7c, 0xdc, 0x16, 0xdf, 0x68, 0x0a, 0xfa, 0xe0];
    pub const CREATE_TREE: [u8; 8] = [0xa5, 0x53, 0x88, 0x8e, 0x59, 0xca, 0x2f, 0xdc];
    pub const MINT_V1: [u8; 8] = [0x91, 0x62, 0xc0, 0x76, 0xb8, 0x93, 0x76, 0x68];
    pub const MINT_TO_COLLECTION_V1: [u8; 8] = [0x99, 0x12, 0xb2, 0x2f, 0xc5, 0x9e, 0x56, 0x0f];
    pub const TRANSFER: [u8; 8] = [0xa3, 0x34, 0xc8, 0xe7, 0x8c, 0x03, 0x45, 0xba];
    pub const BURN: [u8; 8] = [0x74, 0x6e, 0x1d, 0x38, 0x6b, 0xdb, 0x2a, 0x5d];
    pub const DECOMPRESS_V1: [u8; 8] = [0x36, 0x55, 0x4c, 0x46, 0xe4, 0xfa, 0xa4, 0x51];
}

/// Operation named by an instruction buffer's discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionName {
    Unknown,
    InitEmptyGummyroll,
    Append,
    ReplaceLeaf,
    VerifyLeaf,
    CreateTree,
    MintV1,
    MintToCollectionV1,
    Transfer,
    Burn,
    DecompressV1,
}

/// Maps an instruction buffer back to the operation it encodes.
pub fn get_instruction_type(data: &[u8]) -> InstructionName {
    if data.len() < 8 {
        return InstructionName::Unknown;
    }
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&data[..8]);
    match disc {
        discriminator::INIT_EMPTY_GUMMYROLL => InstructionName::InitEmptyGummyroll,
        discriminator::APPEND => InstructionName::Append,
        discriminator::REPLACE_LEAF => InstructionName::ReplaceLeaf,
        discriminator::VERIFY_LEAF => InstructionName::VerifyLeaf,
        discriminator::CREATE_TREE => InstructionName::CreateTree,
        discriminator::MINT_V1 => InstructionName::MintV1,
        discriminator::MINT_TO_COLLECTION_V1 => InstructionName::MintToCollectionV1,
        discriminator::TRANSFER => InstructionName::Transfer,
        discriminator::BURN => InstructionName::Burn,
        discriminator::DECOMPRESS_V1 => InstructionName::DecompressV1,
        _ => InstructionName::Unknown,
    }
}

/// One row of an operation's account table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountSpec {
    pub role: &'static str,
    pub is_signer: bool,
    pub is_writable: bool,
}

pub const CREATE_TREE_ACCOUNTS: &[AccountSpec] = &[
    AccountSpec { role: "tree_authority", is_signer: false, is_writable: true },
    AccountSpec { role: "merkle_roll", is_signer: false, is_writable: true },
    AccountSpec { role: "payer", is_signer: true, is_writable: true },
    AccountSpec { role: "tree_creator", is_signer: true, is_writable: false },
    AccountSpec { role: "candy_wrapper", is_signer: false, is_writable: false },
    AccountSpec { role: "gummyroll_program", is_signer: false, is_writable: false },
    AccountSpec { role: "system_program", is_signer: false, is_writable: false },
];

/// Direct tree mutations share the tree program's `Modify` ordering.
pub const MODIFY_ACCOUNTS: &[AccountSpec] = &[
    AccountSpec { role: "merkle_roll", is_signer: false, is_writable: true },
    AccountSpec { role: "authority", is_signer: true, is_writable: false },
    AccountSpec { role: "candy_wrapper", is_signer: false, is_writable: false },
];

pub const VERIFY_LEAF_ACCOUNTS: &[AccountSpec] = &[
    AccountSpec { role: "merkle_roll", is_signer: false, is_writable: false },
];

pub const MINT_V1_ACCOUNTS: &[AccountSpec] = &[
    AccountSpec { role: "tree_authority", is_signer: false, is_writable: true },
    AccountSpec { role: "leaf_owner", is_signer: false, is_writable: false },
    AccountSpec { role: "leaf_delegate", is_signer: false, is_writable: false },
    AccountSpec { role: "merkle_roll", is_signer: false, is_writable: true },
    AccountSpec { role: "payer", is_signer: true, is_writable: true },
    AccountSpec { role: "tree_delegate", is_signer: true, is_writable: false },
    AccountSpec { role: "candy_wrapper", is_signer: false, is_writable: false },
    AccountSpec { role: "gummyroll_program", is_signer: false, is_writable: false },
    AccountSpec { role: "system_program", is_signer: false, is_writable: false },
];

pub const MINT_TO_COLLECTION_V1_ACCOUNTS: &[AccountSpec] = &[
    AccountSpec { role: "tree_authority", is_signer: false, is_writable: true },
    AccountSpec { role: "leaf_owner", is_signer: false, is_writable: false },
    AccountSpec { role: "leaf_delegate", is_signer: false, is_writable: false },
    AccountSpec { role: "merkle_roll", is_signer: false, is_writable: true },
    AccountSpec { role: "payer", is_signer: true, is_writable: true },
    AccountSpec { role: "tree_delegate", is_signer: true, is_writable: false },
    AccountSpec { role: "collection_authority", is_signer: true, is_writable: false },
    AccountSpec { role: "collection_authority_record", is_signer: false, is_writable: false },
    AccountSpec { role: "collection_mint", is_signer: false, is_writable: false },
    AccountSpec { role: "collection_metadata", is_signer: false, is_writable: true },
    AccountSpec { role: "collection_edition", is_signer: false, is_writable: false },
    AccountSpec { role: "bubblegum_signer", is_signer: false, is_writable: false },
    AccountSpec { role: "candy_wrapper", is_signer: false, is_writable: false },
    AccountSpec { role: "gummyroll_program", is_signer: false, is_writable: false },
    AccountSpec { role: "token_metadata_program", is_signer: false, is_writable: false },
    AccountSpec { role: "system_program", is_signer: false, is_writable: false },
];

pub const TRANSFER_ACCOUNTS: &[AccountSpec] = &[
    AccountSpec { role: "tree_authority", is_signer: false, is_writable: false },
    AccountSpec { role: "leaf_owner", is_signer: true, is_writable: false },
    AccountSpec { role: "leaf_delegate", is_signer: false, is_writable: false },
    AccountSpec { role: "new_leaf_owner", is_signer: false, is_writable: false },
    AccountSpec { role: "merkle_roll", is_signer: false, is_writable: true },
    AccountSpec { role: "candy_wrapper", is_signer: false, is_writable: false },
    AccountSpec { role: "gummyroll_program", is_signer: false, is_writable: false },
    AccountSpec { role: "system_program", is_signer: false, is_writable: false },
];

pub const BURN_ACCOUNTS: &[AccountSpec] = &[
    AccountSpec { role: "tree_authority", is_signer: false, is_writable: false },
    AccountSpec { role: "leaf_owner", is_signer: true, is_writable: false },
    AccountSpec { role: "leaf_delegate", is_signer: false, is_writable: false },
    AccountSpec { role: "merkle_roll", is_signer: false, is_writable: true },
    AccountSpec { role: "candy_wrapper", is_signer: false, is_writable: false },
    AccountSpec { role: "gummyroll_program", is_signer: false, is_writable: false },
    AccountSpec { role: "system_program", is_signer: false, is_writable: false },
];

pub const DECOMPRESS_V1_ACCOUNTS: &[AccountSpec] = &[
    AccountSpec { role: "tree_authority", is_signer: false, is_writable: false },
    AccountSpec { role: "leaf_owner", is_signer: true, is_writable: true },
    AccountSpec { role: "merkle_roll", is_signer: false, is_writable: true },
    AccountSpec { role: "voucher", is_signer: false, is_writable: true },
    AccountSpec { role: "mint", is_signer: false, is_writable: true },
    AccountSpec { role: "token_account", is_signer: false, is_writable: true },
    AccountSpec { role: "metadata", is_signer: false, is_writable: true },
    AccountSpec { role: "master_edition", is_signer: false, is_writable: true },
    AccountSpec { role: "candy_wrapper", is_signer: false, is_writable: false },
    AccountSpec { role: "gummyroll_program", is_signer: false, is_writable: false },
    AccountSpec { role: "token_program", is_signer: false, is_writable: false },
    AccountSpec { role: "associated_token_program", is_signer: false, is_writable: false },
    AccountSpec { role: "token_metadata_program", is_signer: false, is_writable: false },
    AccountSpec { role: "system_program", is_signer: false, is_writable: false },
    AccountSpec { role: "rent", is_signer: false, is_writable: false },
];

fn build_accounts(spec: &[AccountSpec], keys: &[Pubkey]) -> Vec<AccountMeta> {
    debug_assert_eq!(spec.len(), keys.len());
    spec.iter()
        .zip(keys)
        .map(|(s, key)| AccountMeta {
            pubkey: *key,
            is_signer: s.is_signer,
            is_writable: s.is_writable,
        })
        .collect()
}

fn append_proof(accounts: &mut Vec<AccountMeta>, proof: &[Node]) {
    accounts.extend(
        proof
            .iter()
            .map(|node| AccountMeta::new_readonly(Pubkey::new_from_array(*node), false)),
    );
}

fn check_proof(proof: &[Node], index: u32) -> Result<(), GumshoeError> {
    if proof.is_empty() || proof.len() > MAX_TREE_DEPTH {
        return Err(GumshoeError::InvalidProofLength(proof.len()));
    }
    if (index as u64) >= (1u64 << proof.len()) {
        return Err(GumshoeError::LeafIndexOutOfBounds {
            index,
            depth: proof.len(),
        });
    }
    Ok(())
}

fn encode(disc: [u8; 8], args: &impl BorshSerialize) -> Result<Vec<u8>, GumshoeError> {
    let mut data = disc.to_vec();
    args.serialize(&mut data)?;
    Ok(data)
}

#[derive(Clone, Debug)]
pub struct CreateTreeAccounts {
    pub merkle_roll: Pubkey,
    pub payer: Pubkey,
    pub tree_creator: Pubkey,
}

#[derive(BorshSerialize)]
struct CreateTreeArgs {
    max_depth: u32,
    max_buffer_size: u32,
}

/// Initializes a new tree through the asset program. The tree authority PDA
/// is derived from the tree address; callers only supply the keys they own.
pub fn create_tree(
    accounts: &CreateTreeAccounts,
    config: TreeConfig,
) -> Result<Instruction, GumshoeError> {
    config.validate()?;
    let (tree_authority, _) = pda::find_tree_authority(&accounts.merkle_roll);
    let keys = [
        tree_authority,
        accounts.merkle_roll,
        accounts.payer,
        accounts.tree_creator,
        crate::candy_wrapper::id(),
        crate::gummyroll::id(),
        system_program::id(),
    ];
    Ok(Instruction {
        program_id: crate::id(),
        accounts: build_accounts(CREATE_TREE_ACCOUNTS, &keys),
        data: encode(
            discriminator::CREATE_TREE,
            &CreateTreeArgs {
                max_depth: config.max_depth,
                max_buffer_size: config.max_buffer_size,
            },
        )?,
    })
}

/// Accounts for direct tree mutations. For asset-program-owned trees the
/// authority is the tree authority PDA.
#[derive(Clone, Debug)]
pub struct ModifyAccounts {
    pub merkle_roll: Pubkey,
    pub authority: Pubkey,
}

impl ModifyAccounts {
    fn keys(&self) -> [Pubkey; 3] {
        [self.merkle_roll, self.authority, crate::candy_wrapper::id()]
    }
}

#[derive(BorshSerialize)]
struct AppendArgs {
    leaf: [u8; 32],
}

/// Appends a leaf at the tree's next free index.
pub fn append(accounts: &ModifyAccounts, leaf: Node) -> Result<Instruction, GumshoeError> {
    Ok(Instruction {
        program_id: crate::gummyroll::id(),
        accounts: build_accounts(MODIFY_ACCOUNTS, &accounts.keys()),
        data: encode(discriminator::APPEND, &AppendArgs { leaf })?,
    })
}

#[derive(BorshSerialize)]
struct ReplaceLeafArgs {
    root: [u8; 32],
    previous_leaf: [u8; 32],
    new_leaf: [u8; 32],
    index: u32,
}

/// Replaces the leaf at `index`, proving the previous leaf against `root`.
pub fn replace_leaf(
    accounts: &ModifyAccounts,
    root: Node,
    previous_leaf: Node,
    new_leaf: Node,
    index: u32,
    proof: &[Node],
) -> Result<Instruction, GumshoeError> {
    check_proof(proof, index)?;
    let mut metas = build_accounts(MODIFY_ACCOUNTS, &accounts.keys());
    append_proof(&mut metas, proof);
    Ok(Instruction {
        program_id: crate::gummyroll::id(),
        accounts: metas,
        data: encode(
            discriminator::REPLACE_LEAF,
            &ReplaceLeafArgs {
                root,
                previous_leaf,
                new_leaf,
                index,
            },
        )?,
    })
}

#[derive(BorshSerialize)]
struct VerifyLeafArgs {
    root: [u8; 32],
    leaf: [u8; 32],
    index: u32,
}

/// Read-only membership check; mutates nothing on either side.
pub fn verify_leaf(
    merkle_roll: &Pubkey,
    proof: &ConcurrentMerkleProof,
) -> Result<Instruction, GumshoeError> {
    check_proof(&proof.proof, proof.index)?;
    let mut metas = build_accounts(VERIFY_LEAF_ACCOUNTS, &[*merkle_roll]);
    append_proof(&mut metas, &proof.proof);
    Ok(Instruction {
        program_id: crate::gummyroll::id(),
        accounts: metas,
        data: encode(
            discriminator::VERIFY_LEAF,
            &VerifyLeafArgs {
                root: proof.root,
                leaf: proof.leaf,
                index: proof.index,
            },
        )?,
    })
}

#[derive(Clone, Debug)]
pub struct MintV1Accounts {
    pub merkle_roll: Pubkey,
    pub leaf_owner: Pubkey,
    pub leaf_delegate: Pubkey,
    pub payer: Pubkey,
    pub tree_delegate: Pubkey,
}

#[derive(BorshSerialize)]
struct MintV1Args {
    message: MetadataArgs,
}

pub fn mint_v1(
    accounts: &MintV1Accounts,
    message: MetadataArgs,
) -> Result<Instruction, GumshoeError> {
    let (tree_authority, _) = pda::find_tree_authority(&accounts.merkle_roll);
    let keys = [
        tree_authority,
        accounts.leaf_owner,
        accounts.leaf_delegate,
        accounts.merkle_roll,
        accounts.payer,
        accounts.tree_delegate,
        crate::candy_wrapper::id(),
        crate::gummyroll::id(),
        system_program::id(),
    ];
    Ok(Instruction {
        program_id: crate::id(),
        accounts: build_accounts(MINT_V1_ACCOUNTS, &keys),
        data: encode(discriminator::MINT_V1, &MintV1Args { message })?,
    })
}

#[derive(Clone, Debug)]
pub struct MintToCollectionV1Accounts {
    pub merkle_roll: Pubkey,
    pub leaf_owner: Pubkey,
    pub leaf_delegate: Pubkey,
    pub payer: Pubkey,
    pub tree_delegate: Pubkey,
    pub collection_authority: Pubkey,
    /// Delegate record when the authority acts through one; the asset
    /// program id otherwise.
    pub collection_authority_record: Pubkey,
    pub collection_mint: Pubkey,
    pub collection_metadata: Pubkey,
    pub collection_edition: Pubkey,
}

#[derive(BorshSerialize)]
struct MintToCollectionV1Args {
    metadata: MetadataArgs,
}

pub fn mint_to_collection_v1(
    accounts: &MintToCollectionV1Accounts,
    metadata: MetadataArgs,
) -> Result<Instruction, GumshoeError> {
    let (tree_authority, _) = pda::find_tree_authority(&accounts.merkle_roll);
    let (bubblegum_signer, _) = pda::find_collection_signer();
    let keys = [
        tree_authority,
        accounts.leaf_owner,
        accounts.leaf_delegate,
        accounts.merkle_roll,
        accounts.payer,
        accounts.tree_delegate,
        accounts.collection_authority,
        accounts.collection_authority_record,
        accounts.collection_mint,
        accounts.collection_metadata,
        accounts.collection_edition,
        bubblegum_signer,
        crate::candy_wrapper::id(),
        crate::gummyroll::id(),
        crate::token_metadata::id(),
        system_program::id(),
    ];
    Ok(Instruction {
        program_id: crate::id(),
        accounts: build_accounts(MINT_TO_COLLECTION_V1_ACCOUNTS, &keys),
        data: encode(
            discriminator::MINT_TO_COLLECTION_V1,
            &MintToCollectionV1Args { metadata },
        )?,
    })
}

#[derive(Clone, Debug)]
pub struct TransferAccounts {
    pub merkle_roll: Pubkey,
    pub leaf_owner: Pubkey,
    pub leaf_delegate: Pubkey,
    pub new_leaf_owner: Pubkey,
}

#[derive(BorshSerialize)]
struct TransferArgs {
    root: [u8; 32],
    data_hash: [u8; 32],
    creator_hash: [u8; 32],
    nonce: u64,
    index: u32,
}

/// The previous leaf is synthesized on-chain from these arguments rather
/// than accepted directly, so the hashes must match what was minted.
pub fn transfer(
    accounts: &TransferAccounts,
    root: Node,
    data_hash: [u8; 32],
    creator_hash: [u8; 32],
    nonce: u64,
    index: u32,
    proof: &[Node],
) -> Result<Instruction, GumshoeError> {
    check_proof(proof, index)?;
    let (tree_authority, _) = pda::find_tree_authority(&accounts.merkle_roll);
    let keys = [
        tree_authority,
        accounts.leaf_owner,
        accounts.leaf_delegate,
        accounts.new_leaf_owner,
        accounts.merkle_roll,
        crate::candy_wrapper::id(),
        crate::gummyroll::id(),
        system_program::id(),
    ];
    let mut metas = build_accounts(TRANSFER_ACCOUNTS, &keys);
    append_proof(&mut metas, proof);
    Ok(Instruction {
        program_id: crate::id(),
        accounts: metas,
        data: encode(
            discriminator::TRANSFER,
            &TransferArgs {
                root,
                data_hash,
                creator_hash,
                nonce,
                index,
            },
        )?,
    })
}

#[derive(Clone, Debug)]
pub struct BurnAccounts {
    pub merkle_roll: Pubkey,
    pub leaf_owner: Pubkey,
    pub leaf_delegate: Pubkey,
}

#[derive(BorshSerialize)]
struct BurnArgs {
    root: [u8; 32],
    data_hash: [u8; 32],
    creator_hash: [u8; 32],
    nonce: u64,
    index: u32,
}

pub fn burn(
    accounts: &BurnAccounts,
    root: Node,
    data_hash: [u8; 32],
    creator_hash: [u8; 32],
    nonce: u64,
    index: u32,
    proof: &[Node],
) -> Result<Instruction, GumshoeError> {
    check_proof(proof, index)?;
    let (tree_authority, _) = pda::find_tree_authority(&accounts.merkle_roll);
    let keys = [
        tree_authority,
        accounts.leaf_owner,
        accounts.leaf_delegate,
        accounts.merkle_roll,
        crate::candy_wrapper::id(),
        crate::gummyroll::id(),
        system_program::id(),
    ];
    let mut metas = build_accounts(BURN_ACCOUNTS, &keys);
    append_proof(&mut metas, proof);
    Ok(Instruction {
        program_id: crate::id(),
        accounts: metas,
        data: encode(
            discriminator::BURN,
            &BurnArgs {
                root,
                data_hash,
                creator_hash,
                nonce,
                index,
            },
        )?,
    })
}

#[derive(Clone, Debug)]
pub struct DecompressV1Accounts {
    pub merkle_roll: Pubkey,
    pub leaf_owner: Pubkey,
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub metadata: Pubkey,
    pub master_edition: Pubkey,
}

#[derive(BorshSerialize)]
struct DecompressV1Args {
    root: [u8; 32],
    data_hash: [u8; 32],
    creator_hash: [u8; 32],
    nonce: u64,
    index: u32,
    metadata: MetadataArgs,
}

/// Proves the leaf out of the tree and mints it back as an uncompressed
/// token in one operation. The voucher PDA is derived from the tree and the
/// leaf's creation nonce.
#[allow(clippy::too_many_arguments)]
pub fn decompress_v1(
    accounts: &DecompressV1Accounts,
    root: Node,
    data_hash: [u8; 32],
    creator_hash: [u8; 32],
    nonce: u64,
    index: u32,
    metadata: MetadataArgs,
    proof: &[Node],
) -> Result<Instruction, GumshoeError> {
    check_proof(proof, index)?;
    let (tree_authority, _) = pda::find_tree_authority(&accounts.merkle_roll);
    let (voucher, _) = pda::find_voucher(&accounts.merkle_roll, nonce);
    let keys = [
        tree_authority,
        accounts.leaf_owner,
        accounts.merkle_roll,
        voucher,
        accounts.mint,
        accounts.token_account,
        accounts.metadata,
        accounts.master_edition,
        crate::candy_wrapper::id(),
        crate::gummyroll::id(),
        crate::spl_token::id(),
        crate::associated_token::id(),
        crate::token_metadata::id(),
        system_program::id(),
        sysvar::rent::id(),
    ];
    let mut metas = build_accounts(DECOMPRESS_V1_ACCOUNTS, &keys);
    append_proof(&mut metas, proof);
    Ok(Instruction {
        program_id: crate::id(),
        accounts: metas,
        data: encode(
            discriminator::DECOMPRESS_V1,
            &DecompressV1Args {
                root,
                data_hash,
                creator_hash,
                nonce,
                index,
                metadata,
            },
        )?,
    })
}
