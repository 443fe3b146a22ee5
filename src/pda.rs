//! Deterministic derivation of the program-owned addresses tree operations
//! reference. Same inputs always produce the same address and bump; there is
//! no randomness and no I/O here.

use solana_program::pubkey::Pubkey;

/// Seed prefix for redemption vouchers.
pub const VOUCHER_PREFIX: &[u8] = b"voucher";

/// Seed prefix for compressed asset ids.
pub const ASSET_PREFIX: &[u8] = b"asset";

/// Seed prefix for the collection CPI signer.
pub const COLLECTION_CPI_PREFIX: &[u8] = b"collection_cpi";

/// Authority PDA that signs tree mutations on behalf of the asset program.
pub fn find_tree_authority(tree: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[tree.as_ref()], &crate::id())
}

/// Voucher account for the leaf minted as number `nonce` of `tree`.
pub fn find_voucher(tree: &Pubkey, nonce: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[VOUCHER_PREFIX, tree.as_ref(), nonce.to_le_bytes().as_ref()],
        &crate::id(),
    )
}

/// Address of the compressed asset minted as leaf number `nonce` of `tree`.
pub fn find_asset_id(tree: &Pubkey, nonce: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[ASSET_PREFIX, tree.as_ref(), nonce.to_le_bytes().as_ref()],
        &crate::id(),
    )
}

/// Signer the asset program presents when verifying collection membership.
pub fn find_collection_signer() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[COLLECTION_CPI_PREFIX], &crate::id())
}
