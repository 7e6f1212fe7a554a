use bip32::{ChildNumber, XPrv};
use hdwallet_btc::address::{pubkey_to_address, AddressKind};
use hdwallet_btc::network::BtcNetwork;

use crate::error::WalletError;

/// Branch index of the receiving chain under the account node.
pub const EXTERNAL_BRANCH: u32 = 0;

/// Branch index of the change chain under the account node.
pub const INTERNAL_BRANCH: u32 = 1;

/// Derivation path of an address: m/account'/branch/index
pub fn address_path(account: u32, branch: u32, index: u32) -> String {
    format!("m/{}'/{}/{}", account, branch, index)
}

/// BIP-32 master key from raw seed bytes (16, 32 or 64 bytes).
pub fn master_key(seed: &[u8]) -> Result<XPrv, WalletError> {
    XPrv::new(seed).map_err(|e| WalletError::InvalidSeed(e.to_string()))
}

/// Hardened account node m/account'.
pub fn derive_account_node(master: &XPrv, account: u32) -> Result<XPrv, WalletError> {
    derive(master, account, true)
}

/// Non-hardened branch node m/account'/branch.
pub fn derive_branch_node(account_node: &XPrv, branch: u32) -> Result<XPrv, WalletError> {
    derive(account_node, branch, false)
}

/// Derive the address at `index` below a branch node.
pub fn derive_child_address(
    branch_node: &XPrv,
    index: u32,
    network: BtcNetwork,
    kind: AddressKind,
) -> Result<String, WalletError> {
    let child = derive(branch_node, index, false)?;
    let pubkey = compressed_public_key(&child)?;
    Ok(pubkey_to_address(&pubkey, network, kind)?)
}

/// 33-byte SEC1 compressed public key of a node.
pub fn compressed_public_key(node: &XPrv) -> Result<[u8; 33], WalletError> {
    let verifying_key: &k256::ecdsa::VerifyingKey = node.private_key().verifying_key();
    verifying_key
        .to_sec1_bytes()
        .as_ref()
        .try_into()
        .map_err(|_| WalletError::DerivationFailed("Invalid public key length".into()))
}

fn derive(parent: &XPrv, index: u32, hardened: bool) -> Result<XPrv, WalletError> {
    let child_number = ChildNumber::new(index, hardened)
        .map_err(|e| WalletError::DerivationFailed(format!("child index {index}: {e}")))?;
    parent
        .derive_child(child_number)
        .map_err(|e| WalletError::DerivationFailed(e.to_string()))
}
