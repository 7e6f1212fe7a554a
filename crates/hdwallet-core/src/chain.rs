//! Deterministic address cursor over a single derivation branch.

use std::fmt;

use bip32::XPrv;
use hdwallet_btc::address::AddressKind;
use hdwallet_btc::network::BtcNetwork;
use tracing::debug;

use crate::error::WalletError;
use crate::hd_derivation;

/// Addresses issued along one branch (m/account'/branch/*).
///
/// Index 0 is derived at construction, so a chain is never empty. Every
/// address is derived exactly once and cached; `next()` is the only way the
/// chain grows.
pub struct AddressChain {
    node: XPrv,
    branch: u32,
    network: BtcNetwork,
    kind: AddressKind,
    addresses: Vec<String>,
}

impl AddressChain {
    /// Derive the branch node under `account_node` and issue its first address.
    pub fn new(
        account_node: &XPrv,
        branch: u32,
        network: BtcNetwork,
        kind: AddressKind,
    ) -> Result<Self, WalletError> {
        let node = hd_derivation::derive_branch_node(account_node, branch)?;
        let first = hd_derivation::derive_child_address(&node, 0, network, kind)?;
        Ok(Self {
            node,
            branch,
            network,
            kind,
            addresses: vec![first],
        })
    }

    /// Address at the highest issued index.
    pub fn current(&self) -> &str {
        // Construction guarantees at least one entry.
        self.addresses.last().map(String::as_str).unwrap_or_default()
    }

    /// Derive and cache the address at the next index, then return it.
    pub fn next(&mut self) -> Result<&str, WalletError> {
        let index = self.next_index()?;
        let address =
            hd_derivation::derive_child_address(&self.node, index, self.network, self.kind)?;
        debug!(branch = self.branch, index, %address, "chain: issued address");
        self.addresses.push(address);
        Ok(self.current())
    }

    /// All issued addresses in index order.
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Number of addresses issued so far.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Branch index under the account node (0 external, 1 internal).
    pub fn branch(&self) -> u32 {
        self.branch
    }

    /// Depth of the branch node below the master key.
    pub fn depth(&self) -> u8 {
        self.node.attrs().depth
    }

    /// Index of the branch node at its parent level.
    pub fn child_index(&self) -> u32 {
        self.node.attrs().child_number.index()
    }

    /// Index of `address` on this chain, if it has been issued.
    pub fn index_of(&self, address: &str) -> Option<u32> {
        self.addresses
            .iter()
            .position(|a| a == address)
            .and_then(|i| u32::try_from(i).ok())
    }

    fn next_index(&self) -> Result<u32, WalletError> {
        u32::try_from(self.addresses.len())
            .map_err(|_| WalletError::DerivationFailed("address index space exhausted".into()))
    }
}

impl fmt::Debug for AddressChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressChain")
            .field("branch", &self.branch)
            .field("network", &self.network)
            .field("kind", &self.kind)
            .field("addresses", &self.addresses)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hd_derivation::{derive_account_node, master_key, EXTERNAL_BRANCH, INTERNAL_BRANCH};

    fn chain(branch: u32) -> AddressChain {
        let master = master_key(&[0u8; 32]).unwrap();
        let account = derive_account_node(&master, 0).unwrap();
        AddressChain::new(&account, branch, BtcNetwork::Mainnet, AddressKind::P2pkh).unwrap()
    }

    #[test]
    fn starts_with_one_address() {
        let c = chain(EXTERNAL_BRANCH);
        assert_eq!(c.len(), 1);
        assert_eq!(c.current(), c.addresses()[0]);
        assert_eq!(c.depth(), 2);
        assert_eq!(c.child_index(), 0);
    }

    #[test]
    fn internal_branch_index() {
        let c = chain(INTERNAL_BRANCH);
        assert_eq!(c.branch(), 1);
        assert_eq!(c.child_index(), 1);
        assert_eq!(c.depth(), 2);
    }

    #[test]
    fn next_appends_and_becomes_current() {
        let mut c = chain(EXTERNAL_BRANCH);
        let first = c.current().to_string();
        let second = c.next().unwrap().to_string();

        assert_ne!(first, second);
        assert_eq!(c.current(), second);
        assert_eq!(c.addresses(), [first, second]);
    }

    #[test]
    fn current_does_not_mutate() {
        let c = chain(EXTERNAL_BRANCH);
        let _ = c.current();
        let _ = c.current();
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn cached_addresses_match_fresh_derivation() {
        let mut c = chain(EXTERNAL_BRANCH);
        c.next().unwrap();
        c.next().unwrap();

        let mut fresh = chain(EXTERNAL_BRANCH);
        fresh.next().unwrap();
        fresh.next().unwrap();
        assert_eq!(c.addresses(), fresh.addresses());
    }

    #[test]
    fn index_of_finds_issued_addresses() {
        let mut c = chain(EXTERNAL_BRANCH);
        let second = c.next().unwrap().to_string();
        assert_eq!(c.index_of(&second), Some(1));
        assert_eq!(c.index_of("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"), None);
    }

    #[test]
    fn branches_do_not_collide() {
        let external = chain(EXTERNAL_BRANCH);
        let internal = chain(INTERNAL_BRANCH);
        assert_ne!(external.current(), internal.current());
    }
}
