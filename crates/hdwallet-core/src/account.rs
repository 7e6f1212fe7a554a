use bip32::XPrv;
use hdwallet_btc::address::AddressKind;
use hdwallet_btc::network::BtcNetwork;

use crate::chain::AddressChain;
use crate::error::WalletError;
use crate::hd_derivation::{self, EXTERNAL_BRANCH, INTERNAL_BRANCH};

/// A BIP-32 account: receiving and change chains under m/account'.
#[derive(Debug)]
pub struct Account {
    index: u32,
    external: AddressChain,
    internal: AddressChain,
}

impl Account {
    pub fn new(
        master: &XPrv,
        index: u32,
        network: BtcNetwork,
        kind: AddressKind,
    ) -> Result<Self, WalletError> {
        let node = hd_derivation::derive_account_node(master, index)?;
        Ok(Self {
            index,
            external: AddressChain::new(&node, EXTERNAL_BRANCH, network, kind)?,
            internal: AddressChain::new(&node, INTERNAL_BRANCH, network, kind)?,
        })
    }

    /// Account index (hardened level below the master key).
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn external(&self) -> &AddressChain {
        &self.external
    }

    pub fn internal(&self) -> &AddressChain {
        &self.internal
    }

    /// Issue the next receiving address.
    pub fn generate_external(&mut self) -> Result<&str, WalletError> {
        self.external.next()
    }

    /// Issue the next change address. Only transaction building calls this.
    pub(crate) fn generate_change(&mut self) -> Result<&str, WalletError> {
        self.internal.next()
    }

    /// External addresses followed by internal addresses, each in index order.
    pub fn all_addresses(&self) -> Vec<String> {
        self.external
            .addresses()
            .iter()
            .chain(self.internal.addresses())
            .cloned()
            .collect()
    }

    /// Whether `address` was issued on either chain.
    pub fn contains(&self, address: &str) -> bool {
        self.external.index_of(address).is_some() || self.internal.index_of(address).is_some()
    }

    /// Derivation path of an issued address.
    pub fn derivation_path(&self, address: &str) -> Option<String> {
        [&self.external, &self.internal].into_iter().find_map(|chain| {
            chain
                .index_of(address)
                .map(|i| hd_derivation::address_path(self.index, chain.branch(), i))
        })
    }
}
