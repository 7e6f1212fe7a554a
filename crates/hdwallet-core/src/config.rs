//! Wallet configuration.

use hdwallet_btc::address::AddressKind;
use hdwallet_btc::network::BtcNetwork;
use hdwallet_btc::transaction::FeeRate;
use hdwallet_btc::utxo::SelectionPolicy;
use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Settings fixed when a wallet is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalletConfig {
    /// Network whose address encoding rules apply.
    pub network: BtcNetwork,
    /// Script type of issued addresses.
    pub address_kind: AddressKind,
    /// Hardened account index below the master key.
    pub account: u32,
    /// Fee rate when a transaction does not specify one.
    pub fee_rate: FeeRate,
    /// Smallest payment or change output the wallet will create.
    pub dust_threshold: u64,
    /// Order in which coin selection considers outputs.
    pub selection: SelectionPolicy,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self::for_network(BtcNetwork::default())
    }
}

impl WalletConfig {
    /// Network defaults for fee rate and dust threshold.
    pub fn for_network(network: BtcNetwork) -> Self {
        Self {
            network,
            address_kind: AddressKind::default(),
            account: 0,
            fee_rate: network.default_fee_rate(),
            dust_threshold: network.dust_threshold(),
            selection: SelectionPolicy::default(),
        }
    }

    pub fn mainnet() -> Self {
        Self::for_network(BtcNetwork::Mainnet)
    }

    pub fn testnet() -> Self {
        Self::for_network(BtcNetwork::Testnet)
    }

    /// Parse and validate a JSON config. Missing fields take mainnet defaults.
    pub fn from_json(json: &str) -> Result<Self, WalletError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| WalletError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        if self.dust_threshold == 0 {
            return Err(WalletError::Config("dust threshold must be positive".into()));
        }
        if self.account >= 0x8000_0000 {
            return Err(WalletError::Config(format!(
                "account index {} is outside the hardened range",
                self.account
            )));
        }
        Ok(())
    }
}
