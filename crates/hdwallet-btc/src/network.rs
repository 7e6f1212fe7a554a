use bitcoin::Network;
use serde::{Deserialize, Serialize};

use crate::transaction::FeeRate;

/// Smallest output value (in satoshis) relay policy treats as economical.
pub const DEFAULT_DUST_THRESHOLD_SAT: u64 = 546;

/// Default fee rate: 10 sat/vbyte.
pub const DEFAULT_FEE_RATE_SAT_KVB: u64 = 10_000;

/// Supported Bitcoin networks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BtcNetwork {
    #[default]
    Mainnet,
    Testnet,
    Signet,
}

impl BtcNetwork {
    /// Convert to the `bitcoin` crate's `Network` type.
    pub fn to_bitcoin_network(self) -> Network {
        match self {
            BtcNetwork::Mainnet => Network::Bitcoin,
            BtcNetwork::Testnet => Network::Testnet,
            BtcNetwork::Signet => Network::Signet,
        }
    }

    /// Dust threshold used when neither the wallet config nor the
    /// transaction options override it.
    pub fn dust_threshold(self) -> u64 {
        DEFAULT_DUST_THRESHOLD_SAT
    }

    /// Fee rate used when neither the wallet config nor the transaction
    /// options override it.
    pub fn default_fee_rate(self) -> FeeRate {
        match self {
            BtcNetwork::Mainnet => FeeRate::from_sat_per_kvb(DEFAULT_FEE_RATE_SAT_KVB),
            // Test networks relay at 1 sat/vbyte.
            BtcNetwork::Testnet | BtcNetwork::Signet => FeeRate::from_sat_per_kvb(1_000),
        }
    }
}

impl std::fmt::Display for BtcNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BtcNetwork::Mainnet => write!(f, "mainnet"),
            BtcNetwork::Testnet => write!(f, "testnet"),
            BtcNetwork::Signet => write!(f, "signet"),
        }
    }
}
