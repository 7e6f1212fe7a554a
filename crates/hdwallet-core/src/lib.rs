//! Deterministic-key wallet account layer.
//!
//! A [`Wallet`] binds a seed to one BIP-32 account with a receiving chain
//! (m/account'/0/i) and a change chain (m/account'/1/i), tracks the unspent
//! outputs it is told about, and builds unsigned candidate transactions with
//! fee, change and dust handling.
//!
//! # Modules
//!
//! - [`hd_derivation`]: BIP-32 master/account/branch derivation
//! - [`chain`]: `AddressChain`, the per-branch address cursor
//! - [`account`]: external + internal chains
//! - [`ledger`]: `UtxoLedger` and balances
//! - [`builder`]: coin selection and candidate assembly
//! - [`config`]: `WalletConfig`
//! - [`wallet`]: the composition root

pub mod account;
pub mod builder;
pub mod chain;
pub mod config;
pub mod error;
pub mod hd_derivation;
pub mod ledger;
pub mod mnemonic;
pub mod types;
pub mod wallet;

pub use account::Account;
pub use builder::{CoinSelection, TransactionBuilder};
pub use chain::AddressChain;
pub use config::WalletConfig;
pub use error::WalletError;
pub use ledger::UtxoLedger;
pub use types::{CandidateTransaction, ChangeOutput, Payment, TxOptions};
pub use wallet::Wallet;

pub use hdwallet_btc::address::AddressKind;
pub use hdwallet_btc::network::BtcNetwork;
pub use hdwallet_btc::transaction::{FeeRate, TxOutput, UnsignedBtcTx};
pub use hdwallet_btc::utxo::{SelectionPolicy, Utxo};
