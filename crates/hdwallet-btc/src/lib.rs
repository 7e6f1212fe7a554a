//! Bitcoin collaborators for the HD wallet account layer.
//!
//! Provides the network parameter set, P2PKH/P2WPKH address encoding, the
//! UTXO record and candidate ordering, the transaction size/fee model, and
//! the codec that turns selected inputs and outputs into an unsigned
//! transaction.

pub mod address;
pub mod error;
pub mod network;
pub mod transaction;
pub mod utxo;
