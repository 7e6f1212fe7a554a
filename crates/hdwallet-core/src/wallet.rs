//! Wallet composition root: one account and one ledger bound to a seed.

use hdwallet_btc::network::BtcNetwork;
use hdwallet_btc::transaction::{build_unsigned_transaction, UnsignedBtcTx};
use hdwallet_btc::utxo::Utxo;
use tracing::info;

use crate::account::Account;
use crate::builder::TransactionBuilder;
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::hd_derivation;
use crate::ledger::UtxoLedger;
use crate::mnemonic;
use crate::types::{CandidateTransaction, Payment, TxOptions};

/// A deterministic wallet over a single BIP-32 account.
///
/// The master key is used only during construction; the wallet keeps the
/// account's two address chains and the known unspent outputs. Methods that
/// issue addresses take `&mut self`.
#[derive(Debug)]
pub struct Wallet {
    config: WalletConfig,
    account: Account,
    ledger: UtxoLedger,
}

impl Wallet {
    /// Wallet on `network` with that network's defaults.
    pub fn new(seed: &[u8], network: BtcNetwork) -> Result<Self, WalletError> {
        Self::with_config(seed, WalletConfig::for_network(network))
    }

    pub fn with_config(seed: &[u8], config: WalletConfig) -> Result<Self, WalletError> {
        config.validate()?;
        let master = hd_derivation::master_key(seed)?;
        let account = Account::new(&master, config.account, config.network, config.address_kind)?;

        info!(
            network = %config.network,
            account = config.account,
            "wallet: initialized"
        );

        Ok(Self {
            config,
            account,
            ledger: UtxoLedger::new(),
        })
    }

    /// Wallet seeded from a BIP-39 phrase and optional passphrase.
    pub fn from_mnemonic(
        phrase: &str,
        passphrase: &str,
        config: WalletConfig,
    ) -> Result<Self, WalletError> {
        let seed = mnemonic::mnemonic_to_seed(phrase, passphrase)?;
        Self::with_config(&seed, config)
    }

    pub fn network(&self) -> BtcNetwork {
        self.config.network
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Latest receiving address.
    pub fn get_address(&self) -> &str {
        self.account.external().current()
    }

    /// Latest change address.
    pub fn get_change_address(&self) -> &str {
        self.account.internal().current()
    }

    /// Issue and return the next receiving address.
    pub fn generate_address(&mut self) -> Result<&str, WalletError> {
        self.account.generate_external()
    }

    /// Every issued address, receiving chain first.
    pub fn get_addresses(&self) -> Vec<String> {
        self.account.all_addresses()
    }

    pub fn set_unspent_outputs(&mut self, outputs: Vec<Utxo>) {
        self.ledger.set_outputs(outputs);
    }

    pub fn unspent_outputs(&self) -> &[Utxo] {
        self.ledger.outputs()
    }

    pub fn get_balance(&self) -> Result<u64, WalletError> {
        self.ledger.balance()
    }

    pub fn get_confirmed_balance(&self) -> Result<u64, WalletError> {
        self.ledger.confirmed_balance()
    }

    /// Build a candidate transaction paying `payments`.
    ///
    /// Issues a new change address when the transaction has change, even if
    /// the caller never broadcasts it.
    pub fn create_transaction(
        &mut self,
        payments: &[Payment],
        options: &TxOptions,
    ) -> Result<CandidateTransaction, WalletError> {
        let candidate = TransactionBuilder::new(&self.config).build(
            &self.ledger,
            payments,
            options,
            &mut self.account,
        )?;

        info!(
            inputs = candidate.inputs.len(),
            outputs = candidate.outputs.len(),
            fee = candidate.fee,
            change = candidate.change.is_some(),
            "wallet: built transaction"
        );
        Ok(candidate)
    }

    /// Build a candidate and encode it as an unsigned Bitcoin transaction.
    pub fn create_unsigned_transaction(
        &mut self,
        payments: &[Payment],
        options: &TxOptions,
    ) -> Result<(CandidateTransaction, UnsignedBtcTx), WalletError> {
        let candidate = self.create_transaction(payments, options)?;
        let unsigned =
            build_unsigned_transaction(&candidate.inputs, &candidate.outputs, self.config.network)?;
        Ok((candidate, unsigned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_wallet() -> Wallet {
        Wallet::new(&[0u8; 32], BtcNetwork::Mainnet).unwrap()
    }

    #[test]
    fn defaults_to_mainnet_config() {
        let wallet = Wallet::with_config(&[0u8; 32], WalletConfig::default()).unwrap();
        assert_eq!(wallet.network(), BtcNetwork::Mainnet);
        assert!(wallet.get_address().starts_with('1'));
    }

    #[test]
    fn uses_the_given_network() {
        let wallet = Wallet::new(&[0u8; 32], BtcNetwork::Testnet).unwrap();
        assert_eq!(wallet.network(), BtcNetwork::Testnet);
        assert_eq!(wallet.config().dust_threshold, 546);
        let first = wallet.get_address();
        assert!(first.starts_with('m') || first.starts_with('n'), "got {first}");
    }

    #[test]
    fn chain_nodes_sit_at_depth_two() {
        let wallet = zero_wallet();
        let external = wallet.account().external();
        let internal = wallet.account().internal();
        assert_eq!((external.depth(), external.child_index()), (2, 0));
        assert_eq!((internal.depth(), internal.child_index()), (2, 1));
    }

    #[test]
    fn generate_address_returns_latest_external() {
        let mut wallet = zero_wallet();
        let generated = wallet.generate_address().unwrap().to_string();
        assert_eq!(generated, wallet.get_address());
        assert_eq!(wallet.get_addresses().len(), 3);
    }

    #[test]
    fn change_address_is_internal_current() {
        let wallet = zero_wallet();
        assert_eq!(wallet.get_change_address(), wallet.account().internal().current());
        assert_ne!(wallet.get_change_address(), wallet.get_address());
    }

    #[test]
    fn rejects_invalid_config() {
        let config = WalletConfig {
            dust_threshold: 0,
            ..WalletConfig::default()
        };
        assert!(matches!(
            Wallet::with_config(&[0u8; 32], config),
            Err(WalletError::Config(_))
        ));
    }

    #[test]
    fn rejects_bad_seed_length() {
        assert!(matches!(
            Wallet::new(&[1u8; 5], BtcNetwork::Mainnet),
            Err(WalletError::InvalidSeed(_))
        ));
    }
}
