//! Known spendable outputs and balance accounting.

use hdwallet_btc::utxo::{checked_total, Utxo};

use crate::error::WalletError;

/// The wallet's current set of unspent outputs, in caller-supplied order.
#[derive(Debug, Clone, Default)]
pub struct UtxoLedger {
    outputs: Vec<Utxo>,
}

impl UtxoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set. Nothing from the previous set is kept.
    pub fn set_outputs(&mut self, outputs: Vec<Utxo>) {
        self.outputs = outputs;
    }

    pub fn outputs(&self) -> &[Utxo] {
        &self.outputs
    }

    /// Outputs with at least `min_confirmations`, in ledger order.
    pub fn spendable(&self, min_confirmations: u32) -> impl Iterator<Item = &Utxo> {
        self.outputs
            .iter()
            .filter(move |u| u.confirmations >= min_confirmations)
    }

    /// Sum of all output values, confirmed or not.
    pub fn balance(&self) -> Result<u64, WalletError> {
        checked_total(&self.outputs).ok_or(WalletError::BalanceOverflow)
    }

    /// Sum of output values with at least one confirmation.
    pub fn confirmed_balance(&self) -> Result<u64, WalletError> {
        checked_total(self.outputs.iter().filter(|u| u.is_confirmed()))
            .ok_or(WalletError::BalanceOverflow)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn utxo(vout: u32, value: u64, confirmations: u32) -> Utxo {
        Utxo {
            tx_id: "a".repeat(64),
            vout,
            value,
            confirmations,
            address: "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH".into(),
        }
    }

    #[test]
    fn empty_ledger_has_zero_balance() {
        let ledger = UtxoLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.balance(), Ok(0));
        assert_eq!(ledger.confirmed_balance(), Ok(0));
    }

    #[test]
    fn balance_and_confirmed_balance() {
        let mut ledger = UtxoLedger::new();
        ledger.set_outputs(vec![utxo(0, 100_000, 1), utxo(1, 50_000, 0)]);
        assert_eq!(ledger.balance(), Ok(150_000));
        assert_eq!(ledger.confirmed_balance(), Ok(100_000));
    }

    #[test]
    fn set_outputs_replaces_wholesale() {
        let mut ledger = UtxoLedger::new();
        ledger.set_outputs(vec![utxo(0, 1, 1), utxo(1, 2, 1)]);
        ledger.set_outputs(vec![utxo(7, 10, 0)]);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.outputs()[0].vout, 7);
        assert_eq!(ledger.balance(), Ok(10));
    }

    #[test]
    fn overflow_is_reported() {
        let mut ledger = UtxoLedger::new();
        ledger.set_outputs(vec![utxo(0, u64::MAX, 1), utxo(1, 1, 1)]);
        assert_eq!(ledger.balance(), Err(WalletError::BalanceOverflow));
        assert_eq!(ledger.confirmed_balance(), Err(WalletError::BalanceOverflow));
    }

    #[test]
    fn spendable_filters_by_confirmations() {
        let mut ledger = UtxoLedger::new();
        ledger.set_outputs(vec![utxo(0, 1, 0), utxo(1, 2, 3), utxo(2, 3, 6)]);
        let vouts: Vec<u32> = ledger.spendable(3).map(|u| u.vout).collect();
        assert_eq!(vouts, [1, 2]);
        assert_eq!(ledger.spendable(0).count(), 3);
    }

    proptest! {
        #[test]
        fn balances_match_sums(
            entries in proptest::collection::vec((0u64..2_100_000_000_000_000, 0u32..10), 0..20)
        ) {
            let outputs: Vec<Utxo> = entries
                .iter()
                .enumerate()
                .map(|(i, &(value, conf))| utxo(i as u32, value, conf))
                .collect();
            let total: u64 = entries.iter().map(|e| e.0).sum();
            let confirmed: u64 = entries.iter().filter(|e| e.1 > 0).map(|e| e.0).sum();

            let mut ledger = UtxoLedger::new();
            ledger.set_outputs(outputs);
            prop_assert_eq!(ledger.balance(), Ok(total));
            prop_assert_eq!(ledger.confirmed_balance(), Ok(confirmed));
            prop_assert!(confirmed <= total);
        }
    }
}
