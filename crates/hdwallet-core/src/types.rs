use hdwallet_btc::transaction::{FeeRate, TxOutput};
use hdwallet_btc::utxo::{SelectionPolicy, Utxo};
use serde::{Deserialize, Serialize};

/// A requested payment: pay `value` satoshis to `address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub address: String,
    pub value: u64,
}

impl Payment {
    pub fn new(address: impl Into<String>, value: u64) -> Self {
        Self {
            address: address.into(),
            value,
        }
    }
}

impl From<Payment> for TxOutput {
    fn from(p: Payment) -> Self {
        TxOutput {
            address: p.address,
            value: p.value,
        }
    }
}

/// Per-transaction overrides. Unset fields fall back to the wallet config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TxOptions {
    pub fee_rate: Option<FeeRate>,
    /// Absolute fee in satoshis; replaces the size-based estimate.
    pub fee: Option<u64>,
    pub dust_threshold: Option<u64>,
    /// Outputs with fewer confirmations are not spent.
    pub min_confirmations: u32,
    pub selection: Option<SelectionPolicy>,
}

/// Change returned to the wallet's internal chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeOutput {
    pub address: String,
    pub value: u64,
    /// Index of the change address on the internal chain.
    pub index: u32,
}

/// An unsigned transaction proposal produced by coin selection.
///
/// `outputs` holds the requested payments in request order, followed by the
/// change output (if any). Inputs are in selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTransaction {
    pub inputs: Vec<Utxo>,
    pub outputs: Vec<TxOutput>,
    pub fee: u64,
    pub change: Option<ChangeOutput>,
}

impl CandidateTransaction {
    /// Sum of input values. `None` on overflow.
    pub fn input_total(&self) -> Option<u64> {
        self.inputs
            .iter()
            .try_fold(0u64, |acc, u| acc.checked_add(u.value))
    }

    /// Sum of output values. `None` on overflow.
    pub fn output_total(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, o| acc.checked_add(o.value))
    }

    /// Whether inputs exactly fund outputs plus fee.
    pub fn is_balanced(&self) -> bool {
        match (self.input_total(), self.output_total()) {
            (Some(inputs), Some(outputs)) => outputs.checked_add(self.fee) == Some(inputs),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utxo(value: u64) -> Utxo {
        Utxo {
            tx_id: "a".repeat(64),
            vout: 0,
            value,
            confirmations: 1,
            address: "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH".into(),
        }
    }

    #[test]
    fn balanced_candidate() {
        let tx = CandidateTransaction {
            inputs: vec![utxo(10_000), utxo(5_000)],
            outputs: vec![Payment::new("x", 12_000).into()],
            fee: 3_000,
            change: None,
        };
        assert_eq!(tx.input_total(), Some(15_000));
        assert_eq!(tx.output_total(), Some(12_000));
        assert!(tx.is_balanced());
    }

    #[test]
    fn unbalanced_candidate() {
        let tx = CandidateTransaction {
            inputs: vec![utxo(10_000)],
            outputs: vec![Payment::new("x", 9_000).into()],
            fee: 999,
            change: None,
        };
        assert!(!tx.is_balanced());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: TxOptions = serde_json::from_str(r#"{"feeRate": 20000}"#).unwrap();
        assert_eq!(opts.fee_rate, Some(FeeRate::from_sat_per_kvb(20_000)));
        assert_eq!(opts.fee, None);
        assert_eq!(opts.min_confirmations, 0);
    }
}
