use serde::{Deserialize, Serialize};

/// A single unspent transaction output (UTXO) known to the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    /// Transaction ID as a hex string (big-endian / display order).
    #[serde(alias = "txid")]
    pub tx_id: String,
    /// Output index within the transaction.
    pub vout: u32,
    /// Value in satoshis.
    pub value: u64,
    /// Number of confirmations; 0 means the output is still in the mempool.
    #[serde(default)]
    pub confirmations: u32,
    /// Address the output pays to.
    pub address: String,
}

impl Utxo {
    pub fn is_confirmed(&self) -> bool {
        self.confirmations > 0
    }

    /// `txid:vout` identifier of the output.
    pub fn outpoint(&self) -> String {
        format!("{}:{}", self.tx_id, self.vout)
    }
}

/// Order in which coin selection considers candidate outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// First listed, first selected.
    #[default]
    LedgerOrder,
    /// Descending by value; ties keep ledger order.
    LargestFirst,
}

/// Arrange spendable outputs in the order the given policy selects them.
pub fn order_candidates<'a, I>(utxos: I, policy: SelectionPolicy) -> Vec<&'a Utxo>
where
    I: IntoIterator<Item = &'a Utxo>,
{
    let mut ordered: Vec<&Utxo> = utxos.into_iter().collect();
    if policy == SelectionPolicy::LargestFirst {
        // Stable sort, so equal values stay in ledger order.
        ordered.sort_by(|a, b| b.value.cmp(&a.value));
    }
    ordered
}

/// Sum output values, returning `None` on `u64` overflow.
pub fn checked_total<'a, I>(utxos: I) -> Option<u64>
where
    I: IntoIterator<Item = &'a Utxo>,
{
    utxos
        .into_iter()
        .try_fold(0u64, |acc, utxo| acc.checked_add(utxo.value))
}
