use bitcoin::absolute::LockTime;
use bitcoin::script::ScriptBuf;
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use serde::{Deserialize, Serialize};

use crate::address::{script_pubkey_for, AddressKind};
use crate::error::BtcError;
use crate::network::BtcNetwork;
use crate::utxo::Utxo;

/// Estimated size of a P2PKH input (in bytes): outpoint 36 + script length 1
/// + signature/pubkey script ~107 + sequence 4.
const P2PKH_INPUT_BYTES: u64 = 148;

/// Estimated size of a P2PKH output (in bytes): value 8 + script length 1 + script 25.
const P2PKH_OUTPUT_BYTES: u64 = 34;

/// Fixed legacy transaction overhead (in bytes): version + locktime + counts.
const LEGACY_OVERHEAD_BYTES: u64 = 10;

/// Estimated virtual size of a P2WPKH input (in vbytes).
/// Breakdown: 41 bytes non-witness + ~27 witness bytes / 4 = ~68 vbytes per input.
const P2WPKH_INPUT_VBYTES: u64 = 68;

/// Estimated virtual size of a P2WPKH output (in vbytes).
const P2WPKH_OUTPUT_VBYTES: u64 = 31;

/// Fixed transaction overhead (in vbytes): version + locktime + segwit marker/flag + counts.
const SEGWIT_OVERHEAD_VBYTES: u64 = 11;

/// Fee rate in satoshis per 1000 virtual bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRate(u64);

impl FeeRate {
    pub const fn from_sat_per_kvb(sat_per_kvb: u64) -> Self {
        Self(sat_per_kvb)
    }

    pub const fn from_sat_per_vb(sat_per_vb: u64) -> Self {
        Self(sat_per_vb.saturating_mul(1_000))
    }

    pub const fn to_sat_per_kvb(self) -> u64 {
        self.0
    }

    /// Fee for a transaction of `vsize` vbytes, rounded up to the next
    /// whole satoshi. Saturates at `u64::MAX`.
    pub fn fee_for_vsize(self, vsize: u64) -> u64 {
        let fee = (u128::from(vsize) * u128::from(self.0)).div_ceil(1_000);
        u64::try_from(fee).unwrap_or(u64::MAX)
    }
}

/// An output of a transaction being built: who gets paid and how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub address: String,
    /// Value in satoshis.
    pub value: u64,
}

/// An unsigned Bitcoin transaction ready for signing.
#[derive(Debug, Clone)]
pub struct UnsignedBtcTx {
    /// The bitcoin transaction with empty script_sigs and witnesses.
    pub tx: Transaction,
    /// The UTXOs being spent (in the same order as the transaction inputs).
    /// Needed for computing sighashes during signing.
    pub prevouts: Vec<TxOut>,
}

/// Estimate the virtual size of a transaction spending `num_inputs` outputs
/// of the given kind into `num_outputs` outputs of the same kind.
///
/// This is a stand-in for the serialized size: every input is assumed to
/// carry a single compressed-key signature, and every output is priced as
/// if it paid the wallet's own script type.
pub fn estimate_vsize(kind: AddressKind, num_inputs: usize, num_outputs: usize) -> u64 {
    let (overhead, input, output) = match kind {
        AddressKind::P2pkh => (LEGACY_OVERHEAD_BYTES, P2PKH_INPUT_BYTES, P2PKH_OUTPUT_BYTES),
        AddressKind::P2wpkh => (
            SEGWIT_OVERHEAD_VBYTES,
            P2WPKH_INPUT_VBYTES,
            P2WPKH_OUTPUT_VBYTES,
        ),
    };
    overhead
        .saturating_add((num_inputs as u64).saturating_mul(input))
        .saturating_add((num_outputs as u64).saturating_mul(output))
}

/// Estimate the fee for a transaction with the given shape.
pub fn estimate_fee(
    kind: AddressKind,
    num_inputs: usize,
    num_outputs: usize,
    fee_rate: FeeRate,
) -> u64 {
    fee_rate.fee_for_vsize(estimate_vsize(kind, num_inputs, num_outputs))
}

/// Encode selected inputs and ordered outputs as an unsigned transaction.
///
/// Inputs keep their order, outputs keep their order, and every input
/// signals RBF. The fee is implicit (inputs minus outputs).
pub fn build_unsigned_transaction(
    inputs: &[Utxo],
    outputs: &[TxOutput],
    network: BtcNetwork,
) -> Result<UnsignedBtcTx, BtcError> {
    if inputs.is_empty() || outputs.is_empty() {
        return Err(BtcError::TransactionBuildError(
            "transaction needs at least one input and one output".into(),
        ));
    }

    let mut tx_inputs = Vec::with_capacity(inputs.len());
    let mut prevouts = Vec::with_capacity(inputs.len());

    for utxo in inputs {
        let txid: Txid = utxo
            .tx_id
            .parse()
            .map_err(|e| BtcError::InvalidTxid(format!("{}: {e}", utxo.outpoint())))?;

        tx_inputs.push(TxIn {
            previous_output: OutPoint::new(txid, utxo.vout),
            script_sig: ScriptBuf::new(),
            sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
            witness: Witness::default(),
        });

        prevouts.push(TxOut {
            value: Amount::from_sat(utxo.value),
            script_pubkey: script_pubkey_for(&utxo.address, network)?,
        });
    }

    let tx_outputs = outputs
        .iter()
        .map(|out| {
            Ok(TxOut {
                value: Amount::from_sat(out.value),
                script_pubkey: script_pubkey_for(&out.address, network)?,
            })
        })
        .collect::<Result<Vec<_>, BtcError>>()?;

    let tx = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: tx_inputs,
        output: tx_outputs,
    };

    Ok(UnsignedBtcTx { tx, prevouts })
}
