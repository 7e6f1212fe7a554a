//! Coin selection and candidate transaction assembly.
//!
//! Selection walks the spendable outputs in policy order and stops at the
//! first prefix whose value covers the payments plus the fee for that many
//! inputs. The fee is then re-estimated with one extra output; if what is
//! left over after that fee reaches the dust threshold it becomes a change
//! output, otherwise the whole excess goes to the fee.

use hdwallet_btc::address::validate_address;
use hdwallet_btc::transaction::{estimate_fee, TxOutput};
use hdwallet_btc::utxo::{checked_total, order_candidates, Utxo};
use tracing::{debug, error, warn};

use crate::account::Account;
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::ledger::UtxoLedger;
use crate::types::{CandidateTransaction, ChangeOutput, Payment, TxOptions};

/// Outcome of coin selection, before any change address is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSelection {
    /// Selected outputs in selection order.
    pub inputs: Vec<Utxo>,
    /// Sum of `inputs`.
    pub input_total: u64,
    /// Sum of the requested payments.
    pub target: u64,
    /// Final fee, including any excess folded in.
    pub fee: u64,
    /// Change value; 0 when no change output is created.
    pub change: u64,
}

impl CoinSelection {
    pub fn has_change(&self) -> bool {
        self.change > 0
    }

    /// `input_total == target + fee + change`, without overflow.
    pub fn is_balanced(&self) -> bool {
        self.target
            .checked_add(self.fee)
            .and_then(|sum| sum.checked_add(self.change))
            == Some(self.input_total)
    }
}

/// Builds candidate transactions against a ledger and an account.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    config: WalletConfig,
}

impl TransactionBuilder {
    pub fn new(config: &WalletConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Run coin selection without touching the account.
    pub fn select(
        &self,
        ledger: &UtxoLedger,
        payments: &[Payment],
        options: &TxOptions,
    ) -> Result<CoinSelection, WalletError> {
        let dust = options.dust_threshold.unwrap_or(self.config.dust_threshold);
        self.check_payments(payments, dust)?;

        let target = payments
            .iter()
            .try_fold(0u64, |acc, p| acc.checked_add(p.value))
            .ok_or(WalletError::BalanceOverflow)?;
        let policy = options.selection.unwrap_or(self.config.selection);
        let candidates = order_candidates(ledger.spendable(options.min_confirmations), policy);
        let available =
            checked_total(candidates.iter().copied()).ok_or(WalletError::BalanceOverflow)?;

        let num_payments = payments.len();
        let mut input_total = 0u64;

        for (i, utxo) in candidates.iter().enumerate() {
            // Cannot overflow: bounded by `available`.
            input_total += utxo.value;
            let num_inputs = i + 1;

            let fee = self.fee(options, num_inputs, num_payments);
            if input_total < target.saturating_add(fee) {
                continue;
            }

            let fee_with_change = self.fee(options, num_inputs, num_payments + 1);
            let change = input_total
                .checked_sub(target)
                .and_then(|rest| rest.checked_sub(fee_with_change))
                .filter(|&change| change > 0 && change >= dust);

            // Below dust the excess is worth more as fee than as an output.
            let (fee, change) = match change {
                Some(change) => (fee_with_change, change),
                None => (input_total - target, 0),
            };
            let selection = CoinSelection {
                inputs: candidates[..num_inputs].iter().map(|u| (*u).clone()).collect(),
                input_total,
                target,
                fee,
                change,
            };

            debug!(
                inputs = num_inputs,
                input_total,
                target,
                fee = selection.fee,
                change = selection.change,
                "builder: coin selection complete"
            );
            return Ok(selection);
        }

        if available < target {
            warn!(available, target, "builder: insufficient funds");
            return Err(WalletError::InsufficientFunds {
                available,
                required: target,
            });
        }

        let fee = self.fee(options, candidates.len(), num_payments);
        let required = target.saturating_add(fee);
        warn!(available, required, "builder: insufficient funds for fee");
        Err(WalletError::InsufficientFundsForFee {
            available,
            required,
        })
    }

    /// Select inputs and assemble a candidate transaction.
    ///
    /// When change is created, the next internal-chain address is issued on
    /// `account`. Nothing on the account changes if building fails.
    pub fn build(
        &self,
        ledger: &UtxoLedger,
        payments: &[Payment],
        options: &TxOptions,
        account: &mut Account,
    ) -> Result<CandidateTransaction, WalletError> {
        let selection = self.select(ledger, payments, options)?;
        self.assemble(selection, payments, account)
    }

    fn assemble(
        &self,
        selection: CoinSelection,
        payments: &[Payment],
        account: &mut Account,
    ) -> Result<CandidateTransaction, WalletError> {
        if !selection.is_balanced() {
            error!(
                input_total = selection.input_total,
                target = selection.target,
                fee = selection.fee,
                change = selection.change,
                "builder: selection does not balance"
            );
            return Err(WalletError::Internal(
                "inputs do not equal outputs plus fee".into(),
            ));
        }

        let mut outputs: Vec<TxOutput> = payments.iter().cloned().map(TxOutput::from).collect();
        let change = if selection.has_change() {
            let index = u32::try_from(account.internal().len())
                .map_err(|_| WalletError::DerivationFailed("change index overflow".into()))?;
            let address = account.generate_change()?.to_string();
            outputs.push(TxOutput {
                address: address.clone(),
                value: selection.change,
            });
            Some(ChangeOutput {
                address,
                value: selection.change,
                index,
            })
        } else {
            None
        };

        Ok(CandidateTransaction {
            inputs: selection.inputs,
            outputs,
            fee: selection.fee,
            change,
        })
    }

    fn check_payments(&self, payments: &[Payment], dust: u64) -> Result<(), WalletError> {
        if payments.is_empty() {
            return Err(WalletError::NoPayments);
        }

        if let Some((index, payment)) = payments
            .iter()
            .enumerate()
            .find(|(_, p)| p.value < dust)
        {
            return Err(WalletError::DustOutput {
                index,
                value: payment.value,
                threshold: dust,
            });
        }

        let network = self.config.network;
        for payment in payments {
            if !validate_address(&payment.address, network)? {
                return Err(WalletError::InvalidAddress(format!(
                    "{} is not a {network} address",
                    payment.address
                )));
            }
        }
        Ok(())
    }

    fn fee(&self, options: &TxOptions, num_inputs: usize, num_outputs: usize) -> u64 {
        options.fee.unwrap_or_else(|| {
            let rate = options.fee_rate.unwrap_or(self.config.fee_rate);
            estimate_fee(self.config.address_kind, num_inputs, num_outputs, rate)
        })
    }
}
