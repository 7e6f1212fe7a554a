use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// A requested payment is below the dust threshold. `index` is the
    /// position of the payment in the request.
    #[error("Payment {index} of {value} sat is below the dust threshold of {threshold} sat")]
    DustOutput {
        index: usize,
        value: u64,
        threshold: u64,
    },

    /// Spendable outputs do not even cover the payment total.
    #[error("Insufficient funds: have {available} sat, need {required} sat")]
    InsufficientFunds { available: u64, required: u64 },

    /// Spendable outputs cover the payments but not the fee on top.
    #[error("Insufficient funds for fee: have {available} sat, need {required} sat including fee")]
    InsufficientFundsForFee { available: u64, required: u64 },

    #[error("No payments requested")]
    NoPayments,

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Balance overflows u64")]
    BalanceOverflow,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Transaction build failed: {0}")]
    TransactionFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<hdwallet_btc::error::BtcError> for WalletError {
    fn from(e: hdwallet_btc::error::BtcError) -> Self {
        use hdwallet_btc::error::BtcError;
        match e {
            BtcError::InvalidAddress(msg) => WalletError::InvalidAddress(msg),
            BtcError::InvalidPublicKey(msg) => WalletError::DerivationFailed(msg),
            other => WalletError::TransactionFailed(format!("BTC: {other}")),
        }
    }
}
