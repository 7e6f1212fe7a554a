use thiserror::Error;

/// Bitcoin encoding and transaction codec errors.
#[derive(Debug, Error)]
pub enum BtcError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid txid: {0}")]
    InvalidTxid(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),
}
