//! BIP-39 phrases as a source of wallet seeds.

use bip39::{Language, Mnemonic};
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::error::WalletError;

/// Generate a new English BIP-39 phrase of 12, 15, 18, 21 or 24 words.
pub fn generate_mnemonic(word_count: usize) -> Result<String, WalletError> {
    let entropy_len = match word_count {
        12 => 16,
        15 => 20,
        18 => 24,
        21 => 28,
        24 => 32,
        n => {
            return Err(WalletError::InvalidMnemonic(format!(
                "unsupported word count {n}"
            )))
        }
    };

    let mut entropy = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut entropy[..entropy_len]);
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy[..entropy_len])
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()));
    entropy.zeroize();
    Ok(mnemonic?.to_string())
}

pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_in_normalized(Language::English, phrase).is_ok()
}

/// 64-byte BIP-39 seed for `phrase` and `passphrase`, wiped on drop.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Zeroizing<Vec<u8>>, WalletError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_seed(passphrase).to_vec()))
}
