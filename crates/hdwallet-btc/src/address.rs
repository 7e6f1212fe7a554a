use bitcoin::address::{Address, NetworkUnchecked};
use bitcoin::script::ScriptBuf;
use bitcoin::CompressedPublicKey;
use serde::{Deserialize, Serialize};

use crate::error::BtcError;
use crate::network::BtcNetwork;

/// Output script type the wallet issues addresses for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    /// Legacy base58 pay-to-pubkey-hash (`1...` / `m...`, `n...`).
    #[default]
    P2pkh,
    /// Native SegWit bech32 (`bc1q...` / `tb1q...`).
    P2wpkh,
}

/// Derive an address of the given kind from a compressed public key.
pub fn pubkey_to_address(
    pubkey_bytes: &[u8; 33],
    network: BtcNetwork,
    kind: AddressKind,
) -> Result<String, BtcError> {
    match kind {
        AddressKind::P2pkh => pubkey_to_p2pkh_address(pubkey_bytes, network),
        AddressKind::P2wpkh => pubkey_to_p2wpkh_address(pubkey_bytes, network),
    }
}

/// Derive a P2PKH (legacy base58) address from a compressed public key.
pub fn pubkey_to_p2pkh_address(
    pubkey_bytes: &[u8; 33],
    network: BtcNetwork,
) -> Result<String, BtcError> {
    let compressed_pk = parse_pubkey(pubkey_bytes)?;
    let address = Address::p2pkh(compressed_pk.pubkey_hash(), network.to_bitcoin_network());
    Ok(address.to_string())
}

/// Derive a P2WPKH (native SegWit bech32) address from a compressed public key.
///
/// Takes a 33-byte compressed secp256k1 public key and returns a bech32 address
/// string: `bc1...` for mainnet, `tb1...` for testnet/signet.
pub fn pubkey_to_p2wpkh_address(
    pubkey_bytes: &[u8; 33],
    network: BtcNetwork,
) -> Result<String, BtcError> {
    let compressed_pk = parse_pubkey(pubkey_bytes)?;
    let address = Address::p2wpkh(&compressed_pk, network.to_bitcoin_network());
    Ok(address.to_string())
}

fn parse_pubkey(pubkey_bytes: &[u8; 33]) -> Result<CompressedPublicKey, BtcError> {
    CompressedPublicKey::from_slice(pubkey_bytes).map_err(|e| {
        BtcError::InvalidPublicKey(format!("failed to parse compressed public key: {e}"))
    })
}

/// Validate a Bitcoin address string for the given network.
///
/// Returns `Ok(false)` if the address parses but belongs to another network.
pub fn validate_address(address: &str, network: BtcNetwork) -> Result<bool, BtcError> {
    let parsed = address
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| BtcError::InvalidAddress(format!("failed to parse address: {e}")))?;

    Ok(parsed.is_valid_for_network(network.to_bitcoin_network()))
}

/// Resolve an address string to the locking script that pays it.
pub fn script_pubkey_for(address: &str, network: BtcNetwork) -> Result<ScriptBuf, BtcError> {
    let parsed: Address = address
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| BtcError::InvalidAddress(format!("failed to parse address {address}: {e}")))?
        .require_network(network.to_bitcoin_network())
        .map_err(|e| BtcError::InvalidAddress(format!("{address} is for another network: {e}")))?;

    Ok(parsed.script_pubkey())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compressed public key of the secret scalar 1 (the generator point).
    const GENERATOR_PUBKEY: &str =
        "0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798";

    fn generator_pubkey() -> [u8; 33] {
        hex::decode(GENERATOR_PUBKEY).unwrap().try_into().unwrap()
    }

    #[test]
    fn p2pkh_mainnet_test_vector() {
        let address = pubkey_to_p2pkh_address(&generator_pubkey(), BtcNetwork::Mainnet).unwrap();
        assert_eq!(address, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
    }

    #[test]
    fn p2wpkh_mainnet_test_vector() {
        let address = pubkey_to_p2wpkh_address(&generator_pubkey(), BtcNetwork::Mainnet).unwrap();
        assert_eq!(address, "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
    }

    #[test]
    fn p2pkh_testnet_prefix() {
        let address = pubkey_to_p2pkh_address(&generator_pubkey(), BtcNetwork::Testnet).unwrap();
        assert!(
            address.starts_with('m') || address.starts_with('n'),
            "unexpected testnet prefix: {address}"
        );
    }

    #[test]
    fn kind_dispatch() {
        let pk = generator_pubkey();
        let legacy = pubkey_to_address(&pk, BtcNetwork::Mainnet, AddressKind::P2pkh).unwrap();
        let segwit = pubkey_to_address(&pk, BtcNetwork::Signet, AddressKind::P2wpkh).unwrap();
        assert!(legacy.starts_with('1'));
        assert!(segwit.starts_with("tb1q"));
    }

    #[test]
    fn invalid_pubkey_returns_error() {
        let result = pubkey_to_p2pkh_address(&[0u8; 33], BtcNetwork::Mainnet);
        assert!(matches!(result, Err(BtcError::InvalidPublicKey(_))));
    }

    #[test]
    fn validate_mainnet_address_on_testnet_returns_false() {
        let valid =
            validate_address("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", BtcNetwork::Testnet).unwrap();
        assert!(!valid);
        let valid =
            validate_address("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", BtcNetwork::Mainnet).unwrap();
        assert!(valid);
    }

    #[test]
    fn validate_garbage_address_returns_error() {
        assert!(validate_address("notanaddress!!!", BtcNetwork::Mainnet).is_err());
    }

    #[test]
    fn script_pubkey_for_p2pkh() {
        let script =
            script_pubkey_for("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", BtcNetwork::Mainnet).unwrap();
        assert!(script.is_p2pkh());
    }

    #[test]
    fn script_pubkey_for_rejects_wrong_network() {
        let result = script_pubkey_for(
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4",
            BtcNetwork::Testnet,
        );
        assert!(matches!(result, Err(BtcError::InvalidAddress(_))));
    }
}
