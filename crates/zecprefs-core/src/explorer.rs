//! Block explorer links.
//!
//! URLs are built by plain concatenation; the explorer takes the raw address or
//! txid as a path segment.

use crate::types::NetworkMode;

const EXPLORER_BASE: &str = "https://chain.so";

/// Explorer path segment naming the network.
pub fn explorer_network_segment(mode: NetworkMode) -> &'static str {
    match mode {
        NetworkMode::Mainnet => "ZEC",
        NetworkMode::Testnet => "ZECTEST",
    }
}

/// Explorer page for an address.
pub fn address_url(mode: NetworkMode, address: &str) -> String {
    format!(
        "{}/address/{}/{}",
        EXPLORER_BASE,
        explorer_network_segment(mode),
        address
    )
}

/// Explorer page for a transaction.
pub fn tx_url(mode: NetworkMode, txid: &str) -> String {
    format!(
        "{}/tx/{}/{}",
        EXPLORER_BASE,
        explorer_network_segment(mode),
        txid
    )
}

/// A txid is 32 bytes, hex encoded.
pub fn is_valid_txid(txid: &str) -> bool {
    txid.len() == 64 && hex::decode(txid).is_ok()
}
