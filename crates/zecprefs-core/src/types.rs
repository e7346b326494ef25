//! Core domain types for wallet settings.

use serde::{Deserialize, Serialize};

/// Amount in base units (zatoshi).
pub type Amount = i64;
pub type BlockHeight = u64;

/// Number of decimal places between a base unit and one coin.
pub const DECIMAL_PLACES: u32 = 8;

/// Fixed miner fee in base units.
pub const MINER_FEE: Amount = 10_000;

/// Lightwalletd server used when none has been saved.
pub const DEFAULT_SERVER: &str = "https://lightd-main.zecwallet.co:443/";

/// Status line prefix shown after a transaction has been broadcast.
pub const TXID_STATUS_MESSAGE: &str = "Tx submitted (right click to copy) txid:";

/// Network the wallet is operating on - exhaustive match required (no default case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkMode {
    Mainnet,
    Testnet,
}

impl NetworkMode {
    pub fn from_testnet(is_testnet: bool) -> Self {
        if is_testnet {
            NetworkMode::Testnet
        } else {
            NetworkMode::Mainnet
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, NetworkMode::Testnet)
    }

    pub fn token_name(&self) -> &'static str {
        match self {
            NetworkMode::Mainnet => "ZEC",
            NetworkMode::Testnet => "TAZ",
        }
    }

    /// Sapling activates on the block after this height.
    pub fn sapling_activation_height(&self) -> BlockHeight {
        match self {
            NetworkMode::Mainnet => 419_200,
            NetworkMode::Testnet => 280_000,
        }
    }

    /// Lowercase prefix that marks a Sapling address on this network.
    pub fn sapling_prefix(&self) -> &'static str {
        match self {
            NetworkMode::Mainnet => "zs",
            NetworkMode::Testnet => "ztestsapling",
        }
    }

    /// Prefix of an encoded Sapling extended spending key on this network.
    pub fn spending_key_prefix(&self) -> &'static str {
        match self {
            NetworkMode::Mainnet => "secret-extended-key-main",
            NetworkMode::Testnet => "secret-extended-key-test",
        }
    }

    pub fn donation_address(&self) -> &'static str {
        match self {
            NetworkMode::Mainnet => {
                "zs1gv64eu0v2wx7raxqxlmj354y9ycznwaau9kduljzczxztvs4qcl00kn2sjxtejvrxnkucw5xx9u"
            }
            NetworkMode::Testnet => {
                "ztestsapling1wn6889vznyu42wzmkakl2effhllhpe4azhu696edg2x6me4kfsnmqwpglaxzs7tmqsq7kudemp5"
            }
        }
    }

    /// Returns both network modes.
    pub fn all() -> &'static [NetworkMode] {
        &[NetworkMode::Mainnet, NetworkMode::Testnet]
    }
}

impl std::fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkMode::Mainnet => write!(f, "Mainnet"),
            NetworkMode::Testnet => write!(f, "Testnet"),
        }
    }
}

/// Connection configuration loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Lightwalletd server URL.
    pub server: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
        }
    }
}
