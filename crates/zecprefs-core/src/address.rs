//! Address and key shape validation.
//!
//! Classification only looks at prefixes, lengths and character classes. It does
//! not decode Bech32 or Base58Check, so a well-shaped address with a bad checksum
//! still classifies as valid.

use serde::{Deserialize, Serialize};

use crate::types::NetworkMode;

/// Prefix and number of alphanumeric characters following it.
struct Shape {
    prefix: &'static str,
    tail_len: usize,
}

const SPROUT: Shape = Shape {
    prefix: "z",
    tail_len: 94,
};

const SAPLING: Shape = Shape {
    prefix: "z",
    tail_len: 77,
};

const SAPLING_TESTNET: Shape = Shape {
    prefix: "ztestsapling",
    tail_len: 76,
};

const TRANSPARENT: Shape = Shape {
    prefix: "t",
    tail_len: 34,
};

const SPENDING_KEY_TAIL_LEN: usize = 278;

/// Longest label accepted for an address book entry.
pub const MAX_LABEL_LEN: usize = 40;

/// Kind of address, as seen from a given network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    /// Transparent `t` address.
    Transparent,
    /// Shielded address carrying the active network's Sapling prefix.
    ShieldedSapling,
    /// Any other well-shaped shielded `z` address.
    ShieldedSprout,
    /// Matches none of the known shapes.
    Invalid,
}

impl AddressKind {
    pub fn is_valid(&self) -> bool {
        !matches!(self, AddressKind::Invalid)
    }

    pub fn is_shielded(&self) -> bool {
        matches!(
            self,
            AddressKind::ShieldedSapling | AddressKind::ShieldedSprout
        )
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, AddressKind::Transparent)
    }

    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            AddressKind::Transparent => "Transparent",
            AddressKind::ShieldedSapling => "Shielded (Sapling)",
            AddressKind::ShieldedSprout => "Shielded (Sprout)",
            AddressKind::Invalid => "Invalid",
        }
    }
}

fn has_prefix(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

fn matches_shape(text: &str, shape: &Shape) -> bool {
    text.len() == shape.prefix.len() + shape.tail_len
        && has_prefix(text, shape.prefix)
        && text.as_bytes()[shape.prefix.len()..]
            .iter()
            .all(u8::is_ascii_alphanumeric)
}

/// Classify an address for the given network.
pub fn classify(mode: NetworkMode, address: &str) -> AddressKind {
    let well_shaped = matches_shape(address, &SPROUT)
        || matches_shape(address, &SAPLING)
        || matches_shape(address, &TRANSPARENT)
        || (mode.is_testnet() && matches_shape(address, &SAPLING_TESTNET));

    if !well_shaped {
        AddressKind::Invalid
    } else if has_prefix(address, TRANSPARENT.prefix) {
        AddressKind::Transparent
    } else if has_prefix(address, mode.sapling_prefix()) {
        AddressKind::ShieldedSapling
    } else {
        AddressKind::ShieldedSprout
    }
}

pub fn is_valid_address(mode: NetworkMode, address: &str) -> bool {
    classify(mode, address).is_valid()
}

pub fn is_shielded_address(mode: NetworkMode, address: &str) -> bool {
    classify(mode, address).is_shielded()
}

pub fn is_transparent_address(mode: NetworkMode, address: &str) -> bool {
    classify(mode, address).is_transparent()
}

pub fn is_sapling_address(mode: NetworkMode, address: &str) -> bool {
    classify(mode, address) == AddressKind::ShieldedSapling
}

pub fn is_sprout_address(mode: NetworkMode, address: &str) -> bool {
    classify(mode, address) == AddressKind::ShieldedSprout
}

/// Check the shape of an encoded Sapling extended spending key.
pub fn is_valid_sapling_spending_key(mode: NetworkMode, key: &str) -> bool {
    matches_shape(
        key,
        &Shape {
            prefix: mode.spending_key_prefix(),
            tail_len: SPENDING_KEY_TAIL_LEN,
        },
    )
}

/// Address book labels: up to 40 ASCII letters, digits, `-` or `_`.
pub fn is_valid_label(label: &str) -> bool {
    label.len() <= MAX_LABEL_LEN
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
