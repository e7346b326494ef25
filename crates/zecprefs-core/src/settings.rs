//! Wallet settings facade.
//!
//! [`Settings`] is created once at startup and handed to whatever needs it. It
//! combines persisted preferences from a [`PreferenceStore`] with runtime state
//! reported by the sync engine (block height, price, syncing flag).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::address::{self, AddressKind};
use crate::amount::{format_usd, to_coins, to_display_string};
use crate::explorer;
use crate::store::{PreferenceStore, PreferenceValue, StoreError};
use crate::types::{
    Amount, BlockHeight, Config, DECIMAL_PLACES, DEFAULT_SERVER, MINER_FEE, NetworkMode,
};
use crate::uri::{PaymentUri, PaymentUriError};

/// Keys under which preferences are persisted.
pub mod keys {
    pub const SERVER: &str = "connection/server";
    pub const CHECK_FOR_UPDATES: &str = "options/allowcheckupdates";
    pub const FETCH_PRICES: &str = "options/allowfetchprices";
    pub const THEME_NAME: &str = "options/theme_name";
    /// Suffix appended to a window name to store its geometry.
    pub const GEOMETRY_SUFFIX: &str = "geometry";
}

/// Wallet settings bound to one preference store.
pub struct Settings<S: PreferenceStore> {
    store: S,
    config: Config,
    network: NetworkMode,
    syncing: bool,
    block_height: BlockHeight,
    zec_price: f64,
    zcashd_version: Option<u32>,
}

impl<S: PreferenceStore> Settings<S> {
    /// Create the settings object, loading the persisted connection config.
    pub fn new(store: S, network: NetworkMode) -> Result<Self, StoreError> {
        let config = load_config(&store)?;
        tracing::debug!(server = %config.server, %network, "Loaded settings");
        Ok(Self {
            store,
            config,
            network,
            syncing: false,
            block_height: 0,
            zec_price: 0.0,
            zcashd_version: None,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ==================== Connection Config ====================

    /// Connection config as loaded at startup or at the last save.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Persist a new server URL and reload the config from the store.
    pub fn save_config(&mut self, server: &str) -> Result<(), StoreError> {
        self.store.set_string(keys::SERVER, server)?;
        self.config = load_config(&self.store)?;
        tracing::debug!(server = %self.config.server, "Saved connection config");
        Ok(())
    }

    // ==================== Network Mode ====================

    pub fn network(&self) -> NetworkMode {
        self.network
    }

    pub fn set_network(&mut self, network: NetworkMode) {
        if network != self.network {
            tracing::info!(from = %self.network, to = %network, "Switching network mode");
        }
        self.network = network;
    }

    pub fn is_testnet(&self) -> bool {
        self.network.is_testnet()
    }

    pub fn set_testnet(&mut self, is_testnet: bool) {
        self.set_network(NetworkMode::from_testnet(is_testnet));
    }

    // ==================== Runtime State ====================

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    pub fn set_syncing(&mut self, syncing: bool) {
        self.syncing = syncing;
    }

    pub fn block_height(&self) -> BlockHeight {
        self.block_height
    }

    pub fn set_block_height(&mut self, height: BlockHeight) {
        self.block_height = height;
    }

    /// Last fetched ZEC price in USD, 0.0 when unknown.
    pub fn zec_price(&self) -> f64 {
        self.zec_price
    }

    pub fn set_zec_price(&mut self, price: f64) {
        self.zec_price = price;
    }

    pub fn zcashd_version(&self) -> Option<u32> {
        self.zcashd_version
    }

    pub fn set_zcashd_version(&mut self, version: u32) {
        self.zcashd_version = Some(version);
    }

    /// True once the chain tip is past the Sapling activation height.
    pub fn is_sapling_active(&self) -> bool {
        self.block_height > self.network.sapling_activation_height()
    }

    // ==================== Persisted Options ====================

    pub fn check_for_updates(&self) -> Result<bool, StoreError> {
        self.store.get_bool(keys::CHECK_FOR_UPDATES, true)
    }

    pub fn set_check_for_updates(&mut self, allow: bool) -> Result<(), StoreError> {
        self.store.set_bool(keys::CHECK_FOR_UPDATES, allow)
    }

    pub fn allow_fetch_prices(&self) -> Result<bool, StoreError> {
        self.store.get_bool(keys::FETCH_PRICES, true)
    }

    pub fn set_allow_fetch_prices(&mut self, allow: bool) -> Result<(), StoreError> {
        self.store.set_bool(keys::FETCH_PRICES, allow)
    }

    /// Saved theme name, `None` when the user never picked one.
    pub fn theme_name(&self) -> Result<Option<String>, StoreError> {
        self.store.get_string(keys::THEME_NAME)
    }

    pub fn set_theme_name(&mut self, theme: &str) -> Result<(), StoreError> {
        self.store.set_string(keys::THEME_NAME, theme)
    }

    /// Saved window geometry blob for the named window.
    pub fn window_state(&self, window: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self.store.get(&geometry_key(window))? {
            Some(PreferenceValue::Text(encoded)) => Ok(Some(BASE64.decode(encoded)?)),
            Some(PreferenceValue::Bool(_)) => {
                tracing::warn!(window, "Window state is not a text blob, ignoring");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn set_window_state(&mut self, window: &str, state: &[u8]) -> Result<(), StoreError> {
        self.store.set_string(&geometry_key(window), &BASE64.encode(state))
    }

    // ==================== Network Constants ====================

    pub fn token_name(&self) -> &'static str {
        self.network.token_name()
    }

    pub fn donation_address(&self) -> &'static str {
        self.network.donation_address()
    }

    pub fn miner_fee(&self) -> Amount {
        MINER_FEE
    }

    pub fn address_explorer_url(&self, address: &str) -> String {
        explorer::address_url(self.network, address)
    }

    pub fn tx_explorer_url(&self, txid: &str) -> String {
        explorer::tx_url(self.network, txid)
    }

    // ==================== Address Checks ====================

    pub fn classify_address(&self, address: &str) -> AddressKind {
        address::classify(self.network, address)
    }

    pub fn is_valid_address(&self, address: &str) -> bool {
        address::is_valid_address(self.network, address)
    }

    pub fn is_shielded_address(&self, address: &str) -> bool {
        address::is_shielded_address(self.network, address)
    }

    pub fn is_transparent_address(&self, address: &str) -> bool {
        address::is_transparent_address(self.network, address)
    }

    pub fn is_sapling_address(&self, address: &str) -> bool {
        address::is_sapling_address(self.network, address)
    }

    pub fn is_sprout_address(&self, address: &str) -> bool {
        address::is_sprout_address(self.network, address)
    }

    pub fn is_valid_sapling_spending_key(&self, key: &str) -> bool {
        address::is_valid_sapling_spending_key(self.network, key)
    }

    pub fn parse_payment_uri(&self, text: &str) -> Result<PaymentUri, PaymentUriError> {
        PaymentUri::parse(self.network, text)
    }

    // ==================== Display Helpers ====================

    /// `"1.5 ZEC"` style amount.
    pub fn zec_display(&self, amount: Amount) -> String {
        format!(
            "{} {}",
            to_display_string(amount, DECIMAL_PLACES),
            self.token_name()
        )
    }

    /// USD value of `amount` at the cached price, `None` while no price is known.
    pub fn usd_display(&self, amount: Amount) -> Option<String> {
        if self.zec_price > 0.0 {
            Some(format_usd(to_coins(amount, DECIMAL_PLACES) * self.zec_price))
        } else {
            None
        }
    }

    /// `"1.5 ZEC ($60.00)"`, or just the ZEC part while no price is known.
    pub fn zec_usd_display(&self, amount: Amount) -> String {
        match self.usd_display(amount) {
            Some(usd) => format!("{} ({})", self.zec_display(amount), usd),
            None => self.zec_display(amount),
        }
    }

    pub fn payment_uri_pretty(&self, uri: &PaymentUri) -> String {
        uri.pretty(self.token_name())
    }
}

fn load_config<S: PreferenceStore>(store: &S) -> Result<Config, StoreError> {
    let server = store
        .get_string(keys::SERVER)?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    Ok(Config { server })
}

fn geometry_key(window: &str) -> String {
    format!("{}{}", window, keys::GEOMETRY_SUFFIX)
}
