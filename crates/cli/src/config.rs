//! Configuration file for `artshop`.
//!
//! # Example
//!
//! ```toml
//! log_level = "info"
//!
//! [network]
//! rpc_url = "http://127.0.0.1:7545"
//! read_url = "https://reader.example/rpc"
//! contract_address = "0x5b1869d9a4c187f2eaa108f3062412ecf0526b24"
//! account = "0x627306090abab3a6e1400e9345bc60c78a8bef57"
//! poll_interval_ms = 500
//! confirmation_attempts = 120
//!
//! [events]
//! signatures = ["Created(uint256)", "Framed(uint256)"]
//! ```
//!
//! `ARTSHOP_RPC_URL`, `ARTSHOP_CONTRACT_ADDRESS` and `ARTSHOP_ACCOUNT`
//! override the file. Without an `account` the node's first unlocked
//! account signs.

use std::path::Path;
use std::time::Duration;

use artshop_chain::RpcConfig;
use artshop_core::Address;
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "artshop.toml";

/// Local development network.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:7545";

pub const RPC_URL_ENV: &str = "ARTSHOP_RPC_URL";
pub const CONTRACT_ADDRESS_ENV: &str = "ARTSHOP_CONTRACT_ADDRESS";
pub const ACCOUNT_ENV: &str = "ARTSHOP_ACCOUNT";

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtshopConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

/// `[network]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    pub read_url: Option<String>,
    pub contract_address: Option<String>,
    /// Signing account; overrides the node's first unlocked account.
    pub account: Option<String>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_confirmation_attempts")]
    pub confirmation_attempts: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            read_url: None,
            contract_address: None,
            account: None,
            poll_interval_ms: default_poll_interval_ms(),
            confirmation_attempts: default_confirmation_attempts(),
        }
    }
}

/// `[events]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsConfig {
    #[serde(default)]
    pub signatures: Vec<String>,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_confirmation_attempts() -> u32 {
    120
}

// ── Functions ─────────────────────────────────────────────────────────────────

/// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] if it
/// exists. An explicit path that cannot be read is an error; a missing
/// default file yields defaults.
pub fn load(path: Option<&Path>) -> Result<ArtshopConfig, String> {
    let mut config = match path {
        Some(path) => read(path)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                read(default)?
            } else {
                ArtshopConfig::default()
            }
        }
    };
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

fn read(path: &Path) -> Result<ArtshopConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

impl ArtshopConfig {
    /// Apply environment overrides. `lookup` returns the variable's value if set.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(RPC_URL_ENV).filter(|v| !v.is_empty()) {
            self.network.rpc_url = url;
        }
        if let Some(address) = lookup(CONTRACT_ADDRESS_ENV).filter(|v| !v.is_empty()) {
            self.network.contract_address = Some(address);
        }
        if let Some(account) = lookup(ACCOUNT_ENV).filter(|v| !v.is_empty()) {
            self.network.account = Some(account);
        }
    }

    pub fn contract_address(&self) -> Result<Address, String> {
        let raw = self.network.contract_address.as_deref().ok_or_else(|| {
            format!(
                "no contract address configured; set [network].contract_address in {} or {}",
                DEFAULT_CONFIG_FILE, CONTRACT_ADDRESS_ENV
            )
        })?;
        raw.parse()
            .map_err(|e| format!("invalid contract address '{}': {}", raw, e))
    }

    /// The pinned signing account, if one is configured.
    pub fn account(&self) -> Result<Option<Address>, String> {
        self.network
            .account
            .as_deref()
            .map(|raw| {
                raw.parse()
                    .map_err(|e| format!("invalid account '{}': {}", raw, e))
            })
            .transpose()
    }

    pub fn rpc_config(&self) -> Result<RpcConfig, String> {
        let mut rpc = RpcConfig::new(self.network.rpc_url.clone(), self.contract_address()?);
        rpc.read_url = self.network.read_url.clone();
        rpc.poll_interval = Duration::from_millis(self.network.poll_interval_ms);
        rpc.confirmation_attempts = self.network.confirmation_attempts;
        rpc.event_signatures = self.events.signatures.clone();
        Ok(rpc)
    }
}
