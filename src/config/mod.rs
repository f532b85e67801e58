use crate::prediction::abi::{DEFAULT_REFERRAL_ADDRESS, PANCAKESWAP_ADDRESS};
use crate::prediction::{
    Platform, TxSettings, DEFAULT_CLAIM_WINDOW, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE,
};

use alloy::primitives::Address;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

const ENV_PRIVATE_KEY: &str = "PREDICTION_PRIVATE_KEY";
const ENV_RPC_URL: &str = "PREDICTION_RPC_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing required env var: {0}")]
    MissingEnv(String),
    #[error("invalid address for {field}: {value}")]
    InvalidAddress { field: String, value: String },
    #[error("no contract address configured for {0}")]
    MissingContract(Platform),
}

#[derive(Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub contracts: ContractsConfig,
    #[serde(default)]
    pub tx: TxConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Signing key - loaded from env PREDICTION_PRIVATE_KEY, never from the file
    #[serde(skip)]
    pub private_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint, http(s) or ws(s)
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractsConfig {
    #[serde(default)]
    pub dogebets: Option<String>,
    #[serde(default = "default_pancakeswap")]
    pub pancakeswap: String,
    #[serde(default)]
    pub candlegenie: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxConfig {
    /// Gas limit for every bet and claim
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Gas price in wei for every bet and claim
    #[serde(default = "default_gas_price", deserialize_with = "deserialize_gas_price")]
    pub gas_price: u128,
    /// Referral address passed on DogeBets bets and CandleGenie claims
    #[serde(default = "default_referral")]
    pub referral_address: String,
    /// Number of resolved rounds scanned when claiming
    #[serde(default = "default_claim_window")]
    pub claim_window: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_rpc_url() -> String {
    "https://bsc-dataseed.binance.org".to_string()
}
fn default_pancakeswap() -> String {
    PANCAKESWAP_ADDRESS.to_checksum(None)
}
fn default_gas_limit() -> u64 {
    DEFAULT_GAS_LIMIT
}
fn default_gas_price() -> u128 {
    DEFAULT_GAS_PRICE
}
// TOML integers are i64, so read one and widen.
fn deserialize_gas_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    u64::deserialize(deserializer).map(u128::from)
}
fn default_referral() -> String {
    DEFAULT_REFERRAL_ADDRESS.to_checksum(None)
}
fn default_claim_window() -> u64 {
    DEFAULT_CLAIM_WINDOW
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
        }
    }
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            dogebets: None,
            pancakeswap: default_pancakeswap(),
            candlegenie: None,
        }
    }
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            gas_limit: default_gas_limit(),
            gas_price: default_gas_price(),
            referral_address: default_referral(),
            claim_window: default_claim_window(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("chain", &self.chain)
            .field("contracts", &self.contracts)
            .field("tx", &self.tx)
            .field("logging", &self.logging)
            .field("private_key", &if self.has_credentials() { "<redacted>" } else { "<unset>" })
            .finish()
    }
}

impl Config {
    /// Load config from a TOML file, then overlay environment variables for secrets.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(contents)?;
        config.apply_env();
        Ok(config)
    }

    /// Load a default config with env-only secrets (no file needed).
    pub fn from_env() -> Self {
        let mut config = Config {
            chain: ChainConfig::default(),
            contracts: ContractsConfig::default(),
            tx: TxConfig::default(),
            logging: LoggingConfig::default(),
            private_key: String::new(),
        };
        config.apply_env();
        config
    }

    // Secrets only ever come from the environment (never store in config file)
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(ENV_PRIVATE_KEY) {
            self.private_key = key;
        }
        if let Ok(url) = std::env::var(ENV_RPC_URL) {
            if !url.trim().is_empty() {
                self.chain.rpc_url = url;
            }
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.private_key.trim().is_empty()
    }

    /// Move the signing key out, leaving the config without credentials.
    pub fn take_private_key(&mut self) -> Result<String, ConfigError> {
        if !self.has_credentials() {
            return Err(ConfigError::MissingEnv(ENV_PRIVATE_KEY.to_string()));
        }
        Ok(std::mem::take(&mut self.private_key))
    }

    /// Deployed contract address for `platform`.
    pub fn contract_address(&self, platform: Platform) -> Result<Address, ConfigError> {
        let (field, value) = match platform {
            Platform::DogeBets => ("contracts.dogebets", self.contracts.dogebets.as_deref()),
            Platform::PancakeSwap => ("contracts.pancakeswap", Some(self.contracts.pancakeswap.as_str())),
            Platform::CandleGenie => ("contracts.candlegenie", self.contracts.candlegenie.as_deref()),
        };
        let value = value
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingContract(platform))?;
        parse_address(field, value)
    }

    pub fn tx_settings(&self) -> Result<TxSettings, ConfigError> {
        Ok(TxSettings {
            gas_limit: self.tx.gas_limit,
            gas_price: self.tx.gas_price,
            referral: parse_address("tx.referral_address", &self.tx.referral_address)?,
            claim_window: self.tx.claim_window,
        })
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, ConfigError> {
    Address::from_str(value.trim()).map_err(|_| ConfigError::InvalidAddress {
        field: field.to_string(),
        value: value.to_string(),
    })
}
