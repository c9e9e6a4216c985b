use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const SOURCE_URL: &str = "https://kgsushi.ru";
pub const SEED_PATH: &str = "data/kgsushi.seed.json";
pub const SQL_PATH: &str = "supabase/seed.sql";
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; kgsushi-clone-seed/1.0)";
pub const FALLBACK_CATEGORY: &str = "rolly";

/// Runtime settings: defaults, then `kgsushi_seed.toml`, then `KGSUSHI_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub source_url: String,
    pub seed_path: PathBuf,
    pub sql_path: PathBuf,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Category assigned to products that list no category of their own.
    pub fallback_category: String,
    pub min_categories: usize,
    pub min_products: usize,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("source_url", SOURCE_URL)?
            .set_default("seed_path", SEED_PATH)?
            .set_default("sql_path", SQL_PATH)?
            .set_default("timeout_secs", 60_i64)?
            .set_default("user_agent", USER_AGENT)?
            .set_default("fallback_category", FALLBACK_CATEGORY)?
            .set_default("min_categories", 5_i64)?
            .set_default("min_products", 50_i64)?
            .add_source(File::with_name("kgsushi_seed").required(false))
            .add_source(Environment::with_prefix("KGSUSHI"))
            .build()?
            .try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            source_url: SOURCE_URL.to_string(),
            seed_path: PathBuf::from(SEED_PATH),
            sql_path: PathBuf::from(SQL_PATH),
            timeout_secs: 60,
            user_agent: USER_AGENT.to_string(),
            fallback_category: FALLBACK_CATEGORY.to_string(),
            min_categories: 5,
            min_products: 50,
        }
    }
}
