use dotenvy::dotenv;
use log::error;
use serde::Deserialize;
use std::env;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub location: String,
    pub location_slug: String,
    pub redfin_region_id: u32,
    pub min_sqft: i32,
    pub max_rent: i32,
    pub db_path: String,
    pub poll_interval_seconds: u64,
    pub request_timeout_seconds: u64,

    // Filled from the environment, never from the config file
    #[serde(skip)]
    pub telegram_bot_token: String,
    #[serde(skip)]
    pub telegram_chat_ids: Vec<i64>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            location: "St. Petersburg, FL".to_string(),
            location_slug: "st-petersburg-fl".to_string(),
            redfin_region_id: 17193,
            min_sqft: 1500,
            max_rent: 7000,
            db_path: "listings.db".to_string(),
            poll_interval_seconds: 300,
            request_timeout_seconds: 30,
            telegram_bot_token: String::new(),
            telegram_chat_ids: Vec::new(),
        }
    }
}

pub fn create_test_config() -> Config {
    Config {
        db_path: ":memory:".to_string(),
        telegram_bot_token: "xxx".to_string(),
        telegram_chat_ids: vec![1],
        ..Config::default()
    }
}

/// Reads criteria and tunables from the optional TOML file at CONFIG_PATH and
/// the Telegram secrets from the environment. Missing secrets are fatal here,
/// not at scan time.
pub fn read_config() -> Config {
    dotenv().ok();

    let mut config = match env::var(CONFIG_PATH_ENV) {
        Ok(config_path) => std::fs::read(config_path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| toml::from_slice(&bytes).map_err(|e| e.to_string()))
            .unwrap_or_else(|err| {
                error!("failed to read config: {err}");
                std::process::exit(1);
            }),
        Err(_) => Config::default(),
    };

    config.telegram_bot_token = env::var(BOT_TOKEN_ENV).unwrap_or_else(|_| {
        error!("{BOT_TOKEN_ENV} not set");
        std::process::exit(1);
    });

    let chat_ids_raw = env::var(CHAT_ID_ENV).unwrap_or_else(|_| {
        error!("{CHAT_ID_ENV} not set");
        std::process::exit(1);
    });
    config.telegram_chat_ids = chat_ids_raw
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.trim().parse::<i64>().unwrap_or_else(|_| {
                error!("{CHAT_ID_ENV} contains a non-numeric chat id: {part}");
                std::process::exit(1);
            })
        })
        .collect();

    if config.telegram_chat_ids.is_empty() {
        error!("{CHAT_ID_ENV} is empty");
        std::process::exit(1);
    }

    config
}
