use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub loyalty: LoyaltyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyConfig {
    /// A discount card is minted every N completed bookings.
    #[serde(default = "default_milestone_interval")]
    pub milestone_interval: i64,
    /// Percentage tiers a minted card is drawn from.
    #[serde(default = "default_discount_tiers")]
    pub discount_tiers: Vec<i32>,
    /// Days until a minted card expires.
    #[serde(default = "default_card_validity_days")]
    pub card_validity_days: i64,
    /// Seconds between background auto-complete sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_milestone_interval() -> i64 {
    5
}

fn default_discount_tiers() -> Vec<i32> {
    vec![35, 45, 55]
}

fn default_card_validity_days() -> i64 {
    30
}

fn default_sweep_interval_secs() -> u64 {
    3600
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            milestone_interval: default_milestone_interval(),
            discount_tiers: default_discount_tiers(),
            card_validity_days: default_card_validity_days(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // Config file present: parse it, then let env vars override below.
                toml::from_str(&config_str)
                    .map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // No config file: build entirely from env vars and defaults.
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL").ok_or(
                    "DATABASE_URL env var is required when no config.toml file is present",
                )?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                        refresh_token_expires_in: get_env_parse(
                            "JWT_REFRESH_EXPIRES_IN",
                            2_592_000i64,
                        ),
                    },
                    loyalty: LoyaltyConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // Env overrides apply even when the file exists.
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT") {
            if let Ok(p) = v.parse() {
                config.server.port = p;
            }
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS") {
            if let Ok(mc) = v.parse() {
                config.database.max_connections = mc;
            }
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN") {
            if let Ok(n) = v.parse() {
                config.jwt.access_token_expires_in = n;
            }
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN") {
            if let Ok(n) = v.parse() {
                config.jwt.refresh_token_expires_in = n;
            }
        }
        if let Ok(v) = env::var("LOYALTY_MILESTONE_INTERVAL") {
            if let Ok(n) = v.parse() {
                config.loyalty.milestone_interval = n;
            }
        }
        if let Ok(v) = env::var("LOYALTY_CARD_VALIDITY_DAYS") {
            if let Ok(n) = v.parse() {
                config.loyalty.card_validity_days = n;
            }
        }
        if let Ok(v) = env::var("LOYALTY_SWEEP_INTERVAL_SECS") {
            if let Ok(n) = v.parse() {
                config.loyalty.sweep_interval_secs = n;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loyalty_defaults() {
        let loyalty = LoyaltyConfig::default();
        assert_eq!(loyalty.milestone_interval, 5);
        assert_eq!(loyalty.discount_tiers, vec![35, 45, 55]);
        assert_eq!(loyalty.card_validity_days, 30);
    }

    #[test]
    fn loyalty_section_is_optional() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "postgres://localhost/quickcourt"
            max_connections = 5

            [jwt]
            secret = "test-secret"
            access_token_expires_in = 7200
            refresh_token_expires_in = 2592000
            "#,
        )
        .unwrap();
        assert_eq!(config.loyalty.milestone_interval, 5);
    }
}
