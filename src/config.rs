use dotenvy::dotenv;
use std::env;
use std::sync::{Arc, OnceLock};

/// Global Config stored in `OnceLock`
static CONFIG: OnceLock<Arc<Config>> = OnceLock::new();

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub public_url: String,
    pub jwt_secret: String,
    pub database_url: Option<String>,
}

impl Config {
    /// Load environment variables and set defaults
    pub fn from_env() -> Self {
        dotenv().ok(); // Load .env only once

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        Self {
            // PUBLIC_URL is the base for hypermedia links; behind a proxy it
            // differs from the bind address.
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://{bind_addr}"))
                .trim_end_matches('/')
                .to_string(),
            bind_addr,
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "insecure-dev-secret".to_string()),
            database_url: env::var("DATABASE_URL").ok(),
        }
    }

    /// Initialize the global config. Idempotent so test binaries can call it
    /// without coordinating.
    pub fn init() {
        CONFIG.get_or_init(|| Arc::new(Self::from_env()));
    }

    /// Safe access to Config
    pub fn get() -> Arc<Config> {
        CONFIG.get().expect("Config not initialized").clone()
    }
}
