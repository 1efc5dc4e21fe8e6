use anyhow::{Context, Result};

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        // .env は任意。すでに設定済みの環境変数が優先される
        dotenv::dotenv().ok();

        let database = DatabaseConfig {
            host: var("DATABASE_HOST")?,
            port: var("DATABASE_PORT")?
                .parse()
                .context("DATABASE_PORT must be a port number")?,
            username: var("DATABASE_USERNAME")?,
            password: var("DATABASE_PASSWORD")?,
            database: var("DATABASE_NAME")?,
        };
        let redis = RedisConfig {
            host: var("REDIS_HOST")?,
            port: var("REDIS_PORT")?
                .parse()
                .context("REDIS_PORT must be a port number")?,
        };
        let auth = AuthConfig {
            ttl: var("AUTH_TOKEN_TTL")?
                .parse()
                .context("AUTH_TOKEN_TTL must be a number of seconds")?,
        };
        Ok(Self {
            database,
            redis,
            auth,
        })
    }
}

fn var(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("environment variable {key} is not set"))
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

pub struct AuthConfig {
    pub ttl: u64,
}
