use crate::error::{Error, Result};
use dotenvy::dotenv;
use jsonwebtoken::Algorithm;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub username: String,
    pub password: String,
    pub from: String,
    pub server: String,
    pub port: u16,
    pub tls: bool,
    pub ssl: bool,
}

/// Startup values for the admin-editable site settings.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub admin_email: String,
    pub allow_registration: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub allowed_origins: Vec<String>,
    pub max_file_size: usize,
    pub max_video_size: usize,
    pub upload_dir: String,
    pub mail: MailConfig,
    pub site: SiteConfig,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let jwt_algorithm = parse_algorithm(&get_env_or("JWT_ALGORITHM", "HS256"))?;

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:9532"),
            database_url: get_env("DATABASE_URL")?,
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 20)?,
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_algorithm,
            access_token_expire_minutes: get_env_parse_or("ACCESS_TOKEN_EXPIRE_MINUTES", 60)?,
            allowed_origins: parse_origins(&get_env_or(
                "ALLOWED_ORIGINS",
                "http://localhost:3000,http://localhost:5173",
            )),
            max_file_size: get_env_parse_or("MAX_FILE_SIZE", 10 * 1024 * 1024)?,
            max_video_size: get_env_parse_or("MAX_VIDEO_SIZE", 100 * 1024 * 1024)?,
            upload_dir: get_env_or("UPLOAD_DIR", "./uploads"),
            mail: MailConfig {
                username: get_env_or("MAIL_USERNAME", ""),
                password: get_env_or("MAIL_PASSWORD", ""),
                from: get_env_or("MAIL_FROM", "noreply@example.edu.vn"),
                server: get_env_or("MAIL_SERVER", "smtp.gmail.com"),
                port: get_env_parse_or("MAIL_PORT", 587)?,
                tls: get_env_parse_or("MAIL_TLS", true)?,
                ssl: get_env_parse_or("MAIL_SSL", false)?,
            },
            site: SiteConfig {
                title: get_env_or("SITE_TITLE", "Math Learning"),
                description: get_env_or(
                    "SITE_DESCRIPTION",
                    "Online math lessons for middle-school students",
                ),
                admin_email: get_env_or("SITE_ADMIN_EMAIL", "admin@example.edu.vn"),
                allow_registration: get_env_parse_or("ALLOW_REGISTRATION", true)?,
            },
        })
    }
}

/// Only HMAC algorithms make sense with a shared secret.
pub fn parse_algorithm(raw: &str) -> Result<Algorithm> {
    let algorithm = Algorithm::from_str(raw.trim())
        .map_err(|_| Error::Config(format!("Invalid value for JWT_ALGORITHM: {}", raw)))?;
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(Error::Config(format!(
            "Unsupported JWT_ALGORITHM {:?}; use HS256, HS384 or HS512",
            other
        ))),
    }
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        let origins = parse_origins(" http://a.test , ,http://b.test");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn only_hmac_algorithms_are_accepted() {
        assert_eq!(parse_algorithm("HS512").unwrap(), Algorithm::HS512);
        assert!(parse_algorithm("RS256").is_err());
        assert!(parse_algorithm("nope").is_err());
    }
}
