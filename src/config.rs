use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
    pub icon_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_url = env::var("FINANCEBOOK_DATABASE_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .ok();

        Self {
            host: env::var("FINANCEBOOK_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("FINANCEBOOK_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            database_path: database_url
                .map(|v| parse_database_path(&v))
                .unwrap_or_else(|| PathBuf::from("data/financebook.db")),
            migrations_path: env::var("FINANCEBOOK_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("migrations")),
            icon_path: env::var("FINANCEBOOK_ICON_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("icons")),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Accepts plain paths as well as `sqlite:` / `sqlite:///` style URLs.
fn parse_database_path(value: &str) -> PathBuf {
    let stripped = value
        .strip_prefix("sqlite:///")
        .or_else(|| value.strip_prefix("sqlite://"))
        .or_else(|| value.strip_prefix("sqlite:"))
        .unwrap_or(value);
    PathBuf::from(stripped)
}
