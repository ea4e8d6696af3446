/// Configuration management for the API server
///
/// Configuration is layered with the `config` crate: built-in defaults, then
/// an optional `todolist.toml` in the working directory, then environment
/// variables. A `.env` file is loaded into the environment first when present.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 127.0.0.1)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `DATABASE_URL`: PostgreSQL connection string. When unset, the URL is
///   assembled from `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`
///   and `DB_SSLMODE`
/// - `DB_TIMEZONE`: Session time zone for every connection (default: UTC)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use todolist_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use config::{builder::DefaultState, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Session time zone
    pub timezone: String,
}

/// Flat view of every configuration key, as read from the layered sources
#[derive(Debug, Deserialize)]
struct Settings {
    api_host: String,
    api_port: u16,
    cors_origins: String,
    database_url: Option<String>,
    database_max_connections: u32,
    db_host: String,
    db_port: u16,
    db_user: String,
    db_password: String,
    db_name: String,
    db_sslmode: String,
    db_timezone: String,
}

impl Config {
    /// Loads configuration from defaults, `todolist.toml` and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed into its field type
    /// (e.g. a non-numeric `API_PORT`)
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let builder = defaults()?
            .add_source(File::with_name("todolist").required(false))
            .add_source(Environment::default());

        Self::from_builder(builder)
    }

    /// Builds the configuration from an already-layered builder
    fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let settings: Settings = builder.build()?.try_deserialize()?;

        let url = match settings.database_url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => assemble_database_url(&settings),
        };

        let cors_origins = settings
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            api: ApiConfig {
                host: settings.api_host,
                port: settings.api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url,
                max_connections: settings.database_max_connections,
                timezone: settings.db_timezone,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("api_host", "127.0.0.1")?
        .set_default("api_port", 8080_i64)?
        .set_default("cors_origins", "*")?
        .set_default("database_max_connections", 10_i64)?
        .set_default("db_host", "localhost")?
        .set_default("db_port", 5432_i64)?
        .set_default("db_user", "postgres")?
        .set_default("db_password", "")?
        .set_default("db_name", "todolist")?
        .set_default("db_sslmode", "disable")?
        .set_default("db_timezone", "UTC")
}

fn assemble_database_url(settings: &Settings) -> String {
    let user = urlencoding::encode(&settings.db_user);
    let credentials = if settings.db_password.is_empty() {
        user.into_owned()
    } else {
        format!("{}:{}", user, urlencoding::encode(&settings.db_password))
    };

    format!(
        "postgres://{}@{}:{}/{}?sslmode={}",
        credentials, settings.db_host, settings.db_port, settings.db_name, settings.db_sslmode
    )
}
