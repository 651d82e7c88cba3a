use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use validator::Validate;

pub const DATABASE_NAME: &str = "gym_trainer";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    MySql,
    Sqlite,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::MySql => "mysql",
            Backend::Sqlite => "sqlite",
        }
    }
}

impl FromStr for Backend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Backend::MySql),
            "sqlite" => Ok(Backend::Sqlite),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::MySql => write!(f, "MySQL"),
            Backend::Sqlite => write!(f, "SQLite"),
        }
    }
}

/// Authentication plugin the provisioning account is expected to use.
///
/// The server picks the plugin during the handshake and sqlx follows it, so
/// this is a declaration checked at startup, not a client-side override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPlugin {
    MysqlNativePassword,
}

impl AuthPlugin {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthPlugin::MysqlNativePassword => "mysql_native_password",
        }
    }
}

impl FromStr for AuthPlugin {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mysql_native_password" => Ok(AuthPlugin::MysqlNativePassword),
            _ => Err(()),
        }
    }
}

/// How the seeded admin password is written to the `admins` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordStorage {
    #[default]
    Plain,
    Bcrypt,
}

impl FromStr for PasswordStorage {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(PasswordStorage::Plain),
            "bcrypt" => Ok(PasswordStorage::Bcrypt),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Validate)]
pub struct Config {
    pub backend: Backend,
    #[validate(length(min = 1, message = "DB_HOST must not be empty"))]
    pub host: String,
    #[validate(range(min = 1, message = "DB_PORT must be a non-zero port"))]
    pub port: u16,
    #[validate(length(min = 1, message = "DB_USER must not be empty"))]
    pub user: String,
    pub password: String,
    pub auth_plugin: AuthPlugin,
    pub sqlite_path: PathBuf,
    pub admin_password: PasswordStorage,
}

// Keeps the password out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("auth_plugin", &self.auth_plugin)
            .field("sqlite_path", &self.sqlite_path)
            .field("admin_password", &self.admin_password)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = parse_var("DB_BACKEND", Backend::MySql)?;

        let password = match dotenvy::var("DB_PASSWORD") {
            Ok(password) => password,
            Err(_) if backend == Backend::Sqlite => String::new(),
            Err(_) => return Err(ConfigError::Missing("DB_PASSWORD")),
        };

        let config = Config {
            backend,
            host: dotenvy::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: parse_var("DB_PORT", 3306)?,
            user: dotenvy::var("DB_USER").unwrap_or_else(|_| "root".to_string()),
            password,
            auth_plugin: parse_var("DB_AUTH_PLUGIN", AuthPlugin::MysqlNativePassword)?,
            sqlite_path: dotenvy::var("DB_SQLITE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(format!("{}.db", DATABASE_NAME))),
            admin_password: parse_var("ADMIN_PASSWORD_STORAGE", PasswordStorage::Plain)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// A configuration targeting a SQLite file; used for local runs and tests.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Config {
            backend: Backend::Sqlite,
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            auth_plugin: AuthPlugin::MysqlNativePassword,
            sqlite_path: path.into(),
            admin_password: PasswordStorage::Plain,
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match dotenvy::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}
