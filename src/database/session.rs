use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Row};
use tracing::{debug, instrument};

use crate::config::{Backend, Config};
use crate::database::schema::Dialect;
use crate::models::AdminSeed;

/// One open connection to the storage layer.
///
/// The provisioner only needs to run statements and learn how they failed, so
/// each backend wraps its own sqlx connection behind this trait. Dropping a
/// session closes the socket; `close` does it gracefully.
#[allow(async_fn_in_trait)]
pub trait SchemaSession {
    fn dialect(&self) -> Dialect;

    fn backend(&self) -> Backend;

    /// Runs a statement over the text protocol.
    async fn execute(&mut self, sql: &str) -> Result<u64, sqlx::Error>;

    async fn table_exists(&mut self, table: &str) -> Result<bool, sqlx::Error>;

    /// Inserts the seed row unless its email is already present.
    /// Returns the number of rows written.
    async fn insert_admin(&mut self, seed: &AdminSeed, password: &str)
    -> Result<u64, sqlx::Error>;

    async fn close(self) -> Result<(), sqlx::Error>;
}

pub struct MySqlSession {
    conn: MySqlConnection,
}

impl MySqlSession {
    #[instrument(skip(config), fields(host = %config.host, port = config.port, user = %config.user))]
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        debug!(
            expected_auth_plugin = config.auth_plugin.as_str(),
            "Connecting to MySQL server; auth mechanism is negotiated with the server"
        );
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password);
        let conn = MySqlConnection::connect_with(&options).await?;
        Ok(Self { conn })
    }
}

impl SchemaSession for MySqlSession {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn backend(&self) -> Backend {
        Backend::MySql
    }

    async fn execute(&mut self, sql: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::raw_sql(sql).execute(&mut self.conn).await?;
        Ok(result.rows_affected())
    }

    async fn table_exists(&mut self, table: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query(Dialect::MySql.table_exists())
            .bind(table)
            .fetch_one(&mut self.conn)
            .await?
            .get(0);
        Ok(count > 0)
    }

    async fn insert_admin(
        &mut self,
        seed: &AdminSeed,
        password: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(Dialect::MySql.insert_admin())
            .bind(seed.username)
            .bind(seed.email)
            .bind(password)
            .execute(&mut self.conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn close(self) -> Result<(), sqlx::Error> {
        self.conn.close().await
    }
}

pub struct SqliteSession {
    conn: SqliteConnection,
}

impl SqliteSession {
    #[instrument(skip(config), fields(path = %config.sqlite_path.display()))]
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        debug!("Opening SQLite database file");
        let options = SqliteConnectOptions::new()
            .filename(&config.sqlite_path)
            .create_if_missing(true)
            .foreign_keys(true);
        let conn = SqliteConnection::connect_with(&options).await?;
        Ok(Self { conn })
    }
}

impl SchemaSession for SqliteSession {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    async fn execute(&mut self, sql: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::raw_sql(sql).execute(&mut self.conn).await?;
        Ok(result.rows_affected())
    }

    async fn table_exists(&mut self, table: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query(Dialect::Sqlite.table_exists())
            .bind(table)
            .fetch_one(&mut self.conn)
            .await?
            .get(0);
        Ok(count > 0)
    }

    async fn insert_admin(
        &mut self,
        seed: &AdminSeed,
        password: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(Dialect::Sqlite.insert_admin())
            .bind(seed.username)
            .bind(seed.email)
            .bind(password)
            .execute(&mut self.conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn close(self) -> Result<(), sqlx::Error> {
        self.conn.close().await
    }
}
