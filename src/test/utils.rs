#[cfg(test)]
pub mod test_db {
    use crate::config::Config;
    use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
    use sqlx::{Connection, Row};
    use std::path::PathBuf;
    use std::sync::Once;
    use tempfile::TempDir;
    use tracing_subscriber::EnvFilter;

    static INIT: Once = Once::new();

    /// A SQLite database file that lives as long as the value.
    pub struct TestDb {
        _dir: TempDir,
        pub path: PathBuf,
    }

    impl TestDb {
        pub fn new() -> Self {
            INIT.call_once(|| {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(EnvFilter::new("debug"))
                    .with_test_writer()
                    .try_init();
            });

            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("gym_trainer.db");
            Self { _dir: dir, path }
        }

        pub fn config(&self) -> Config {
            Config::sqlite(&self.path)
        }

        pub async fn connect(&self) -> SqliteConnection {
            let options = SqliteConnectOptions::new()
                .filename(&self.path)
                .foreign_keys(true);
            SqliteConnection::connect_with(&options)
                .await
                .expect("Failed to open test database")
        }

        pub async fn table_names(&self) -> Vec<String> {
            let mut conn = self.connect().await;
            sqlx::query(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name != 'sqlite_sequence' ORDER BY name",
            )
            .fetch_all(&mut conn)
            .await
            .expect("Failed to fetch table names")
            .into_iter()
            .map(|row| row.get::<String, _>(0))
            .collect()
        }

        pub async fn count(&self, table: &str) -> i64 {
            let mut conn = self.connect().await;
            sqlx::query(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(&mut conn)
                .await
                .expect("Failed to count rows")
                .get::<i64, _>(0)
        }

        pub async fn insert_user(&self, conn: &mut SqliteConnection, email: &str) -> i64 {
            sqlx::query(
                "INSERT INTO users (username, email, password, age, weight) VALUES (?, ?, ?, ?, ?)",
            )
            .bind("lifter")
            .bind(email)
            .bind("hunter2")
            .bind(29_i64)
            .bind(81.5_f64)
            .execute(conn)
            .await
            .expect("Failed to insert user")
            .last_insert_rowid()
        }
    }
}
