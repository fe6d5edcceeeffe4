//! Database handle: opening, schema bootstrap and seeding.

use std::path::Path;

use tokio_rusqlite::Connection;

use harsh_core::mapper::{DataMapper, RepositoryError, Result};
use harsh_core::seed::generate_dummy_users;

use super::mapper::{wrap_err, SqliteDataMapper};
use super::schema;
use super::user_mapper::UserMapper;

/// An open SQLite database.
///
/// One handle per unit of work. Mappers built from it share its connection,
/// which is released when the handle and every mapper are dropped, or
/// explicitly through [`Database::close`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a file-based database, creating the file if it doesn't exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        tracing::debug!(path = %path.display(), "database opened");
        Ok(Self { conn })
    }

    /// Opens an in-memory database. Data is lost when the connection closes.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Executes a batch of schema statements.
    pub async fn apply_schema(&self, sql: impl Into<String>) -> Result<()> {
        let sql = sql.into();
        self.conn
            .call(move |conn| {
                conn.execute_batch(&sql).map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Reads a schema file and executes it.
    pub async fn apply_schema_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let sql = tokio::fs::read_to_string(path).await.map_err(|e| {
            RepositoryError::InvalidData(format!(
                "Cannot read schema file {}: {e}",
                path.display()
            ))
        })?;

        self.apply_schema(sql).await
    }

    /// Creates the tables, from `schema_file` when given or the built-in schema.
    pub async fn init(&self, schema_file: Option<&Path>) -> Result<()> {
        match schema_file {
            Some(path) => {
                tracing::info!(schema = %path.display(), "applying schema file");
                self.apply_schema_file(path).await
            }
            None => {
                tracing::info!("applying built-in schema");
                self.apply_schema(schema::CREATE_TABLES).await
            }
        }
    }

    /// Builds a user mapper sharing this database's connection.
    pub async fn user_mapper(&self, enable_foreign_keys: bool) -> Result<UserMapper> {
        UserMapper::attach(self.conn.clone(), enable_foreign_keys).await
    }

    /// Generic executor sharing this database's connection.
    pub async fn data_mapper(&self, enable_foreign_keys: bool) -> Result<SqliteDataMapper> {
        SqliteDataMapper::attach(self.conn.clone(), enable_foreign_keys).await
    }

    /// Inserts `count` reproducible dummy users and returns how many were created.
    ///
    /// Users whose insert is rejected (for example a username left over from a
    /// previous seeding) are skipped and logged.
    pub async fn seed_dummy_users(
        &self,
        count: usize,
        seed: u64,
        enable_foreign_keys: bool,
    ) -> Result<usize> {
        let users = generate_dummy_users(count, seed)
            .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;
        let mapper = self.user_mapper(enable_foreign_keys).await?;

        let mut created = 0;
        for user in &users {
            let state = mapper.create(user, &["id"]).await;
            if state.valid() {
                created += 1;
            } else {
                tracing::warn!(username = user.username(), message = state.message(), "dummy user skipped");
            }
        }

        tracing::info!(created, requested = count, seed, "seeded dummy users");
        Ok(created)
    }

    /// Closes the connection, waiting for queued statements to finish.
    ///
    /// Mappers created from this database stop working afterwards.
    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use harsh_core::entity::{hash_password, User};
    use harsh_core::query::QueryArgsBag;
    use harsh_core::seed::BAD_PASSWORDS;

    use super::*;

    async fn initialized() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        db.init(None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let db = initialized().await;

        db.init(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_seed_creates_every_user() {
        let db = initialized().await;

        let created = db.seed_dummy_users(10, 42, false).await.unwrap();

        assert_eq!(created, 10);
        let mapper = db.user_mapper(false).await.unwrap();
        let users = mapper.read(&QueryArgsBag::default()).await.unwrap();
        assert_eq!(users.data().len(), 10);
        assert!(users.data().iter().all(|u| BAD_PASSWORDS
            .iter()
            .any(|p| hash_password(p) == u.password())));
    }

    #[tokio::test]
    async fn test_seed_honours_foreign_key_setting() {
        let db = initialized().await;

        assert_eq!(db.seed_dummy_users(2, 1, true).await.unwrap(), 2);

        let enabled = db
            .data_mapper(false)
            .await
            .unwrap()
            .foreign_keys_enabled()
            .await
            .unwrap();
        assert!(enabled);
    }

    #[tokio::test]
    async fn test_seed_twice_skips_taken_usernames() {
        let db = initialized().await;
        db.seed_dummy_users(5, 7, false).await.unwrap();

        let created = db.seed_dummy_users(5, 7, false).await.unwrap();

        assert_eq!(created, 0);
    }

    #[tokio::test]
    async fn test_seed_without_schema_creates_nothing() {
        let db = Database::open_in_memory().await.unwrap();

        assert_eq!(db.seed_dummy_users(3, 1, false).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");

        let db = Database::open(&path).await.unwrap();
        db.init(None).await.unwrap();
        let mapper = db.user_mapper(false).await.unwrap();
        mapper
            .create(&User::new("noahg", "password1").unwrap(), &["id"])
            .await;
        drop(mapper);
        db.close().await.unwrap();

        let db = Database::open(&path).await.unwrap();
        let state = db
            .user_mapper(false)
            .await
            .unwrap()
            .read_by_credentials("noahg", &hash_password("password1"))
            .await;
        assert_eq!(state.data().len(), 1);
    }

    #[tokio::test]
    async fn test_init_from_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("schema.sql");
        std::fs::write(&schema_path, schema::CREATE_TABLES).unwrap();

        let db = Database::open_in_memory().await.unwrap();
        db.init(Some(&schema_path)).await.unwrap();

        assert_eq!(db.seed_dummy_users(2, 3, false).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_schema_file() {
        let db = Database::open_in_memory().await.unwrap();

        let result = db.apply_schema_file("/nonexistent/schema.sql").await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_invalid_schema_sql() {
        let db = Database::open_in_memory().await.unwrap();

        let result = db.apply_schema("CREATE TABLE (").await;

        assert!(matches!(result, Err(RepositoryError::QueryFailed(_))));
    }

    #[tokio::test]
    async fn test_data_mapper_shares_connection() {
        let db = initialized().await;
        db.seed_dummy_users(3, 9, false).await.unwrap();

        let count = db
            .data_mapper(false)
            .await
            .unwrap()
            .exec_query(
                "SELECT COUNT(*) FROM users".into(),
                vec![],
                true,
                |row| row.get::<_, i64>(0),
                "User",
            )
            .await
            .unwrap();

        assert_eq!(count, vec![3]);
    }
}
