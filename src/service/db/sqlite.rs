//! SQLite implementation of the membership store.
//!
//! Expected layout (provisioned externally):
//!
//! ```sql
//! CREATE TABLE chats (id INTEGER PRIMARY KEY, telegram_id INTEGER NOT NULL UNIQUE);
//! CREATE TABLE members (id INTEGER NOT NULL, member TEXT NOT NULL);
//! ```

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use tracing::{debug, info, instrument};

use crate::base::{
    error::RelayError,
    types::{Res, Void},
};

use super::{DbClient, GenericDbClient};

const RESOLVE_CHAT_QUERY: &str = "SELECT id FROM chats WHERE telegram_id = ?1";
const LIST_MEMBERS_QUERY: &str = "SELECT member FROM members WHERE id = ?1 ORDER BY rowid";

// Extra methods on `DbClient` applied by the sqlite implementation.

impl DbClient {
    /// Opens the SQLite membership store at `path`.
    pub fn sqlite(path: impl AsRef<Path>) -> Res<Self> {
        let client = SqliteDbClient::open(path)?;
        Ok(Self::new(Arc::new(client)))
    }
}

/// Read-only SQLite membership store.
///
/// The connection is shared behind a mutex; every query runs on the blocking pool.
pub struct SqliteDbClient {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDbClient {
    /// Opens the database read-only and checks that both relations are queryable.
    #[instrument(name = "SqliteDbClient::open", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
            .map_err(|e| RelayError::StoreUnavailable(format!("cannot open `{}`: {}", path.display(), e)))?;

        probe_schema(&conn).map_err(|e| RelayError::StoreUnavailable(format!("`{}` is not a membership store: {}", path.display(), e)))?;

        info!("Membership store opened.");

        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// Runs a read against the shared connection on the blocking pool.
    async fn read<T, F>(&self, f: F) -> Result<T, RelayError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| RelayError::StoreUnavailable("connection lock poisoned".to_string()))?;
            f(&conn).map_err(RelayError::from)
        })
        .await
        .map_err(|e| RelayError::StoreUnavailable(format!("store task failed: {e}")))?
    }
}

/// Prepares both queries, which fails when either relation or column is missing.
fn probe_schema(conn: &Connection) -> Void {
    conn.prepare(RESOLVE_CHAT_QUERY)?;
    conn.prepare(LIST_MEMBERS_QUERY)?;

    Ok(())
}

#[async_trait]
impl GenericDbClient for SqliteDbClient {
    #[instrument(skip(self))]
    async fn resolve_internal_id(&self, platform_chat_id: i64) -> Res<i64> {
        let internal_id = self
            .read(move |conn| {
                conn.prepare_cached(RESOLVE_CHAT_QUERY)?
                    .query_row(params![platform_chat_id], |row| row.get::<_, i64>(0))
                    .optional()
            })
            .await?;

        let internal_id = internal_id.ok_or(RelayError::UnknownChat(platform_chat_id))?;

        debug!("Chat `{}` resolved to internal ID `{}`.", platform_chat_id, internal_id);

        Ok(internal_id)
    }

    #[instrument(skip(self))]
    async fn list_members(&self, internal_id: i64) -> Res<Vec<String>> {
        let members = self
            .read(move |conn| {
                let mut statement = conn.prepare_cached(LIST_MEMBERS_QUERY)?;
                let rows = statement.query_map(params![internal_id], |row| row.get::<_, String>(0))?;

                rows.collect::<rusqlite::Result<Vec<_>>>()
            })
            .await?;

        debug!("Found {} members for internal chat `{}`.", members.len(), internal_id);

        Ok(members)
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn create_store(statements: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        let conn = Connection::open(file.path()).unwrap();
        conn.execute_batch(statements).unwrap();
        file
    }

    fn membership_store() -> tempfile::NamedTempFile {
        create_store(
            "CREATE TABLE chats (id INTEGER PRIMARY KEY, telegram_id INTEGER NOT NULL UNIQUE);
             CREATE TABLE members (id INTEGER NOT NULL, member TEXT NOT NULL);
             INSERT INTO chats (id, telegram_id) VALUES (1, -1001), (2, -1002);
             INSERT INTO members (id, member) VALUES (1, 'alice'), (1, 'bob'), (1, 'carol');",
        )
    }

    #[tokio::test]
    async fn test_resolve_known_chat() {
        let file = membership_store();
        let db = DbClient::sqlite(file.path()).unwrap();

        assert_eq!(db.resolve_internal_id(-1001).await.unwrap(), 1);
        assert_eq!(db.resolve_internal_id(-1002).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_resolve_unknown_chat() {
        let file = membership_store();
        let db = DbClient::sqlite(file.path()).unwrap();

        let err = db.resolve_internal_id(12345).await.unwrap_err();
        assert_eq!(err.downcast_ref::<RelayError>(), Some(&RelayError::UnknownChat(12345)));
    }

    #[tokio::test]
    async fn test_list_members_in_store_order() {
        let file = membership_store();
        let db = DbClient::sqlite(file.path()).unwrap();

        assert_eq!(db.list_members(1).await.unwrap(), vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_list_members_empty() {
        let file = membership_store();
        let db = DbClient::sqlite(file.path()).unwrap();

        assert!(db.list_members(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_is_read_only() {
        let file = membership_store();
        let client = SqliteDbClient::open(file.path()).unwrap();

        let result = client.read(|conn| conn.execute("DELETE FROM members", [])).await;
        assert!(matches!(result, Err(RelayError::StoreUnavailable(_))));

        assert_eq!(client.list_members(1).await.unwrap().len(), 3);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqliteDbClient::open(dir.path().join("missing.db")).err().unwrap();

        assert!(matches!(err.downcast_ref::<RelayError>(), Some(RelayError::StoreUnavailable(_))));
    }

    #[test]
    fn test_open_rejects_wrong_schema() {
        let file = create_store("CREATE TABLE chats (id INTEGER PRIMARY KEY, telegram_id INTEGER);");
        let err = SqliteDbClient::open(file.path()).err().unwrap();

        assert!(matches!(err.downcast_ref::<RelayError>(), Some(RelayError::StoreUnavailable(_))));
    }
}
