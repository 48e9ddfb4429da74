//! SQLite-backed key-value store
//!
//! A single `kv` table ordered by key holds the JSON-encoded projects, the
//! current project pointer and the schema version. The database is opened
//! and closed inside every call.

use std::fs;
use std::path::PathBuf;

use rusqlite::{Connection, OptionalExtension, params};

use super::{
    CURRENT_KEY, PersistentStorer, StoreError, StoreResult, VERSION_KEY, VERSION_TAG, decode,
    encode, parse_key, project_key,
};
use crate::model::Project;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY NOT NULL,
    value BLOB NOT NULL
) WITHOUT ROWID;";

/// Project store in a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the database, creating it if needed and wiping it on a schema
    /// version mismatch.
    fn open(&self) -> StoreResult<Connection> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(SCHEMA)?;
        check_version(&conn)?;
        Ok(conn)
    }
}

fn check_version(conn: &Connection) -> StoreResult<()> {
    match get(conn, VERSION_KEY)? {
        Some(found) if found == VERSION_TAG.as_bytes() => return Ok(()),
        Some(found) => {
            tracing::warn!(
                found = %String::from_utf8_lossy(&found),
                expected = VERSION_TAG,
                "patch store: version mismatch: wipe data"
            );
            conn.execute("DELETE FROM kv", [])?;
        }
        None => {}
    }
    put(conn, VERSION_KEY, VERSION_TAG.as_bytes())?;
    tracing::info!(version = VERSION_TAG, "patch store: set version");
    Ok(())
}

fn get(conn: &Connection, key: &str) -> StoreResult<Option<Vec<u8>>> {
    let value = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
        .optional()?;
    Ok(value)
}

fn has(conn: &Connection, key: &str) -> StoreResult<bool> {
    Ok(get(conn, key)?.is_some())
}

fn put(conn: &Connection, key: &str, value: &[u8]) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// All project records in key order.
fn scan_projects(conn: &Connection) -> StoreResult<Vec<(String, Vec<u8>)>> {
    let mut stmt = conn.prepare("SELECT key, value FROM kv ORDER BY key")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (key, value) = row?;
        if let Some(name) = parse_key(&key) {
            records.push((name.to_string(), value));
        }
    }
    Ok(records)
}

impl PersistentStorer for SqliteStore {
    fn store_project(&self, project: &Project, overwrite: bool) -> StoreResult<()> {
        let conn = self.open()?;
        let key = project_key(&project.name);
        if has(&conn, &key)? && !overwrite {
            return Err(StoreError::ProjectExists {
                name: project.name.clone(),
            });
        }
        tracing::debug!(?project, "Storing project");
        put(&conn, &key, &encode(project)?)
    }

    fn delete_project(&self, name: &str) -> StoreResult<()> {
        let conn = self.open()?;
        let deleted = conn.execute("DELETE FROM kv WHERE key = ?1", [project_key(name)])?;
        if deleted == 0 {
            return Err(StoreError::ProjectNotFound {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn current_name(&self) -> StoreResult<Option<String>> {
        let conn = self.open()?;
        let current = get(&conn, CURRENT_KEY)?;
        Ok(current.and_then(|key| {
            let key = String::from_utf8_lossy(&key);
            parse_key(&key)
                .filter(|name| !name.is_empty())
                .map(String::from)
        }))
    }

    fn set_current(&self, name: &str) -> StoreResult<()> {
        let conn = self.open()?;
        put(&conn, CURRENT_KEY, project_key(name).as_bytes())
    }

    fn clear_current(&self) -> StoreResult<()> {
        let conn = self.open()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", [CURRENT_KEY])?;
        Ok(())
    }

    fn current(&self) -> StoreResult<Project> {
        let conn = self.open()?;
        let key = get(&conn, CURRENT_KEY)?.ok_or(StoreError::NoCurrentProject)?;
        let key = String::from_utf8_lossy(&key).into_owned();
        let raw = get(&conn, &key)?.ok_or_else(|| StoreError::ProjectNotFound {
            name: parse_key(&key).unwrap_or(&key).to_string(),
        })?;
        decode(&raw)
    }

    fn project(&self, name: &str) -> StoreResult<Project> {
        let conn = self.open()?;
        let raw = get(&conn, &project_key(name))?.ok_or_else(|| StoreError::ProjectNotFound {
            name: name.to_string(),
        })?;
        decode(&raw)
    }

    fn names(&self) -> StoreResult<Vec<String>> {
        let conn = self.open()?;
        Ok(scan_projects(&conn)?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    fn projects(&self) -> StoreResult<Vec<Project>> {
        let conn = self.open()?;
        scan_projects(&conn)?
            .iter()
            .map(|(_, raw)| decode(raw))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Commit;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(dir.path().join("cache/projects.sqlite3"));
        (dir, store)
    }

    fn project(name: &str) -> Project {
        Project {
            name: name.into(),
            root: format!("/src/{name}"),
            revctrl_id: "git".into(),
            base: Commit {
                id: "base".into(),
                ..Default::default()
            },
            commits: Vec::new(),
            worktree: None,
        }
    }

    #[test]
    fn store_and_load_project() {
        let (_dir, store) = store();
        store.store_project(&project("aerc"), false).unwrap();

        assert_eq!(store.project("aerc").unwrap(), project("aerc"));
        assert_eq!(store.names().unwrap(), vec!["aerc".to_string()]);
        assert_eq!(store.projects().unwrap(), vec![project("aerc")]);
    }

    #[test]
    fn store_without_overwrite_rejects_existing() {
        let (_dir, store) = store();
        store.store_project(&project("aerc"), false).unwrap();

        let err = store.store_project(&project("aerc"), false).unwrap_err();
        assert!(matches!(err, StoreError::ProjectExists { .. }));

        let mut changed = project("aerc");
        changed.root = "/elsewhere".into();
        store.store_project(&changed, true).unwrap();
        assert_eq!(store.project("aerc").unwrap().root, "/elsewhere");
    }

    #[test]
    fn current_pointer() {
        let (_dir, store) = store();
        assert_eq!(store.current_name().unwrap(), None);
        assert!(matches!(store.current(), Err(StoreError::NoCurrentProject)));

        store.store_project(&project("aerc"), false).unwrap();
        store.set_current("aerc").unwrap();
        assert_eq!(store.current_name().unwrap().as_deref(), Some("aerc"));
        assert_eq!(store.current().unwrap().name, "aerc");

        store.clear_current().unwrap();
        assert_eq!(store.current_name().unwrap(), None);
    }

    #[test]
    fn names_are_key_ordered_and_skip_bookkeeping_keys() {
        let (_dir, store) = store();
        store.store_project(&project("zeta"), false).unwrap();
        store.store_project(&project("alpha"), false).unwrap();
        store.set_current("zeta").unwrap();

        assert_eq!(
            store.names().unwrap(),
            vec!["alpha".to_string(), "zeta".to_string()]
        );
    }

    #[test]
    fn delete_missing_project_fails() {
        let (_dir, store) = store();
        let err = store.delete_project("nope").unwrap_err();
        assert!(matches!(err, StoreError::ProjectNotFound { .. }));

        store.store_project(&project("aerc"), false).unwrap();
        store.delete_project("aerc").unwrap();
        assert!(store.names().unwrap().is_empty());
    }

    #[test]
    fn database_failures_are_reported_as_sqlite_errors() {
        let dir = TempDir::new().unwrap();
        // a directory cannot hold the database
        let store = SqliteStore::new(dir.path());
        let err = store.names().unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
        assert!(err.to_string().starts_with("SQLite error: "));
    }

    #[test]
    fn version_mismatch_wipes_all_keys() {
        let (_dir, store) = store();
        store.store_project(&project("aerc"), false).unwrap();
        store.set_current("aerc").unwrap();

        let conn = Connection::open(&store.path).unwrap();
        put(&conn, VERSION_KEY, b"0000").unwrap();
        drop(conn);

        assert!(store.names().unwrap().is_empty());
        assert_eq!(store.current_name().unwrap(), None);

        let conn = Connection::open(&store.path).unwrap();
        assert_eq!(
            get(&conn, VERSION_KEY).unwrap().as_deref(),
            Some(VERSION_TAG.as_bytes())
        );
    }
}
