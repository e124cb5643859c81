// SQLite-backed document store
//
// Every document lives in one `documents` table as a JSON body, tagged with
// its logical database and collection. `seq` keeps insertion order.

use super::{Document, DocumentStore, Filter, StorageError, StorageResult, INTERNAL_ID_FIELD};
use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};

/// In-memory location accepted in DATABASE_URL
pub const MEMORY_URL: &str = "sqlite::memory:";

pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
    database: String,
}

impl SqliteDocumentStore {
    /// Open the database at `url` (`sqlite::memory:`, `sqlite://<path>` or a bare path)
    pub fn open(url: &str, database: &str) -> StorageResult<Self> {
        let opened = if url == MEMORY_URL {
            Connection::open_in_memory()
        } else {
            Connection::open(file_path(url))
        };
        let conn = opened.map_err(|e| StorageError::Connection(e.to_string()))?;

        Self::from_connection(conn, database)
    }

    pub fn open_in_memory(database: &str) -> StorageResult<Self> {
        Self::open(MEMORY_URL, database)
    }

    pub fn from_connection(conn: Connection, database: &str) -> StorageResult<Self> {
        setup_database(&conn)?;

        Ok(SqliteDocumentStore {
            conn: Mutex::new(conn),
            database: database.to_string(),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Total documents stored under this database name
    pub fn count(&self) -> StorageResult<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE database_name = ?1",
            [&self.database],
            |row| row.get(0),
        )?;

        Ok(count)
    }
}

fn file_path(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

pub fn setup_database(conn: &Connection) -> StorageResult<()> {
    // WAL for crash recovery (in-memory databases report "memory")
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            doc_id TEXT UNIQUE NOT NULL,
            database_name TEXT NOT NULL,
            collection TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection
         ON documents(database_name, collection, seq)",
        [],
    )?;

    Ok(())
}

fn parse_body(doc_id: String, body: &str) -> StorageResult<Document> {
    let mut document = match serde_json::from_str::<Value>(body)? {
        Value::Object(document) => document,
        _ => {
            return Err(StorageError::Serialization(format!(
                "document {} is not a JSON object",
                doc_id
            )))
        }
    };

    document.insert(INTERNAL_ID_FIELD.to_string(), Value::String(doc_id));
    Ok(document)
}

impl DocumentStore for SqliteDocumentStore {
    fn database_name(&self) -> &str {
        &self.database
    }

    fn insert(&self, collection: &str, mut document: Document) -> StorageResult<String> {
        // The identifier lives in its own column, not in the body
        document.remove(INTERNAL_ID_FIELD);

        let doc_id = uuid::Uuid::new_v4().to_string();
        let body = serde_json::to_string(&document)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (doc_id, database_name, collection, body, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![doc_id, self.database, collection, body, Utc::now().to_rfc3339()],
        )?;

        Ok(doc_id)
    }

    fn find(&self, collection: &str, filter: &Filter, limit: usize) -> StorageResult<Vec<Document>> {
        let mut documents = Vec::new();
        if limit == 0 {
            return Ok(documents);
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT doc_id, body FROM documents
             WHERE database_name = ?1 AND collection = ?2
             ORDER BY seq",
        )?;

        let mut rows = stmt.query(params![self.database, collection])?;
        while let Some(row) = rows.next()? {
            let doc_id: String = row.get(0)?;
            let body: String = row.get(1)?;

            let document = parse_body(doc_id, &body)?;
            if filter.matches(&document) {
                documents.push(document);
                if documents.len() == limit {
                    break;
                }
            }
        }

        Ok(documents)
    }

    fn find_by_id(&self, collection: &str, id: &str) -> StorageResult<Option<Document>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT doc_id, body FROM documents
             WHERE database_name = ?1 AND collection = ?2 AND doc_id = ?3",
        )?;

        let mut rows = stmt.query(params![self.database, collection, id])?;
        let document = match rows.next()? {
            Some(row) => {
                let doc_id: String = row.get(0)?;
                let body: String = row.get(1)?;
                Some(parse_body(doc_id, &body)?)
            }
            None => None,
        };

        Ok(document)
    }

    fn list_collection_names(&self) -> StorageResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT collection FROM documents
             WHERE database_name = ?1
             ORDER BY collection",
        )?;

        let names = stmt
            .query_map([&self.database], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(names)
    }
}
