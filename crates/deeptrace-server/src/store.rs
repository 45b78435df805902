//! Read access to a case database.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{Connection, Row};
use tracing::info;

use crate::error::{Error, Result};
use crate::schema::SCHEMA_SQL;

/// One case's SQLite database.
pub struct CaseStore {
	conn: Mutex<Connection>,
	db_path: PathBuf,
}

/// Row counts per table, logged at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
	/// Rows in `entities`.
	pub entities: i64,
	/// Rows in `evidence_items`.
	pub evidence: i64,
	/// Rows in `events`.
	pub events: i64,
	/// Rows in `hypotheses`.
	pub hypotheses: i64,
	/// Rows in `suspect_pools`.
	pub suspects: i64,
	/// Rows in `sources`.
	pub sources: i64,
	/// Rows in `attachments`.
	pub attachments: i64,
}

impl CaseStore {
	/// Opens (creating if needed) the database at `db_path`.
	pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
		let db_path = db_path.as_ref().to_path_buf();
		if let Some(dir) = db_path.parent() {
			std::fs::create_dir_all(dir)?;
		}
		let conn = Connection::open(&db_path)?;
		Self::init(conn, db_path)
	}

	/// Database that lives only as long as the store.
	pub fn open_in_memory() -> Result<Self> {
		Self::init(Connection::open_in_memory()?, PathBuf::from(":memory:"))
	}

	fn init(conn: Connection, db_path: PathBuf) -> Result<Self> {
		conn.execute_batch("PRAGMA foreign_keys = ON;")?;
		conn.execute_batch(SCHEMA_SQL)?;
		let store = Self {
			conn: Mutex::new(conn),
			db_path,
		};
		let counts = store.counts()?;
		info!(
			"Case store opened: {} entities, {} evidence, {} events, path={}",
			counts.entities,
			counts.evidence,
			counts.events,
			store.db_path.display()
		);
		Ok(store)
	}

	/// Path the store was opened from.
	pub fn path(&self) -> &Path {
		&self.db_path
	}

	/// Runs raw SQL; used for seeding fixtures.
	pub fn execute_batch(&self, sql: &str) -> Result<()> {
		self.conn.lock().execute_batch(sql)?;
		Ok(())
	}

	/// Maps every row of `sql` through `f`.
	pub fn query_all<T>(
		&self,
		sql: &str,
		f: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
	) -> Result<Vec<T>> {
		let conn = self.conn.lock();
		let mut stmt = conn.prepare_cached(sql)?;
		let rows = stmt.query_map([], f)?.collect::<rusqlite::Result<Vec<_>>>()?;
		Ok(rows)
	}

	fn count(&self, table: &str) -> Result<i64> {
		let conn = self.conn.lock();
		conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
			.map_err(Error::from)
	}

	/// Row counts for the node tables.
	pub fn counts(&self) -> Result<StoreCounts> {
		Ok(StoreCounts {
			entities: self.count("entities")?,
			evidence: self.count("evidence_items")?,
			events: self.count("events")?,
			hypotheses: self.count("hypotheses")?,
			suspects: self.count("suspect_pools")?,
			sources: self.count("sources")?,
			attachments: self.count("attachments")?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn creates_case_directory_and_schema() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("new-case").join("case.db");
		let store = CaseStore::open(&path).unwrap();
		assert!(path.exists());
		assert_eq!(store.path(), path.as_path());
		assert_eq!(store.counts().unwrap().entities, 0);
	}

	#[test]
	fn reopening_keeps_rows() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("case.db");
		{
			let store = CaseStore::open(&path).unwrap();
			store
				.execute_batch(
					"INSERT INTO entities (name, entity_type) VALUES ('Victim A', 'person');",
				)
				.unwrap();
		}
		let store = CaseStore::open(&path).unwrap();
		assert_eq!(store.counts().unwrap().entities, 1);
	}

	#[test]
	fn attachment_links_reject_unknown_kinds() {
		let store = CaseStore::open_in_memory().unwrap();
		store
			.execute_batch("INSERT INTO attachments (filename) VALUES ('photo.jpg');")
			.unwrap();
		let err = store.execute_batch(
			"INSERT INTO attachment_links (attachment_id, entity_type, entity_id)
			 VALUES (1, 'planet', 1);",
		);
		assert!(matches!(err, Err(Error::Database(_))));
	}
}
