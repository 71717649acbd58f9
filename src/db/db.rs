use super::{KeyValueStore, StoreError};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const LOCAL_STORAGE_TABLE: TableDefinition<&str, &str> = TableDefinition::new("local_storage");

/// On-disk key/value store kept in `<dir>/db`.
#[derive(Clone)]
pub struct LocalStorage {
    db: Arc<Database>,
    pub path: PathBuf,
}

impl LocalStorage {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }

        let db = Database::create(dir.join("db")).map_err(redb::Error::from)?;
        {
            let write_txn = db.begin_write().map_err(redb::Error::from)?;
            {
                write_txn
                    .open_table(LOCAL_STORAGE_TABLE)
                    .map_err(redb::Error::from)?;
            }
            write_txn.commit().map_err(redb::Error::from)?;
        }

        Ok(Self {
            db: Arc::new(db),
            path: dir.to_path_buf(),
        })
    }

    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let tx = self.db.begin_read().map_err(redb::Error::from)?;
        let table = tx
            .open_table(LOCAL_STORAGE_TABLE)
            .map_err(redb::Error::from)?;

        let mut keys = Vec::new();
        for item in table.iter().map_err(redb::Error::from)? {
            let (key, _) = item.map_err(redb::Error::from)?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let tx = self.db.begin_read().map_err(redb::Error::from)?;
        let table = tx
            .open_table(LOCAL_STORAGE_TABLE)
            .map_err(redb::Error::from)?;
        let value = table.get(key).map_err(redb::Error::from)?;
        Ok(value.map(|v| v.value().to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let tx = self.db.begin_write().map_err(redb::Error::from)?;
        {
            let mut table = tx
                .open_table(LOCAL_STORAGE_TABLE)
                .map_err(redb::Error::from)?;
            table.insert(key, value).map_err(redb::Error::from)?;
        }
        tx.commit().map_err(redb::Error::from)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let tx = self.db.begin_write().map_err(redb::Error::from)?;
        {
            let mut table = tx
                .open_table(LOCAL_STORAGE_TABLE)
                .map_err(redb::Error::from)?;
            table.remove(key).map_err(redb::Error::from)?;
        }
        tx.commit().map_err(redb::Error::from)?;
        Ok(())
    }
}
