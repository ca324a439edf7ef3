use super::{DataSourceError, DatasetSchema, Table};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Read-through cache around the dataset file.
///
/// The source is static for the life of the process, so the first successful
/// load is kept and handed out as a shared [`Arc<Table>`]. Failed loads are not
/// remembered; the next call tries the file again.
pub struct DatasetCache {
    path: PathBuf,
    schema: DatasetSchema,
    table: Mutex<Option<Arc<Table>>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>, schema: DatasetSchema) -> Self {
        Self {
            path: path.into(),
            schema,
            table: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<Arc<Table>, DataSourceError> {
        let mut guard = self.table.lock().expect("dataset cache mutex poisoned");
        if let Some(table) = guard.as_ref() {
            debug!(path = %self.path.display(), "dataset served from cache");
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(Table::from_path(&self.path, &self.schema)?);
        *guard = Some(Arc::clone(&table));
        Ok(table)
    }

    pub fn is_loaded(&self) -> bool {
        self.table
            .lock()
            .expect("dataset cache mutex poisoned")
            .is_some()
    }
}
