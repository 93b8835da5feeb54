//! Process-lifetime cache of the loaded dataset.
//!
//! The dataset is loaded at most once; afterwards every caller gets the same
//! read-only reference. Loading is explicit (`initialize_dataset` or
//! `get_or_load`), never implicit at first access from a view.

use once_cell::sync::OnceCell;

use crate::domain::DataSource;
use crate::error::AppError;
use crate::io::ingest::Dataset;

static DATASET: DatasetCache = DatasetCache::new();

/// The process-wide cache shared by the report command and the TUI.
pub fn global() -> &'static DatasetCache {
    &DATASET
}

/// Load the process-wide dataset from `source`, or return the one already loaded.
pub fn initialize_dataset(source: &DataSource) -> Result<&'static Dataset, AppError> {
    DATASET.get_or_load(source)
}

#[derive(Debug, Default)]
pub struct DatasetCache {
    cell: OnceCell<Dataset>,
}

impl DatasetCache {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the cached dataset, loading it from `source` on first use.
    ///
    /// Once initialized, `source` is ignored: the first successful load wins.
    /// A failed load leaves the cache empty so the caller can retry.
    pub fn get_or_load(&self, source: &DataSource) -> Result<&Dataset, AppError> {
        self.cell.get_or_try_init(|| {
            tracing::info!(?source, "loading dataset");
            crate::app::pipeline::load_source(source)
        })
    }

    pub fn get(&self) -> Option<&Dataset> {
        self.cell.get()
    }
}
