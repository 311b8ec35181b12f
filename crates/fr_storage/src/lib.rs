use std::path::Path;
use std::sync::Arc;

use fr_core::{ArticleStorage, Error, Result};

pub mod backends;

pub use backends::{FileStorage, MemoryStorage};

/// Default history file used by the file backend, the equivalent of the
/// web reader's local-storage key.
pub const DEFAULT_HISTORY_FILE: &str = "freeread-articles.json";

/// Create a storage backend by name (`memory` or `file`).
pub async fn create_storage(
    kind: &str,
    data_file: Option<&Path>,
) -> Result<Arc<dyn ArticleStorage>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStorage::new())),
        "file" => {
            let path = data_file
                .map(Path::to_path_buf)
                .unwrap_or_else(|| DEFAULT_HISTORY_FILE.into());
            Ok(Arc::new(FileStorage::new(path)))
        }
        other => Err(Error::Storage(format!(
            "Unknown storage backend: {}",
            other
        ))),
    }
}
