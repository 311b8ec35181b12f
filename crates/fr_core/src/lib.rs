pub mod error;
pub mod models;
pub mod storage;

pub use error::Error;
pub use models::Article;
pub use storage::{ArticleStorage, HISTORY_LIMIT};

pub type Result<T> = std::result::Result<T, Error>;
