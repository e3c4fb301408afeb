mod error;
mod keys;
mod traits;

pub use error::{CacheError, Result};
pub use keys::record_key;
pub use traits::Cache;
