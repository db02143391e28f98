/* src/backend/error.rs */

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	/// The container or value does not exist.
	#[error("not found")]
	NotFound,

	/// The caller's buffer is smaller than the value.
	#[error("buffer too small, {required} bytes required")]
	MoreData { required: usize },

	/// A path segment or value name the store cannot represent.
	#[error("invalid name: {0}")]
	InvalidName(String),

	/// The store cannot be reached at all.
	#[error("store unreachable: {0}")]
	Unreachable(String),

	/// IO error from the underlying storage.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
