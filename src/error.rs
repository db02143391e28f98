/* src/error.rs */

use thiserror::Error;

use crate::backend::StoreError;

/// Coarse classification of an [`OptError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// I/O or store failure.
	Generic,
	/// The value's type has no store encoding.
	UnknownType,
	/// The stored type cannot be decoded into the requested type.
	WrongType,
	/// The name is absent.
	NotFound,
}

/// Errors returned by option operations.
#[derive(Debug, Error)]
pub enum OptError {
	#[error("store error: {0}")]
	Store(#[from] StoreError),

	#[error("value of option '{name}' has no store encoding")]
	UnknownType { name: String },

	#[error("wrong type for option '{name}'")]
	WrongType { name: String },

	#[error("option not found: {name}")]
	NotFound { name: String },

	#[error("write queue is closed")]
	QueueClosed,

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("parse error: {0}")]
	Parse(String),

	#[error("builder error: {0}")]
	Builder(String),
}

impl OptError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::UnknownType { .. } => ErrorKind::UnknownType,
			Self::WrongType { .. } => ErrorKind::WrongType,
			Self::NotFound { .. } | Self::Store(StoreError::NotFound) => ErrorKind::NotFound,
			Self::Store(_) | Self::QueueClosed | Self::Io(_) | Self::Parse(_) | Self::Builder(_) => {
				ErrorKind::Generic
			}
		}
	}
}

/// Result alias for option operations.
pub type OptResult<T> = Result<T, OptError>;
