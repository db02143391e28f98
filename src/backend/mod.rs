/* src/backend/mod.rs */

//!
//! Adapters over hierarchical key-value stores.
//!
//! A store is a tree of containers addressed by `\`-separated paths. Each
//! container holds named scalar values and child containers.
//!
//! - [`MemoryBackend`] - Shared in-memory tree
//! - [`FileBackend`] - Directory tree on disk (feature `fs`)

mod codec;
mod error;
mod memory;

#[cfg(feature = "fs")]
mod file;

pub use codec::RawValue;
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryBackend, MemoryHandle};

#[cfg(feature = "fs")]
pub use file::{FileBackend, FileHandle};

/// Store-level encoding of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
	/// NUL-terminated text.
	Text,
	/// Fixed-width 4-byte little-endian integer.
	Dword,
	/// Opaque bytes this crate never produces.
	Binary,
}

/// Lazy sequence of `(value name, raw value)` pairs in one container.
pub type ValueIter<'a> = Box<dyn Iterator<Item = StoreResult<(String, RawValue)>> + Send + 'a>;

/// Lazy sequence of child container names in one container.
pub type ChildIter<'a> = Box<dyn Iterator<Item = StoreResult<String>> + Send + 'a>;

/// Outcome of a raw read.
#[derive(Debug)]
pub enum ReadResult {
	/// The value exists.
	Found(RawValue),
	/// The container or the value does not exist.
	NotFound,
	/// The store failed.
	Failed(StoreError),
}

/// Operations over a hierarchical store.
///
/// Paths are full store paths (`Software\App\Settings`). Handles are cheap to
/// clone; a clone refers to the same open container.
pub trait Backend: Send + Sync + 'static {
	/// An open container.
	type Handle: Clone + Send + 'static;

	/// Opens an existing container. Returns `Ok(None)` if it does not exist.
	fn open(&self, path: &str) -> StoreResult<Option<Self::Handle>>;

	/// Opens a container, creating it and any missing parents.
	fn open_or_create(&self, path: &str) -> StoreResult<Self::Handle>;

	/// Releases a handle.
	fn close(&self, handle: Self::Handle) {
		drop(handle);
	}

	/// Copies a value into `buf`, returning its kind and length.
	///
	/// Returns [`StoreError::MoreData`] with the required size when `buf` is
	/// too small, and [`StoreError::NotFound`] when the value is absent.
	fn get_scalar(
		&self,
		handle: &Self::Handle,
		name: &str,
		buf: &mut [u8],
	) -> StoreResult<(ScalarKind, usize)>;

	/// Writes a value, replacing any previous one.
	fn set_scalar(
		&self,
		handle: &Self::Handle,
		name: &str,
		kind: ScalarKind,
		data: &[u8],
	) -> StoreResult<()>;

	/// Deletes a single value.
	fn delete_value(&self, handle: &Self::Handle, name: &str) -> StoreResult<()>;

	/// Deletes every value and child container below `handle`. The container
	/// itself stays.
	fn delete_subtree(&self, handle: &Self::Handle) -> StoreResult<()>;

	/// Enumerates the values of a container.
	fn values(&self, handle: &Self::Handle) -> StoreResult<ValueIter<'_>>;

	/// Enumerates the child containers of a container.
	fn children(&self, handle: &Self::Handle) -> StoreResult<ChildIter<'_>>;
}
