/* src/io/mod.rs */

//!
//! Coordination between callers and the backing store.
//!
//! Reads, removals and bulk transfers run on the caller's thread. Writes are
//! queued to a dedicated persistence thread and applied in order.

mod cache;
mod pending;
mod transfer;
mod worker;

use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, RawValue, ReadResult, StoreError};
use crate::error::{OptError, OptResult};
use crate::name::{normalize_root, split_name};
use crate::value::OptionValue;

use cache::HandleCache;
use pending::Pending;
use worker::{Message, PendingWrite};

/// What happens to a container handle after each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HandlePolicy {
	/// Keep handles open and reuse them until `close_all`.
	#[default]
	Cache,
	/// Close each handle when the operation that opened it ends.
	CloseAfterUse,
}

/// Configuration for the IOHandler.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
	/// Handle reuse policy.
	pub handle_policy: HandlePolicy,

	/// Initial size of the buffer used by reads. Grown on demand.
	pub read_buffer: usize,

	/// Poll interval while waiting for the persistence thread to exit.
	pub shutdown_poll: Duration,

	/// Name of the persistence thread.
	pub thread_name: String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			handle_policy: HandlePolicy::default(),
			read_buffer: 256,
			shutdown_poll: Duration::from_millis(1),
			thread_name: "regopts-writer".to_string(),
		}
	}
}

/// State shared with the persistence thread.
pub(crate) struct Shared<B: Backend> {
	pub(crate) backend: B,
	pub(crate) root: String,
	pub(crate) config: Config,
	pub(crate) cache: Mutex<HandleCache<B>>,
	pub(crate) pending: Pending,
}

impl<B: Backend> Shared<B> {
	pub(crate) fn lock_cache(&self) -> MutexGuard<'_, HandleCache<B>> {
		self.cache.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Writes one value, creating its container if needed.
	pub(crate) fn apply(&self, name: &str, value: &OptionValue) -> OptResult<()> {
		let raw = RawValue::encode(value).ok_or_else(|| OptError::UnknownType {
			name: name.to_string(),
		})?;
		let path = split_name(name);

		let mut cache = self.lock_cache();
		let lease = cache.open_or_create(&self.backend, &self.root, &path.store_path())?;
		self.backend
			.set_scalar(&lease, path.value, raw.kind, &raw.data)?;
		Ok(())
	}
}

/// Single coordination point between callers and the backing store.
///
/// Owns the persistence thread for its whole lifetime. Dropping the handler
/// drains the write queue, stops the thread and closes cached handles.
pub struct IoHandler<B: Backend> {
	shared: Arc<Shared<B>>,
	sender: mpsc::Sender<Message>,
	worker: Option<JoinHandle<()>>,
}

impl<B: Backend> IoHandler<B> {
	/// Starts a handler with default configuration.
	pub fn new(backend: B, root: &str) -> OptResult<Self> {
		Self::with_config(backend, root, Config::default())
	}

	/// Starts a handler rooted at `root`, creating the root container when
	/// it does not exist yet.
	///
	/// Fails only when the store cannot be reached.
	pub fn with_config(backend: B, root: &str, config: Config) -> OptResult<Self> {
		let shared = Arc::new(Shared {
			backend,
			root: normalize_root(root),
			cache: Mutex::new(HandleCache::new(config.handle_policy)),
			config,
			pending: Pending::default(),
		});

		let (sender, worker) = worker::spawn(Arc::clone(&shared))?;
		let handler = Self {
			shared,
			sender,
			worker: Some(worker),
		};
		handler.ensure_root()?;
		Ok(handler)
	}

	fn ensure_root(&self) -> OptResult<()> {
		let backend = &self.shared.backend;
		let root = &self.shared.root;
		match backend.open(root)? {
			Some(handle) => backend.close(handle),
			None => {
				let handle = backend.open_or_create(root)?;
				tracing::info!("Created root container '{}'", root);
				backend.close(handle);
			}
		}
		Ok(())
	}

	/// The normalized root path.
	pub fn root(&self) -> &str {
		&self.shared.root
	}

	pub fn config(&self) -> &Config {
		&self.shared.config
	}

	/// Number of writes queued or in flight.
	pub fn pending_writes(&self) -> usize {
		self.shared.pending.get()
	}

	/// Number of cached container handles.
	pub fn cached_handles(&self) -> usize {
		self.shared.lock_cache().len()
	}

	/// Reads a raw value. Never creates containers.
	pub fn read(&self, name: &str) -> ReadResult {
		let path = split_name(name);
		let backend = &self.shared.backend;

		let mut cache = self.shared.lock_cache();
		let lease = match cache.open(backend, &self.shared.root, &path.store_path()) {
			Ok(Some(lease)) => lease,
			Ok(None) => return ReadResult::NotFound,
			Err(e) => return ReadResult::Failed(e),
		};

		let mut buf = vec![0u8; self.shared.config.read_buffer.max(1)];
		let result = match backend.get_scalar(&lease, path.value, &mut buf) {
			Err(StoreError::MoreData { required }) => {
				buf.resize(required, 0);
				backend.get_scalar(&lease, path.value, &mut buf)
			}
			other => other,
		};

		match result {
			Ok((kind, len)) => {
				buf.truncate(len);
				ReadResult::Found(RawValue::new(kind, buf))
			}
			Err(StoreError::NotFound) => ReadResult::NotFound,
			Err(e) => ReadResult::Failed(e),
		}
	}

	/// Queues a value for persistence without waiting for I/O.
	///
	/// Fails with [`OptError::QueueClosed`] if the persistence thread is gone;
	/// the write is then dropped.
	pub fn write_async(&self, name: impl Into<String>, value: OptionValue) -> OptResult<()> {
		let name = name.into();
		if value.is_null() {
			return Err(OptError::UnknownType { name });
		}

		tracing::debug!("Queued option '{}'", name);
		self.shared.pending.begin();
		if self
			.sender
			.send(Message::Write(PendingWrite { name, value }))
			.is_err()
		{
			self.shared.pending.finish();
			return Err(OptError::QueueClosed);
		}
		Ok(())
	}

	/// Deletes a value, or a whole subtree when the name ends in `/`.
	///
	/// Waits for the write queue to drain first so a queued write cannot
	/// recreate what was just deleted.
	pub fn remove(&self, name: &str) -> OptResult<()> {
		self.flush();

		let path = split_name(name);
		let store_path = path.store_path();
		let backend = &self.shared.backend;

		let mut cache = self.shared.lock_cache();
		let lease = cache.open_or_create(backend, &self.shared.root, &store_path)?;
		if path.is_container() {
			backend.delete_subtree(&lease)?;
			drop(lease);
			cache.evict_descendants(backend, &store_path);
			tracing::debug!("Deleted subtree '{}'", store_path);
		} else {
			match backend.delete_value(&lease, path.value) {
				Ok(()) | Err(StoreError::NotFound) => {}
				Err(e) => return Err(e.into()),
			}
		}
		Ok(())
	}

	/// Blocks until every write queued before the call has been applied.
	pub fn flush(&self) {
		self.shared.pending.wait();
	}

	/// Closes every cached container handle.
	pub fn close_all(&self) {
		self.shared.lock_cache().close_all(&self.shared.backend);
	}
}

impl<B: Backend> Drop for IoHandler<B> {
	fn drop(&mut self) {
		// Queued writes ahead of the stop message are still applied.
		let _ = self.sender.send(Message::Shutdown);
		if let Some(worker) = self.worker.take() {
			while !worker.is_finished() {
				thread::sleep(self.shared.config.shutdown_poll);
			}
			if worker.join().is_err() {
				tracing::error!("Persistence thread panicked");
			}
		}
		self.close_all();
		tracing::info!("Closed option store '{}'", self.shared.root);
	}
}

impl<B: Backend> std::fmt::Debug for IoHandler<B> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("IoHandler")
			.field("root", &self.shared.root)
			.field("config", &self.shared.config)
			.field("pending", &self.shared.pending.get())
			.finish_non_exhaustive()
	}
}
