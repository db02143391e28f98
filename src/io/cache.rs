/* src/io/cache.rs */

use std::collections::HashMap;
use std::ops::Deref;

use super::HandlePolicy;
use crate::backend::{Backend, StoreResult};
use crate::name::{is_store_descendant, join_store_path};

/// Open container handles keyed by path relative to the root.
///
/// At most one handle per path is held. Callers serialize access through
/// the IOHandler's mutex.
pub(crate) struct HandleCache<B: Backend> {
	handles: HashMap<String, B::Handle>,
	policy: HandlePolicy,
}

/// A container handle borrowed for one store operation.
///
/// Under [`HandlePolicy::CloseAfterUse`] the handle is closed when the lease
/// drops, on every path out of the operation.
pub(crate) struct Lease<'a, B: Backend> {
	backend: &'a B,
	handle: Option<B::Handle>,
	close_on_drop: bool,
}

impl<'a, B: Backend> Lease<'a, B> {
	fn new(backend: &'a B, handle: B::Handle, cached: bool) -> Self {
		Self {
			backend,
			handle: Some(handle),
			close_on_drop: !cached,
		}
	}
}

impl<B: Backend> Deref for Lease<'_, B> {
	type Target = B::Handle;

	fn deref(&self) -> &B::Handle {
		// Only taken in drop.
		match &self.handle {
			Some(handle) => handle,
			None => unreachable!("lease handle taken before drop"),
		}
	}
}

impl<B: Backend> Drop for Lease<'_, B> {
	fn drop(&mut self) {
		if self.close_on_drop
			&& let Some(handle) = self.handle.take()
		{
			self.backend.close(handle);
		}
	}
}

impl<B: Backend> HandleCache<B> {
	pub(crate) fn new(policy: HandlePolicy) -> Self {
		Self {
			handles: HashMap::new(),
			policy,
		}
	}

	/// Opens an existing container. Returns `Ok(None)` if it does not exist.
	pub(crate) fn open<'a>(
		&mut self,
		backend: &'a B,
		root: &str,
		path: &str,
	) -> StoreResult<Option<Lease<'a, B>>> {
		if let Some(handle) = self.handles.get(path) {
			return Ok(Some(Lease::new(backend, handle.clone(), true)));
		}
		match backend.open(&join_store_path(root, path))? {
			Some(handle) => Ok(Some(self.keep(backend, path, handle))),
			None => Ok(None),
		}
	}

	/// Opens a container, creating it if needed.
	pub(crate) fn open_or_create<'a>(
		&mut self,
		backend: &'a B,
		root: &str,
		path: &str,
	) -> StoreResult<Lease<'a, B>> {
		if let Some(handle) = self.handles.get(path) {
			return Ok(Lease::new(backend, handle.clone(), true));
		}
		let handle = backend.open_or_create(&join_store_path(root, path))?;
		Ok(self.keep(backend, path, handle))
	}

	fn keep<'a>(&mut self, backend: &'a B, path: &str, handle: B::Handle) -> Lease<'a, B> {
		tracing::debug!("Opened container '{}'", path);
		if self.policy == HandlePolicy::Cache {
			self.handles.insert(path.to_string(), handle.clone());
			Lease::new(backend, handle, true)
		} else {
			Lease::new(backend, handle, false)
		}
	}

	/// Closes and forgets every handle strictly below `path`.
	pub(crate) fn evict_descendants(&mut self, backend: &B, path: &str) {
		let stale: Vec<String> = self
			.handles
			.keys()
			.filter(|cached| is_store_descendant(cached, path))
			.cloned()
			.collect();
		for key in stale {
			if let Some(handle) = self.handles.remove(&key) {
				tracing::debug!("Evicted container '{}'", key);
				backend.close(handle);
			}
		}
	}

	/// Closes and forgets every handle.
	pub(crate) fn close_all(&mut self, backend: &B) {
		for (path, handle) in self.handles.drain() {
			tracing::debug!("Closed container '{}'", path);
			backend.close(handle);
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.handles.len()
	}
}
