/* src/backend/memory.rs */

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Backend, ChildIter, RawValue, ScalarKind, StoreError, StoreResult, ValueIter};
use crate::name::STORE_SEPARATOR;

type NodeRef = Arc<Mutex<Node>>;

#[derive(Debug, Default)]
struct Node {
	values: BTreeMap<String, RawValue>,
	children: BTreeMap<String, NodeRef>,
}

/// An in-memory store, useful for testing and for processes without a
/// durable store.
///
/// Clones share the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
	root: NodeRef,
}

/// Handle to a container of a [`MemoryBackend`].
#[derive(Debug, Clone)]
pub struct MemoryHandle(NodeRef);

impl MemoryBackend {
	/// Creates a new empty store.
	pub fn new() -> Self {
		Self::default()
	}
}

fn lock(node: &NodeRef) -> MutexGuard<'_, Node> {
	node.lock().unwrap_or_else(PoisonError::into_inner)
}

fn segments(path: &str) -> StoreResult<Vec<&str>> {
	if path.is_empty() {
		return Ok(Vec::new());
	}
	path.split(STORE_SEPARATOR)
		.map(|segment| {
			if segment.is_empty() {
				Err(StoreError::InvalidName(path.to_string()))
			} else {
				Ok(segment)
			}
		})
		.collect()
}

impl Backend for MemoryBackend {
	type Handle = MemoryHandle;

	fn open(&self, path: &str) -> StoreResult<Option<MemoryHandle>> {
		let mut node = Arc::clone(&self.root);
		for segment in segments(path)? {
			let child = lock(&node).children.get(segment).cloned();
			match child {
				Some(child) => node = child,
				None => return Ok(None),
			}
		}
		Ok(Some(MemoryHandle(node)))
	}

	fn open_or_create(&self, path: &str) -> StoreResult<MemoryHandle> {
		let mut node = Arc::clone(&self.root);
		for segment in segments(path)? {
			let child = Arc::clone(lock(&node).children.entry(segment.to_string()).or_default());
			node = child;
		}
		Ok(MemoryHandle(node))
	}

	fn get_scalar(
		&self,
		handle: &MemoryHandle,
		name: &str,
		buf: &mut [u8],
	) -> StoreResult<(ScalarKind, usize)> {
		let node = lock(&handle.0);
		let raw = node.values.get(name).ok_or(StoreError::NotFound)?;
		if buf.len() < raw.data.len() {
			return Err(StoreError::MoreData {
				required: raw.data.len(),
			});
		}
		buf[..raw.data.len()].copy_from_slice(&raw.data);
		Ok((raw.kind, raw.data.len()))
	}

	fn set_scalar(
		&self,
		handle: &MemoryHandle,
		name: &str,
		kind: ScalarKind,
		data: &[u8],
	) -> StoreResult<()> {
		if name.is_empty() {
			return Err(StoreError::InvalidName("empty value name".to_string()));
		}
		lock(&handle.0)
			.values
			.insert(name.to_string(), RawValue::new(kind, data.to_vec()));
		Ok(())
	}

	fn delete_value(&self, handle: &MemoryHandle, name: &str) -> StoreResult<()> {
		lock(&handle.0)
			.values
			.remove(name)
			.map(|_| ())
			.ok_or(StoreError::NotFound)
	}

	fn delete_subtree(&self, handle: &MemoryHandle) -> StoreResult<()> {
		let mut node = lock(&handle.0);
		node.values.clear();
		node.children.clear();
		Ok(())
	}

	fn values(&self, handle: &MemoryHandle) -> StoreResult<ValueIter<'_>> {
		let entries: Vec<_> = lock(&handle.0)
			.values
			.iter()
			.map(|(name, raw)| (name.clone(), raw.clone()))
			.collect();
		Ok(Box::new(entries.into_iter().map(Ok)))
	}

	fn children(&self, handle: &MemoryHandle) -> StoreResult<ChildIter<'_>> {
		let names: Vec<String> = lock(&handle.0).children.keys().cloned().collect();
		Ok(Box::new(names.into_iter().map(Ok)))
	}
}
