/* src/table/mod.rs */

//!
//! In-memory option table.
//!
//! Reads are lock-free snapshots; writes swap in a new map (RCU).

mod entry;
#[cfg(feature = "events")]
mod event;
mod file;
mod read;
mod write;

pub use entry::{Entry, Meta};
#[cfg(feature = "events")]
pub use event::OptionEvent;
pub use file::ExportStyle;

use std::collections::BTreeMap;
use std::sync::atomic::AtomicU64;

use arc_swap::ArcSwap;

/// Default event channel capacity.
#[cfg(feature = "events")]
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Thread-safe table of named, typed option values.
///
/// An option's type is fixed by the default it was registered with.
pub struct OptionsTable {
	pub(crate) inner: ArcSwap<BTreeMap<String, Entry>>,
	pub(crate) version: AtomicU64,
	#[cfg(feature = "events")]
	pub(crate) events: tokio::sync::broadcast::Sender<OptionEvent>,
}

impl OptionsTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self {
			inner: ArcSwap::default(),
			version: AtomicU64::new(0),
			#[cfg(feature = "events")]
			events: tokio::sync::broadcast::channel(DEFAULT_EVENT_CAPACITY).0,
		}
	}

	/// Creates an empty table whose event channel holds `capacity` events.
	///
	/// A subscriber more than `capacity` events behind skips ahead and gets
	/// `RecvError::Lagged` once.
	#[cfg(feature = "events")]
	pub fn with_event_capacity(capacity: usize) -> Self {
		let (events, _) = tokio::sync::broadcast::channel(capacity);
		Self {
			events,
			..Self::new()
		}
	}
}

impl Default for OptionsTable {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for OptionsTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("OptionsTable")
			.field("len", &self.len())
			.finish_non_exhaustive()
	}
}
