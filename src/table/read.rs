/* src/table/read.rs */

use std::collections::BTreeMap;
use std::sync::Arc;

#[cfg(feature = "events")]
use super::OptionEvent;
use super::{Entry, OptionsTable};
use crate::value::OptionValue;

impl OptionsTable {
	/// Gets an option value by name, or `Null` if the name is unknown.
	pub fn get(&self, name: &str) -> OptionValue {
		let snapshot = self.inner.load();
		snapshot
			.get(name)
			.map(|entry| entry.value.clone())
			.unwrap_or_default()
	}

	/// Gets the registered default of an option.
	pub fn get_default(&self, name: &str) -> Option<OptionValue> {
		let snapshot = self.inner.load();
		snapshot.get(name).map(|entry| entry.meta.default.clone())
	}

	/// Gets the full entry (value + metadata) by name.
	pub fn get_entry(&self, name: &str) -> Option<Entry> {
		let snapshot = self.inner.load();
		snapshot.get(name).cloned()
	}

	/// Returns true if the option is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.inner.load().contains_key(name)
	}

	/// Returns an atomic snapshot of all entries.
	pub fn snapshot(&self) -> Arc<BTreeMap<String, Entry>> {
		self.inner.load_full()
	}

	/// Returns all option names in order.
	pub fn keys(&self) -> Vec<String> {
		let snapshot = self.inner.load();
		snapshot.keys().cloned().collect()
	}

	/// Returns the number of options.
	pub fn len(&self) -> usize {
		self.inner.load().len()
	}

	/// Returns true if the table is empty.
	pub fn is_empty(&self) -> bool {
		self.inner.load().is_empty()
	}

	/// Subscribes to table change events.
	#[cfg(feature = "events")]
	pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<OptionEvent> {
		self.events.subscribe()
	}
}
