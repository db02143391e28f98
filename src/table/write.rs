/* src/table/write.rs */

use std::cell::RefCell;
use std::sync::atomic::Ordering;
use std::time::Instant;

#[cfg(feature = "events")]
use super::OptionEvent;
use super::{Entry, Meta, OptionsTable};
use crate::error::{OptError, OptResult};
use crate::name::is_descendant;
use crate::value::OptionValue;

impl OptionsTable {
	fn next_version(&self) -> u64 {
		self.version.fetch_add(1, Ordering::SeqCst) + 1
	}

	/// Registers an option with its default value.
	///
	/// Registering a name again replaces both its default and its value.
	pub fn add_option(&self, name: impl Into<String>, default: OptionValue) -> OptResult<()> {
		let name = name.into();
		if default.is_null() {
			return Err(OptError::UnknownType { name });
		}

		let entry = Entry {
			value: default.clone(),
			meta: Meta {
				default,
				version: self.next_version(),
				changed_at: Instant::now(),
			},
		};

		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			new_map.insert(name.clone(), entry.clone());
			new_map
		});

		#[cfg(feature = "events")]
		{
			let _ = self.events.send(OptionEvent::Added {
				name,
				value: entry.value,
			});
		}

		Ok(())
	}

	/// Sets the value of a registered option and returns the previous value.
	///
	/// The value must have the type the option was registered with.
	pub fn set(&self, name: &str, value: OptionValue) -> OptResult<OptionValue> {
		// Pre-check to avoid unnecessary clone in rcu.
		let snapshot = self.inner.load();
		let entry = snapshot.get(name).ok_or_else(|| OptError::NotFound {
			name: name.to_string(),
		})?;
		if entry.meta.default.value_type() != value.value_type() {
			return Err(OptError::WrongType {
				name: name.to_string(),
			});
		}
		drop(snapshot);

		let version = self.next_version();
		let old: RefCell<Option<OptionValue>> = RefCell::new(None);

		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			*old.borrow_mut() = new_map.get_mut(name).map(|entry| {
				entry.meta.version = version;
				entry.meta.changed_at = Instant::now();
				std::mem::replace(&mut entry.value, value.clone())
			});
			new_map
		});

		match old.into_inner() {
			Some(old) => {
				#[cfg(feature = "events")]
				if old != value {
					let _ = self.events.send(OptionEvent::Changed {
						name: name.to_string(),
						old: old.clone(),
						new: value,
					});
				}
				Ok(old)
			}
			// Entry was removed by another thread between pre-check and rcu.
			None => Err(OptError::NotFound {
				name: name.to_string(),
			}),
		}
	}

	/// Restores an option to its registered default.
	pub fn reset(&self, name: &str) -> OptResult<OptionValue> {
		let default = self.get_default(name).ok_or_else(|| OptError::NotFound {
			name: name.to_string(),
		})?;
		self.set(name, default)
	}

	/// Removes an option by name and returns its last value.
	pub fn remove(&self, name: &str) -> OptResult<OptionValue> {
		if !self.contains(name) {
			return Err(OptError::NotFound {
				name: name.to_string(),
			});
		}

		let removed: RefCell<Option<OptionValue>> = RefCell::new(None);

		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			*removed.borrow_mut() = new_map.remove(name).map(|entry| entry.value);
			new_map
		});

		match removed.into_inner() {
			Some(value) => {
				#[cfg(feature = "events")]
				{
					let _ = self.events.send(OptionEvent::Removed {
						name: name.to_string(),
						value: value.clone(),
					});
				}
				Ok(value)
			}
			None => Err(OptError::NotFound {
				name: name.to_string(),
			}),
		}
	}

	/// Removes every option strictly below `container` (`/`-delimited) and
	/// returns the removed names.
	pub fn remove_descendants(&self, container: &str) -> Vec<String> {
		let removed: RefCell<Vec<(String, OptionValue)>> = RefCell::new(Vec::new());

		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			let mut gone = Vec::new();
			new_map.retain(|name, entry| {
				if is_descendant(name, container) {
					gone.push((name.clone(), entry.value.clone()));
					false
				} else {
					true
				}
			});
			*removed.borrow_mut() = gone;
			new_map
		});

		let removed = removed.into_inner();

		#[cfg(feature = "events")]
		for (name, value) in &removed {
			let _ = self.events.send(OptionEvent::Removed {
				name: name.clone(),
				value: value.clone(),
			});
		}

		removed.into_iter().map(|(name, _)| name).collect()
	}
}
