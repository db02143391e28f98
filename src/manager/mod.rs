/* src/manager/mod.rs */

//!
//! Store-backed options manager.
//!
//! - [`RegOptions`] - Option table kept in sync with a backing store
//! - [`RegOptionsBuilder`] - Builder for [`RegOptions`]

mod builder;

pub use builder::RegOptionsBuilder;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::backend::{Backend, ReadResult};
use crate::error::{OptError, OptResult};
use crate::io::IoHandler;
use crate::name::split_name;
use crate::table::{ExportStyle, OptionsTable};
use crate::transfer::OptionsFile;
use crate::value::OptionValue;

/// An option table whose values persist into a backing store.
///
/// Reads come from memory. Saves update memory and are written to the store
/// in the background; call [`flush_options`](Self::flush_options) to wait
/// for them.
pub struct RegOptions<B: Backend> {
	table: Arc<OptionsTable>,
	io: IoHandler<B>,
	serializing: AtomicBool,
}

impl<B: Backend> RegOptions<B> {
	pub fn builder() -> RegOptionsBuilder<B> {
		RegOptionsBuilder::new()
	}

	/// Creates a manager with a fresh table and default configuration.
	pub fn new(backend: B, root: &str) -> OptResult<Self> {
		Self::builder().backend(backend).root(root).build()
	}

	/// The in-memory table.
	pub fn table(&self) -> &Arc<OptionsTable> {
		&self.table
	}

	/// The underlying IOHandler.
	pub fn io(&self) -> &IoHandler<B> {
		&self.io
	}

	/// Returns true if options are loaded from and saved to the store.
	pub fn is_serializing(&self) -> bool {
		self.serializing.load(Ordering::Acquire)
	}

	/// Turns store loading and saving on or off.
	pub fn set_serializing(&self, serializing: bool) {
		self.serializing.store(serializing, Ordering::Release);
	}

	/// Gets an option value, or `Null` if unknown.
	pub fn get(&self, name: &str) -> OptionValue {
		self.table.get(name)
	}

	/// Sets an option in memory only.
	pub fn set(&self, name: &str, value: impl Into<OptionValue>) -> OptResult<()> {
		self.table.set(name, value.into()).map(|_| ())
	}

	/// Registers an option and loads its stored value.
	///
	/// When the store holds a value of a compatible type it replaces the
	/// default. When it holds nothing, the default is queued for saving.
	pub fn init_option(&self, name: &str, default: impl Into<OptionValue>) -> OptResult<()> {
		let default = default.into();
		if default.is_null() {
			return Err(OptError::UnknownType {
				name: name.to_string(),
			});
		}

		self.table.add_option(name, default.clone())?;
		if !self.is_serializing() {
			return Ok(());
		}

		match self.io.read(name) {
			ReadResult::Found(raw) => {
				let value = raw
					.decode(default.value_type())
					.ok_or_else(|| OptError::WrongType {
						name: name.to_string(),
					})?;
				self.table.set(name, value)?;
				Ok(())
			}
			ReadResult::NotFound => self.io.write_async(name, default),
			ReadResult::Failed(e) => Err(e.into()),
		}
	}

	/// Registers an option that never touches the store.
	pub fn init_transient(&self, name: &str, default: impl Into<OptionValue>) -> OptResult<()> {
		self.table.add_option(name, default.into())
	}

	/// Queues the current value of an option for saving.
	pub fn save_option(&self, name: &str) -> OptResult<()> {
		if !self.is_serializing() {
			return Ok(());
		}
		let value = self.table.get(name);
		if value.is_null() {
			return Err(OptError::NotFound {
				name: name.to_string(),
			});
		}
		self.io.write_async(name, value)
	}

	/// Sets an option and queues it for saving.
	pub fn save_value(&self, name: &str, value: impl Into<OptionValue>) -> OptResult<()> {
		self.table.set(name, value.into())?;
		self.save_option(name)
	}

	/// Removes an option, or every option below a container when the name
	/// ends in `/`, from memory and from the store.
	///
	/// The store is cleaned even when the name is not registered; the
	/// in-memory result is returned after that.
	pub fn remove_option(&self, name: &str) -> OptResult<()> {
		let path = split_name(name);
		let result = if path.is_container() {
			let removed = self.table.remove_descendants(path.container);
			tracing::debug!("Removed {} options below '{}'", removed.len(), path.container);
			Ok(())
		} else {
			self.table.remove(name).map(|_| ())
		};

		self.io.remove(name)?;
		result
	}

	/// Blocks until every queued save has reached the store.
	pub fn flush_options(&self) {
		self.io.flush();
	}

	/// Releases cached store handles.
	pub fn close_keys(&self) {
		self.io.close_all();
	}

	/// Exports every option to `path`, replacing any existing file.
	///
	/// The file holds the stored values the table does not know plus every
	/// value the table does know, so registered options appear even when the
	/// store has no copy of them. Nothing is written when the store walk
	/// fails.
	pub fn export_options(&self, path: impl AsRef<Path>) -> OptResult<()> {
		self.export_options_with(path, ExportStyle::default())
	}

	pub fn export_options_with(&self, path: impl AsRef<Path>, style: ExportStyle) -> OptResult<()> {
		let mut file = OptionsFile::new();
		self.io.export_unknown(&self.table, &mut file)?;
		self.table.export_into(&mut file, style);
		file.save(path)
	}

	/// Imports options from `path`: unknown typed values go straight to the
	/// store, known options are set in memory and queued for saving.
	///
	/// Only a file that cannot be read or parsed fails the import. Keys the
	/// store rejects are skipped.
	pub fn import_options(&self, path: impl AsRef<Path>) -> OptResult<()> {
		let file = OptionsFile::load(path)?;
		self.io.import_unknown(&self.table, &file)?;
		for name in self.table.import_from(&file) {
			self.save_option(&name)?;
		}
		Ok(())
	}
}

impl<B: Backend> std::fmt::Debug for RegOptions<B> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RegOptions")
			.field("table", &self.table)
			.field("io", &self.io)
			.field("serializing", &self.is_serializing())
			.finish()
	}
}
