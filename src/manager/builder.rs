/* src/manager/builder.rs */

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use super::RegOptions;
use crate::backend::Backend;
use crate::error::{OptError, OptResult};
use crate::io::{Config, IoHandler};
use crate::table::OptionsTable;

/// Builder for [`RegOptions`].
pub struct RegOptionsBuilder<B: Backend> {
	backend: Option<B>,
	root: Option<String>,
	config: Config,
	table: Option<Arc<OptionsTable>>,
	serializing: bool,
}

impl<B: Backend> RegOptionsBuilder<B> {
	pub fn new() -> Self {
		Self {
			backend: None,
			root: None,
			config: Config::default(),
			table: None,
			serializing: true,
		}
	}

	pub fn backend(mut self, backend: B) -> Self {
		self.backend = Some(backend);
		self
	}

	/// Root path of all option containers, e.g. `Vendor\App`.
	pub fn root(mut self, root: impl Into<String>) -> Self {
		self.root = Some(root.into());
		self
	}

	pub fn config(mut self, config: Config) -> Self {
		self.config = config;
		self
	}

	/// Shares an existing table instead of creating a new one.
	pub fn table(mut self, table: Arc<OptionsTable>) -> Self {
		self.table = Some(table);
		self
	}

	pub fn serializing(mut self, serializing: bool) -> Self {
		self.serializing = serializing;
		self
	}

	pub fn build(self) -> OptResult<RegOptions<B>> {
		let backend = self
			.backend
			.ok_or_else(|| OptError::Builder("backend is required".to_string()))?;
		let root = self
			.root
			.ok_or_else(|| OptError::Builder("root is required".to_string()))?;

		let io = IoHandler::with_config(backend, &root, self.config)?;
		tracing::info!("Options rooted at '{}'", io.root());

		Ok(RegOptions {
			table: self.table.unwrap_or_default(),
			io,
			serializing: AtomicBool::new(self.serializing),
		})
	}
}

impl<B: Backend> Default for RegOptionsBuilder<B> {
	fn default() -> Self {
		Self::new()
	}
}
