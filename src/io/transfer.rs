/* src/io/transfer.rs */

use super::IoHandler;
use crate::backend::{Backend, RawValue, ScalarKind, StoreError};
use crate::error::OptResult;
use crate::name::{join_name, join_store_path, split_name};
use crate::table::OptionsTable;
use crate::transfer::{OptionsFile, TypeTag};

impl<B: Backend> IoHandler<B> {
	/// Copies every stored value the table does not know into `file`.
	///
	/// Walks the store depth-first from the root. Text values export as
	/// `string`, integers as `int`; other encodings are skipped. Any
	/// enumeration error aborts the export. Returns the number of values
	/// written.
	pub fn export_unknown(&self, table: &OptionsTable, file: &mut OptionsFile) -> OptResult<usize> {
		let backend = &self.shared.backend;
		let root = &self.shared.root;

		// Serialize with every other store operation.
		let _cache = self.shared.lock_cache();
		let handle = backend.open(root)?.ok_or(StoreError::NotFound)?;

		let mut walk = Walk {
			backend,
			table,
			file,
			exported: 0,
		};
		let result = walk.container(&handle, root, "");
		backend.close(handle);
		result?;

		tracing::info!("Exported {} unregistered values from '{}'", walk.exported, root);
		Ok(walk.exported)
	}

	/// Writes every typed value of `file` the table does not know into the
	/// store, synchronously. Keys without a type tag are skipped, and so are
	/// keys the store rejects. Returns the number of values written.
	pub fn import_unknown(&self, table: &OptionsTable, file: &OptionsFile) -> OptResult<usize> {
		let backend = &self.shared.backend;
		let mut imported = 0;

		let mut cache = self.shared.lock_cache();
		for (name, text) in file.values() {
			if table.contains(name) {
				continue;
			}
			let Some(tag) = file.type_of(name) else {
				tracing::debug!("Skipping '{}': no type tag", name);
				continue;
			};
			let path = split_name(name);
			if path.is_container() {
				tracing::warn!("Skipping '{}': no value name", name);
				continue;
			}
			let Some(raw) = RawValue::encode(&tag.decode(text)) else {
				continue;
			};

			let written = cache
				.open_or_create(backend, &self.shared.root, &path.store_path())
				.and_then(|lease| backend.set_scalar(&lease, path.value, raw.kind, &raw.data));
			match written {
				Ok(()) => imported += 1,
				Err(e) => tracing::warn!("Skipping '{}': {}", name, e),
			}
		}

		tracing::info!("Imported {} unregistered values into '{}'", imported, self.shared.root);
		Ok(imported)
	}
}

struct Walk<'a, B: Backend> {
	backend: &'a B,
	table: &'a OptionsTable,
	file: &'a mut OptionsFile,
	exported: usize,
}

impl<B: Backend> Walk<'_, B> {
	fn container(&mut self, handle: &B::Handle, path: &str, prefix: &str) -> OptResult<()> {
		let backend = self.backend;
		for item in backend.values(handle)? {
			let (value_name, raw) = item?;
			let name = join_name(prefix, &value_name);
			if self.table.contains(&name) {
				continue;
			}
			let record = match raw.kind {
				ScalarKind::Dword => raw.as_dword().map(|i| (i.to_string(), TypeTag::Int)),
				ScalarKind::Text => raw.as_text().map(|s| (s, TypeTag::String)),
				ScalarKind::Binary => None,
			};
			if let Some((text, tag)) = record {
				self.file.insert(name, text, tag);
				self.exported += 1;
			}
		}

		for child in backend.children(handle)? {
			let child = child?;
			let child_path = join_store_path(path, &child);
			let Some(child_handle) = backend.open(&child_path)? else {
				tracing::warn!("Container '{}' vanished during export", child_path);
				continue;
			};
			let result = self.container(&child_handle, &child_path, &join_name(prefix, &child));
			backend.close(child_handle);
			result?;
		}
		Ok(())
	}
}
