/* src/table/file.rs */

use super::OptionsTable;
use crate::transfer::{OptionsFile, TypeTag};
use crate::value::OptionValue;

/// How known options are rendered on export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStyle {
	/// Write integer options whose name mentions `color` as 8-digit hex.
	pub hex_colors: bool,
}

impl OptionsTable {
	/// Writes every registered option into `file`.
	pub fn export_into(&self, file: &mut OptionsFile, style: ExportStyle) {
		for (name, entry) in self.snapshot().iter() {
			let Some(tag) = TypeTag::of(&entry.value) else {
				continue;
			};
			let text = match &entry.value {
				OptionValue::Int(i) if style.hex_colors && is_color(name) => format!("0x{:08x}", *i as u32),
				value => value.to_string(),
			};
			file.insert(name.clone(), text, tag);
		}
	}

	/// Sets every registered option found in `file`, reading the text as the
	/// option's registered type. Returns the names whose value changed.
	pub fn import_from(&self, file: &OptionsFile) -> Vec<String> {
		let mut changed = Vec::new();
		for (name, text) in file.values() {
			let Some(entry) = self.get_entry(name) else {
				continue;
			};
			let Some(tag) = TypeTag::of(&entry.meta.default) else {
				continue;
			};
			let value = tag.decode(text);
			if value == entry.value {
				continue;
			}
			match self.set(name, value) {
				Ok(_) => changed.push(name.to_string()),
				Err(e) => tracing::warn!("Skipping import of '{}': {}", name, e),
			}
		}
		changed
	}
}

fn is_color(name: &str) -> bool {
	name.to_ascii_lowercase().contains("color")
}
