/* src/transfer/mod.rs */

//!
//! Flat option files used for bulk import and export.
//!
//! The file is TOML with two tables keyed by full option name:
//!
//! ```toml
//! [values]
//! "Settings/ShowToolbar" = "1"
//!
//! [type-info]
//! "Settings/ShowToolbar" = "bool"
//! ```
//!
//! Values are kept as text and re-typed on import from `type-info`.

mod parse;

pub use parse::{parse_bool, parse_int};

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use toml::{Table, Value};

use crate::error::{OptError, OptResult};
use crate::value::OptionValue;

/// Name of the table holding values.
pub const VALUES_SECTION: &str = "values";

/// Name of the table holding type tags.
pub const TYPE_INFO_SECTION: &str = "type-info";

/// Type tag recorded for each exported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
	Bool,
	Int,
	String,
}

impl TypeTag {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::Int => "int",
			Self::String => "string",
		}
	}

	/// Parses a tag, ignoring ASCII case.
	pub fn parse(tag: &str) -> Option<Self> {
		[Self::Bool, Self::Int, Self::String]
			.into_iter()
			.find(|t| t.as_str().eq_ignore_ascii_case(tag.trim()))
	}

	/// Tag matching an in-memory value.
	pub fn of(value: &OptionValue) -> Option<Self> {
		match value {
			OptionValue::Null => None,
			OptionValue::String(_) => Some(Self::String),
			OptionValue::Int(_) => Some(Self::Int),
			OptionValue::Bool(_) => Some(Self::Bool),
		}
	}

	/// Re-derives a typed value from its text.
	pub fn decode(&self, text: &str) -> OptionValue {
		match self {
			Self::Bool => OptionValue::Bool(parse_bool(text)),
			Self::Int => OptionValue::Int(parse_int(text)),
			Self::String => OptionValue::String(text.to_string()),
		}
	}
}

impl fmt::Display for TypeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// In-memory form of an option file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsFile {
	values: BTreeMap<String, String>,
	types: BTreeMap<String, TypeTag>,
}

impl OptionsFile {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a value and its type tag, replacing any previous record.
	pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>, tag: TypeTag) {
		let name = name.into();
		self.values.insert(name.clone(), text.into());
		self.types.insert(name, tag);
	}

	/// Records a value without a type tag.
	pub fn insert_untyped(&mut self, name: impl Into<String>, text: impl Into<String>) {
		self.values.insert(name.into(), text.into());
	}

	pub fn value(&self, name: &str) -> Option<&str> {
		self.values.get(name).map(String::as_str)
	}

	pub fn type_of(&self, name: &str) -> Option<TypeTag> {
		self.types.get(name).copied()
	}

	/// All values in name order.
	pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// All type tags in name order.
	pub fn type_info(&self) -> impl Iterator<Item = (&str, TypeTag)> {
		self.types.iter().map(|(k, t)| (k.as_str(), *t))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Parses file contents.
	///
	/// Native TOML integers and booleans in `values` are accepted and turned
	/// into text. Unknown type tags are dropped.
	pub fn parse(text: &str) -> OptResult<Self> {
		let doc: Table = toml::from_str(text).map_err(|e| OptError::Parse(e.to_string()))?;
		let mut file = Self::new();

		if let Some(values) = section(&doc, VALUES_SECTION)? {
			for (name, value) in values {
				let text = match value {
					Value::String(s) => s.clone(),
					Value::Integer(i) => i.to_string(),
					Value::Boolean(b) => (if *b { "1" } else { "0" }).to_string(),
					other => {
						tracing::warn!("Skipping '{}': unsupported value {}", name, other.type_str());
						continue;
					}
				};
				file.values.insert(name.clone(), text);
			}
		}

		if let Some(types) = section(&doc, TYPE_INFO_SECTION)? {
			for (name, tag) in types {
				match tag.as_str().and_then(TypeTag::parse) {
					Some(tag) => {
						file.types.insert(name.clone(), tag);
					}
					None => tracing::warn!("Skipping '{}': unknown type tag {}", name, tag),
				}
			}
		}

		Ok(file)
	}

	/// Renders file contents.
	pub fn to_toml_string(&self) -> OptResult<String> {
		let values: Table = self
			.values
			.iter()
			.map(|(k, v)| (k.clone(), Value::String(v.clone())))
			.collect();
		let types: Table = self
			.types
			.iter()
			.map(|(k, t)| (k.clone(), Value::String(t.as_str().to_string())))
			.collect();

		let mut doc = Table::new();
		doc.insert(VALUES_SECTION.to_string(), Value::Table(values));
		doc.insert(TYPE_INFO_SECTION.to_string(), Value::Table(types));
		toml::to_string(&doc).map_err(|e| OptError::Parse(e.to_string()))
	}

	/// Reads and parses a file.
	pub fn load(path: impl AsRef<Path>) -> OptResult<Self> {
		let text = std::fs::read_to_string(path)?;
		Self::parse(&text)
	}

	/// Writes the file, replacing any existing one.
	pub fn save(&self, path: impl AsRef<Path>) -> OptResult<()> {
		std::fs::write(path, self.to_toml_string()?)?;
		Ok(())
	}
}

fn section<'a>(doc: &'a Table, name: &str) -> OptResult<Option<&'a Table>> {
	match doc.get(name) {
		None => Ok(None),
		Some(Value::Table(table)) => Ok(Some(table)),
		Some(_) => Err(OptError::Parse(format!("'{}' is not a table", name))),
	}
}
