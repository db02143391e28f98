/* src/value.rs */

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Declared type of an option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueType {
	Null,
	String,
	Int,
	Bool,
}

/// A scalar option value.
///
/// `Null` marks "no value" and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptionValue {
	#[default]
	Null,
	String(String),
	Int(i32),
	Bool(bool),
}

impl OptionValue {
	pub fn value_type(&self) -> ValueType {
		match self {
			Self::Null => ValueType::Null,
			Self::String(_) => ValueType::String,
			Self::Int(_) => ValueType::Int,
			Self::Bool(_) => ValueType::Bool,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i32> {
		match self {
			Self::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}
}

impl fmt::Display for OptionValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => Ok(()),
			Self::String(s) => f.write_str(s),
			Self::Int(i) => write!(f, "{i}"),
			Self::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
		}
	}
}

impl From<String> for OptionValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<&str> for OptionValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<i32> for OptionValue {
	fn from(value: i32) -> Self {
		Self::Int(value)
	}
}

impl From<bool> for OptionValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
