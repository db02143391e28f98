/* src/backend/codec.rs */

use super::ScalarKind;
use crate::value::{OptionValue, ValueType};

const DWORD_LEN: usize = 4;

/// A value as the store holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
	pub kind: ScalarKind,
	pub data: Vec<u8>,
}

impl RawValue {
	pub fn new(kind: ScalarKind, data: Vec<u8>) -> Self {
		Self { kind, data }
	}

	/// Encodes an option value. Returns `None` for `Null`.
	///
	/// Strings become NUL-terminated text (an empty string is a lone NUL),
	/// ints and bools become 4-byte integers.
	pub fn encode(value: &OptionValue) -> Option<Self> {
		match value {
			OptionValue::Null => None,
			OptionValue::String(s) => {
				let mut data = Vec::with_capacity(s.len() + 1);
				data.extend_from_slice(s.as_bytes());
				data.push(0);
				Some(Self::new(ScalarKind::Text, data))
			}
			OptionValue::Int(i) => Some(Self::new(ScalarKind::Dword, i.to_le_bytes().to_vec())),
			OptionValue::Bool(b) => Some(Self::new(
				ScalarKind::Dword,
				i32::from(*b).to_le_bytes().to_vec(),
			)),
		}
	}

	/// Decodes into a value of type `like`. Returns `None` when the stored
	/// kind cannot represent that type.
	///
	/// Dword decodes into both ints and bools (nonzero is true). Text decodes
	/// only into strings.
	pub fn decode(&self, like: ValueType) -> Option<OptionValue> {
		match (self.kind, like) {
			(ScalarKind::Text, ValueType::String) => self.as_text().map(OptionValue::String),
			(ScalarKind::Dword, ValueType::Int) => self.as_dword().map(OptionValue::Int),
			(ScalarKind::Dword, ValueType::Bool) => self.as_dword().map(|d| OptionValue::Bool(d != 0)),
			_ => None,
		}
	}

	/// Text up to the first NUL.
	pub fn as_text(&self) -> Option<String> {
		if self.kind != ScalarKind::Text {
			return None;
		}
		let end = self
			.data
			.iter()
			.position(|b| *b == 0)
			.unwrap_or(self.data.len());
		Some(String::from_utf8_lossy(&self.data[..end]).into_owned())
	}

	pub fn as_dword(&self) -> Option<i32> {
		if self.kind != ScalarKind::Dword {
			return None;
		}
		let bytes: [u8; DWORD_LEN] = self.data.get(..DWORD_LEN)?.try_into().ok()?;
		Some(i32::from_le_bytes(bytes))
	}
}
