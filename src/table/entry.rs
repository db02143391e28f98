/* src/table/entry.rs */

use std::time::Instant;

use crate::value::OptionValue;

/// An option entry containing the current value and metadata.
#[derive(Debug, Clone)]
pub struct Entry {
	/// The current value.
	pub value: OptionValue,
	/// Metadata about this entry.
	pub meta: Meta,
}

/// Metadata associated with an option entry.
#[derive(Debug, Clone)]
pub struct Meta {
	/// Value registered with the option. Its type is the option's type.
	pub default: OptionValue,
	/// Version number, taken from the table-wide counter on each change.
	pub version: u64,
	/// Timestamp of the last change.
	pub changed_at: Instant,
}
