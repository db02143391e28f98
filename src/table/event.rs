/* src/table/event.rs */

use crate::value::OptionValue;

/// Events emitted by the table on option changes.
#[derive(Debug, Clone)]
pub enum OptionEvent {
	/// A new option was registered.
	Added { name: String, value: OptionValue },
	/// An existing option changed value.
	Changed {
		name: String,
		old: OptionValue,
		new: OptionValue,
	},
	/// An option was removed.
	Removed { name: String, value: OptionValue },
}
