/* src/name.rs */

//!
//! Option names and store paths.
//!
//! Option names use `/` between segments (`Settings/ShowToolbar`). The store
//! addresses containers with `\`, rooted under [`ROOT_NAMESPACE`].

/// Separator between segments of an option name.
pub const NAME_SEPARATOR: char = '/';

/// Separator between segments of a store path.
pub const STORE_SEPARATOR: char = '\\';

/// Namespace every root path lives under.
pub const ROOT_NAMESPACE: &str = "Software";

/// An option name split into its container path and value name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionPath<'a> {
	/// Everything before the last `/`, still in option-name form.
	pub container: &'a str,
	/// The last segment. Empty when the name denotes the container itself.
	pub value: &'a str,
}

impl OptionPath<'_> {
	/// Container path relative to the root, in store form.
	pub fn store_path(&self) -> String {
		self.container.replace(NAME_SEPARATOR, &STORE_SEPARATOR.to_string())
	}

	/// True when the name addresses a whole container.
	pub fn is_container(&self) -> bool {
		self.value.is_empty()
	}
}

/// Splits an option name at its last `/`.
///
/// A name without `/` lives in the root container.
pub fn split_name(name: &str) -> OptionPath<'_> {
	match name.rsplit_once(NAME_SEPARATOR) {
		Some((container, value)) => OptionPath { container, value },
		None => OptionPath {
			container: "",
			value: name,
		},
	}
}

/// Normalizes a root path into store form, prefixing [`ROOT_NAMESPACE`]
/// when it is not already there.
pub fn normalize_root(root: &str) -> String {
	let trimmed = root
		.replace(NAME_SEPARATOR, &STORE_SEPARATOR.to_string())
		.trim_matches(STORE_SEPARATOR)
		.to_string();

	if trimmed.starts_with(ROOT_NAMESPACE) {
		trimmed
	} else if trimmed.is_empty() {
		ROOT_NAMESPACE.to_string()
	} else {
		format!("{ROOT_NAMESPACE}{STORE_SEPARATOR}{trimmed}")
	}
}

/// Joins a store path and a relative store path.
pub fn join_store_path(base: &str, relative: &str) -> String {
	match (base.is_empty(), relative.is_empty()) {
		(_, true) => base.to_string(),
		(true, false) => relative.to_string(),
		(false, false) => format!("{base}{STORE_SEPARATOR}{relative}"),
	}
}

/// Appends a segment to a dotted option name.
pub fn join_name(prefix: &str, segment: &str) -> String {
	if prefix.is_empty() {
		segment.to_string()
	} else {
		format!("{prefix}{NAME_SEPARATOR}{segment}")
	}
}

/// True when `name` lies strictly below `container` (`A/B` is below `A`,
/// `AB` is not).
pub fn is_descendant(name: &str, container: &str) -> bool {
	if container.is_empty() {
		return !name.is_empty();
	}
	name.len() > container.len()
		&& name.starts_with(container)
		&& name[container.len()..].starts_with(NAME_SEPARATOR)
}

/// True when `path` lies strictly below `container` in store form.
pub(crate) fn is_store_descendant(path: &str, container: &str) -> bool {
	if container.is_empty() {
		return !path.is_empty();
	}
	path.len() > container.len()
		&& path.starts_with(container)
		&& path[container.len()..].starts_with(STORE_SEPARATOR)
}
