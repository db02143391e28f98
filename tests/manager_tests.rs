/* tests/manager_tests.rs */

use regopts::backend::{
	Backend, ChildIter, MemoryBackend, MemoryHandle, RawValue, ScalarKind, StoreError, StoreResult,
	ValueIter,
};
use regopts::table::ExportStyle;
use regopts::transfer::{OptionsFile, TypeTag};
use regopts::{ErrorKind, OptionValue, RegOptions};

fn stored(backend: &MemoryBackend, path: &str, name: &str) -> Option<RawValue> {
	let handle = backend.open(path).unwrap()?;
	let mut buf = vec![0u8; 1024];
	match backend.get_scalar(&handle, name, &mut buf) {
		Ok((kind, len)) => {
			buf.truncate(len);
			Some(RawValue::new(kind, buf))
		}
		Err(StoreError::NotFound) => None,
		Err(e) => panic!("unexpected store error: {e}"),
	}
}

fn put(backend: &MemoryBackend, path: &str, name: &str, kind: ScalarKind, data: &[u8]) {
	let handle = backend.open_or_create(path).unwrap();
	backend.set_scalar(&handle, name, kind, data).unwrap();
}

#[test]
fn test_init_persists_default() {
	let backend = MemoryBackend::new();
	let options = RegOptions::new(backend.clone(), "Test").unwrap();

	options.init_option("Settings/ShowToolbar", true).unwrap();
	options.flush_options();

	assert_eq!(options.get("Settings/ShowToolbar"), OptionValue::Bool(true));
	let raw = stored(&backend, "Software\\Test\\Settings", "ShowToolbar").unwrap();
	assert_eq!(raw.kind, ScalarKind::Dword);
	assert_eq!(raw.as_dword(), Some(1));
}

#[test]
fn test_init_loads_stored_value() {
	let backend = MemoryBackend::new();
	put(&backend, "Software\\Test\\Settings", "ShowToolbar", ScalarKind::Dword, &0i32.to_le_bytes());
	put(&backend, "Software\\Test\\Settings", "Title", ScalarKind::Text, b"Stored\0");

	let options = RegOptions::new(backend.clone(), "Test").unwrap();
	options.init_option("Settings/ShowToolbar", true).unwrap();
	options.init_option("Settings/Title", "Default").unwrap();

	assert_eq!(options.get("Settings/ShowToolbar"), OptionValue::Bool(false));
	assert_eq!(options.get("Settings/Title"), OptionValue::from("Stored"));
	assert_eq!(options.table().get_default("Settings/ShowToolbar"), Some(OptionValue::Bool(true)));
}

#[test]
fn test_init_rejects_mismatched_store_type() {
	let backend = MemoryBackend::new();
	put(&backend, "Software\\Test\\Settings", "ShowToolbar", ScalarKind::Text, b"yes\0");

	let options = RegOptions::new(backend, "Test").unwrap();
	let err = options.init_option("Settings/ShowToolbar", true).unwrap_err();

	assert_eq!(err.kind(), ErrorKind::WrongType);
	// The option stays registered with its default.
	assert_eq!(options.get("Settings/ShowToolbar"), OptionValue::Bool(true));
}

#[test]
fn test_init_rejects_null_default() {
	let options = RegOptions::new(MemoryBackend::new(), "Test").unwrap();

	let err = options.init_option("A/X", OptionValue::Null).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::UnknownType);
	assert!(!options.table().contains("A/X"));
}

#[test]
fn test_save_value_persists() {
	let backend = MemoryBackend::new();
	let options = RegOptions::new(backend.clone(), "Test").unwrap();

	options.init_option("Settings/Width", 640).unwrap();
	options.save_value("Settings/Width", 1024).unwrap();
	options.flush_options();

	assert_eq!(options.get("Settings/Width"), OptionValue::Int(1024));
	let raw = stored(&backend, "Software\\Test\\Settings", "Width").unwrap();
	assert_eq!(raw.as_dword(), Some(1024));
}

#[test]
fn test_save_unknown_option() {
	let options = RegOptions::new(MemoryBackend::new(), "Test").unwrap();

	let err = options.save_value("Nope", 1).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);

	let err = options.save_option("Nope").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_save_value_wrong_type() {
	let options = RegOptions::new(MemoryBackend::new(), "Test").unwrap();
	options.init_option("Settings/Width", 640).unwrap();

	let err = options.save_value("Settings/Width", "wide").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::WrongType);
	assert_eq!(options.get("Settings/Width"), OptionValue::Int(640));
}

#[test]
fn test_serializing_off_keeps_store_untouched() {
	let backend = MemoryBackend::new();
	let options = RegOptions::builder()
		.backend(backend.clone())
		.root("Test")
		.serializing(false)
		.build()
		.unwrap();

	options.init_option("Settings/Width", 640).unwrap();
	options.save_value("Settings/Width", 800).unwrap();
	options.flush_options();

	assert_eq!(options.get("Settings/Width"), OptionValue::Int(800));
	assert!(stored(&backend, "Software\\Test\\Settings", "Width").is_none());

	options.set_serializing(true);
	options.save_option("Settings/Width").unwrap();
	options.flush_options();
	assert_eq!(stored(&backend, "Software\\Test\\Settings", "Width").unwrap().as_dword(), Some(800));
}

#[test]
fn test_init_transient_never_touches_store() {
	let backend = MemoryBackend::new();
	let options = RegOptions::new(backend.clone(), "Test").unwrap();

	options.init_transient("Session/Token", "abc").unwrap();
	options.flush_options();

	assert_eq!(options.get("Session/Token"), OptionValue::from("abc"));
	assert!(backend.open("Software\\Test\\Session").unwrap().is_none());
}

#[test]
fn test_remove_option_value() {
	let backend = MemoryBackend::new();
	let options = RegOptions::new(backend.clone(), "Test").unwrap();
	options.init_option("Settings/Width", 640).unwrap();
	options.init_option("Settings/Height", 480).unwrap();

	options.remove_option("Settings/Width").unwrap();

	assert!(!options.table().contains("Settings/Width"));
	assert!(stored(&backend, "Software\\Test\\Settings", "Width").is_none());
	assert!(stored(&backend, "Software\\Test\\Settings", "Height").is_some());
}

#[test]
fn test_remove_unregistered_still_cleans_store() {
	let backend = MemoryBackend::new();
	put(&backend, "Software\\Test\\Old", "Value", ScalarKind::Dword, &5i32.to_le_bytes());
	let options = RegOptions::new(backend.clone(), "Test").unwrap();

	let err = options.remove_option("Old/Value").unwrap_err();

	assert_eq!(err.kind(), ErrorKind::NotFound);
	assert!(stored(&backend, "Software\\Test\\Old", "Value").is_none());
}

#[test]
fn test_remove_option_container() {
	let backend = MemoryBackend::new();
	let options = RegOptions::new(backend.clone(), "Test").unwrap();
	options.init_option("Settings/A", 1).unwrap();
	options.init_option("Settings/Inner/B", 2).unwrap();
	options.init_option("SettingsX/C", 3).unwrap();

	options.remove_option("Settings/").unwrap();

	assert!(!options.table().contains("Settings/A"));
	assert!(!options.table().contains("Settings/Inner/B"));
	assert!(options.table().contains("SettingsX/C"));
	assert!(stored(&backend, "Software\\Test\\Settings", "A").is_none());
	assert!(stored(&backend, "Software\\Test\\Settings\\Inner", "B").is_none());
	assert!(stored(&backend, "Software\\Test\\SettingsX", "C").is_some());
}

#[test]
fn test_export_skips_registered_and_binary() {
	let backend = MemoryBackend::new();
	put(&backend, "Software\\Test\\Extra", "Count", ScalarKind::Dword, &7i32.to_le_bytes());
	put(&backend, "Software\\Test\\Extra", "Blob", ScalarKind::Binary, &[1, 2, 3]);
	put(&backend, "Software\\Test", "TopLevel", ScalarKind::Text, b"root\0");
	let options = RegOptions::new(backend, "Test").unwrap();
	options.init_option("Extra/Known", 1).unwrap();
	options.flush_options();

	let mut file = OptionsFile::new();
	let exported = options.io().export_unknown(options.table(), &mut file).unwrap();

	assert_eq!(exported, 2);
	assert_eq!(file.value("Extra/Count"), Some("7"));
	assert_eq!(file.type_of("Extra/Count"), Some(TypeTag::Int));
	assert_eq!(file.value("TopLevel"), Some("root"));
	assert_eq!(file.type_of("TopLevel"), Some(TypeTag::String));
	assert_eq!(file.value("Extra/Blob"), None);
	assert_eq!(file.value("Extra/Known"), None);
}

#[test]
fn test_export_clear_import_round_trip() {
	let dir = tempfile::tempdir().unwrap();
	let first = dir.path().join("first.toml");
	let second = dir.path().join("second.toml");

	let backend = MemoryBackend::new();
	put(&backend, "Software\\Test\\Extra", "Quote", ScalarKind::Text, b"line one\nsays \"hi\"\0");
	put(&backend, "Software\\Test\\Extra\\Deep", "Count", ScalarKind::Dword, &(-3i32).to_le_bytes());
	put(&backend, "Software\\Test\\Extra", "Blob", ScalarKind::Binary, &[9, 9]);

	let options = RegOptions::new(backend.clone(), "Test").unwrap();
	options.init_option("Settings/ShowToolbar", true).unwrap();
	options.init_option("Settings/Title", "Main").unwrap();
	options.export_options(&first).unwrap();

	options.io().remove("").unwrap();
	assert!(stored(&backend, "Software\\Test\\Extra", "Quote").is_none());

	options.import_options(&first).unwrap();
	options.flush_options();
	options.export_options(&second).unwrap();

	let first = OptionsFile::load(&first).unwrap();
	let second = OptionsFile::load(&second).unwrap();
	assert_eq!(first, second);
	assert_eq!(first.value("Extra/Quote"), Some("line one\nsays \"hi\""));
	assert_eq!(first.value("Extra/Deep/Count"), Some("-3"));
	assert_eq!(first.value("Settings/ShowToolbar"), Some("1"));
	assert_eq!(first.type_of("Settings/ShowToolbar"), Some(TypeTag::Bool));
	assert_eq!(first.value("Extra/Blob"), None);

	let raw = stored(&backend, "Software\\Test\\Extra", "Quote").unwrap();
	assert_eq!(raw.as_text().as_deref(), Some("line one\nsays \"hi\""));
}

#[test]
fn test_import_mixed_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("import.toml");
	std::fs::write(
		&path,
		r#"
[values]
"Imported/Mask" = "0x1F"
"Imported/Enabled" = "true"
"Imported/Loose" = "x"
"Settings/Width" = "800"

[type-info]
"Imported/Mask" = "int"
"Imported/Enabled" = "bool"
"Settings/Width" = "int"
"#,
	)
	.unwrap();

	let backend = MemoryBackend::new();
	let options = RegOptions::new(backend.clone(), "Test").unwrap();
	options.init_option("Settings/Width", 640).unwrap();

	options.import_options(&path).unwrap();
	options.flush_options();

	let mask = stored(&backend, "Software\\Test\\Imported", "Mask").unwrap();
	assert_eq!(mask.as_dword(), Some(31));
	let enabled = stored(&backend, "Software\\Test\\Imported", "Enabled").unwrap();
	assert_eq!(enabled.as_dword(), Some(1));
	assert!(stored(&backend, "Software\\Test\\Imported", "Loose").is_none());

	assert_eq!(options.get("Settings/Width"), OptionValue::Int(800));
	let width = stored(&backend, "Software\\Test\\Settings", "Width").unwrap();
	assert_eq!(width.as_dword(), Some(800));
	assert!(!options.table().contains("Imported/Mask"));
}

#[test]
fn test_import_skips_keys_the_store_rejects() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("import.toml");
	std::fs::write(
		&path,
		r#"
[values]
"A//Bad" = "1"
"Settings/Width" = "800"
"Z/Good" = "2"

[type-info]
"A//Bad" = "int"
"Settings/Width" = "int"
"Z/Good" = "int"
"#,
	)
	.unwrap();

	let backend = MemoryBackend::new();
	let options = RegOptions::new(backend.clone(), "Test").unwrap();
	options.init_option("Settings/Width", 640).unwrap();

	options.import_options(&path).unwrap();
	options.flush_options();

	assert_eq!(stored(&backend, "Software\\Test\\Z", "Good").unwrap().as_dword(), Some(2));
	assert_eq!(options.get("Settings/Width"), OptionValue::Int(800));
	assert_eq!(stored(&backend, "Software\\Test\\Settings", "Width").unwrap().as_dword(), Some(800));
}

#[test]
fn test_import_missing_file() {
	let dir = tempfile::tempdir().unwrap();
	let options = RegOptions::new(MemoryBackend::new(), "Test").unwrap();

	let err = options.import_options(dir.path().join("absent.toml")).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Generic);
}

#[test]
fn test_export_hex_colors() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("colors.toml");
	let options = RegOptions::new(MemoryBackend::new(), "Test").unwrap();
	options.init_option("Colors/TextColor", 0x00ff00).unwrap();
	options.init_option("Colors/Count", 12).unwrap();

	options
		.export_options_with(&path, ExportStyle { hex_colors: true })
		.unwrap();

	let file = OptionsFile::load(&path).unwrap();
	assert_eq!(file.value("Colors/TextColor"), Some("0x0000ff00"));
	assert_eq!(file.value("Colors/Count"), Some("12"));

	options.save_value("Colors/TextColor", 0).unwrap();
	options.import_options(&path).unwrap();
	assert_eq!(options.get("Colors/TextColor"), OptionValue::Int(0x00ff00));
}

#[test]
fn test_builder_requires_backend_and_root() {
	let err = RegOptions::<MemoryBackend>::builder().root("Test").build().unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Generic);

	let err = RegOptions::builder().backend(MemoryBackend::new()).build().unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Generic);
}

#[test]
fn test_close_keys_releases_handles() {
	let options = RegOptions::new(MemoryBackend::new(), "Test").unwrap();
	options.init_option("A/X", 1).unwrap();
	options.flush_options();
	assert!(options.io().cached_handles() > 0);

	options.close_keys();
	assert_eq!(options.io().cached_handles(), 0);
}

/// A memory store whose value listings fail after the first entry.
#[derive(Clone, Default)]
struct FailingListing(MemoryBackend);

impl Backend for FailingListing {
	type Handle = MemoryHandle;

	fn open(&self, path: &str) -> StoreResult<Option<MemoryHandle>> {
		self.0.open(path)
	}

	fn open_or_create(&self, path: &str) -> StoreResult<MemoryHandle> {
		self.0.open_or_create(path)
	}

	fn get_scalar(
		&self,
		handle: &MemoryHandle,
		name: &str,
		buf: &mut [u8],
	) -> StoreResult<(ScalarKind, usize)> {
		self.0.get_scalar(handle, name, buf)
	}

	fn set_scalar(
		&self,
		handle: &MemoryHandle,
		name: &str,
		kind: ScalarKind,
		data: &[u8],
	) -> StoreResult<()> {
		self.0.set_scalar(handle, name, kind, data)
	}

	fn delete_value(&self, handle: &MemoryHandle, name: &str) -> StoreResult<()> {
		self.0.delete_value(handle, name)
	}

	fn delete_subtree(&self, handle: &MemoryHandle) -> StoreResult<()> {
		self.0.delete_subtree(handle)
	}

	fn values(&self, handle: &MemoryHandle) -> StoreResult<ValueIter<'_>> {
		let failure = StoreError::Io(std::io::Error::other("listing interrupted"));
		Ok(Box::new(
			self.0.values(handle)?.take(1).chain(std::iter::once(Err(failure))),
		))
	}

	fn children(&self, handle: &MemoryHandle) -> StoreResult<ChildIter<'_>> {
		self.0.children(handle)
	}
}

#[test]
fn test_export_aborts_on_listing_error() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("export.toml");

	let backend = FailingListing::default();
	put(&backend.0, "Software\\Test", "Top", ScalarKind::Text, b"top\0");
	put(&backend.0, "Software\\Test\\A", "X", ScalarKind::Dword, &1i32.to_le_bytes());
	put(&backend.0, "Software\\Test\\A", "Y", ScalarKind::Dword, &2i32.to_le_bytes());

	let options = RegOptions::new(backend, "Test").unwrap();
	options.init_transient("Settings/Width", 640).unwrap();

	let err = options.export_options(&path).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Generic);
	assert!(!path.exists());
}
