/* src/backend/file.rs */

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Backend, ChildIter, RawValue, ScalarKind, StoreError, StoreResult, ValueIter};
use crate::name::STORE_SEPARATOR;

const KINDS: [ScalarKind; 3] = [ScalarKind::Text, ScalarKind::Dword, ScalarKind::Binary];

/// A store kept as a directory tree.
///
/// Containers are directories. A value is a file named `<name>.sz` (text),
/// `<name>.dword` (4-byte integer) or `<name>.bin` (opaque bytes). Hidden
/// entries are ignored.
#[derive(Debug, Clone)]
pub struct FileBackend {
	root: PathBuf,
}

/// Handle to a container of a [`FileBackend`].
#[derive(Debug, Clone)]
pub struct FileHandle(PathBuf);

impl FileHandle {
	/// Directory backing this container.
	pub fn path(&self) -> &Path {
		&self.0
	}
}

impl FileBackend {
	/// Creates a store rooted at the given directory. Nothing is touched on
	/// disk until the first container is opened.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// Maps a store path onto a directory below the root.
	fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
		let mut resolved = self.root.clone();
		if path.is_empty() {
			return Ok(resolved);
		}
		for segment in path.split(STORE_SEPARATOR) {
			check_segment(segment)?;
			resolved.push(segment);
		}
		Ok(resolved)
	}
}

fn check_segment(segment: &str) -> StoreResult<()> {
	let invalid = segment.is_empty()
		|| segment.starts_with('.')
		|| segment.contains(['/', '\\', '\0']);
	if invalid {
		Err(StoreError::InvalidName(segment.to_string()))
	} else {
		Ok(())
	}
}

fn extension(kind: ScalarKind) -> &'static str {
	match kind {
		ScalarKind::Text => "sz",
		ScalarKind::Dword => "dword",
		ScalarKind::Binary => "bin",
	}
}

fn kind_of(ext: &str) -> Option<ScalarKind> {
	KINDS.into_iter().find(|kind| extension(*kind) == ext)
}

fn value_path(dir: &Path, name: &str, kind: ScalarKind) -> PathBuf {
	dir.join(format!("{}.{}", name, extension(kind)))
}

/// Finds the file holding `name`, whatever its kind.
fn locate(dir: &Path, name: &str) -> StoreResult<Option<(PathBuf, ScalarKind)>> {
	for kind in KINDS {
		let path = value_path(dir, name, kind);
		match fs::metadata(&path) {
			Ok(meta) if meta.is_file() => return Ok(Some((path, kind))),
			Ok(_) => {}
			Err(e) if e.kind() == ErrorKind::NotFound => {}
			Err(e) => return Err(StoreError::Io(e)),
		}
	}
	Ok(None)
}

fn is_hidden(name: &str) -> bool {
	name.starts_with('.')
}

impl Backend for FileBackend {
	type Handle = FileHandle;

	fn open(&self, path: &str) -> StoreResult<Option<FileHandle>> {
		let dir = self.resolve(path)?;
		match fs::metadata(&dir) {
			Ok(meta) if meta.is_dir() => Ok(Some(FileHandle(dir))),
			Ok(_) => Ok(None),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
			Err(e) => Err(StoreError::Io(e)),
		}
	}

	fn open_or_create(&self, path: &str) -> StoreResult<FileHandle> {
		if !self.root.is_dir() {
			fs::create_dir_all(&self.root)
				.map_err(|e| StoreError::Unreachable(format!("{}: {}", self.root.display(), e)))?;
		}
		let dir = self.resolve(path)?;
		fs::create_dir_all(&dir)?;
		Ok(FileHandle(dir))
	}

	fn get_scalar(
		&self,
		handle: &FileHandle,
		name: &str,
		buf: &mut [u8],
	) -> StoreResult<(ScalarKind, usize)> {
		check_segment(name).map_err(|_| StoreError::NotFound)?;
		let (path, kind) = locate(&handle.0, name)?.ok_or(StoreError::NotFound)?;
		let data = match fs::read(&path) {
			Ok(data) => data,
			Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound),
			Err(e) => return Err(StoreError::Io(e)),
		};
		if buf.len() < data.len() {
			return Err(StoreError::MoreData {
				required: data.len(),
			});
		}
		buf[..data.len()].copy_from_slice(&data);
		Ok((kind, data.len()))
	}

	fn set_scalar(
		&self,
		handle: &FileHandle,
		name: &str,
		kind: ScalarKind,
		data: &[u8],
	) -> StoreResult<()> {
		check_segment(name)?;

		// A value keeps a single kind.
		for other in KINDS.into_iter().filter(|k| *k != kind) {
			match fs::remove_file(value_path(&handle.0, name, other)) {
				Ok(()) => {}
				Err(e) if e.kind() == ErrorKind::NotFound => {}
				Err(e) => return Err(StoreError::Io(e)),
			}
		}

		let target = value_path(&handle.0, name, kind);
		let staging = handle.0.join(format!(".{}.{}.tmp", name, extension(kind)));
		fs::write(&staging, data)?;
		fs::rename(&staging, &target)?;
		Ok(())
	}

	fn delete_value(&self, handle: &FileHandle, name: &str) -> StoreResult<()> {
		check_segment(name).map_err(|_| StoreError::NotFound)?;
		let (path, _) = locate(&handle.0, name)?.ok_or(StoreError::NotFound)?;
		fs::remove_file(path)?;
		Ok(())
	}

	fn delete_subtree(&self, handle: &FileHandle) -> StoreResult<()> {
		for entry in fs::read_dir(&handle.0)? {
			let entry = entry?;
			if entry.file_type()?.is_dir() {
				fs::remove_dir_all(entry.path())?;
			} else {
				fs::remove_file(entry.path())?;
			}
		}
		Ok(())
	}

	fn values(&self, handle: &FileHandle) -> StoreResult<ValueIter<'_>> {
		let entries = fs::read_dir(&handle.0)?;
		Ok(Box::new(entries.filter_map(|entry| {
			let entry = match entry {
				Ok(entry) => entry,
				Err(e) => return Some(Err(StoreError::Io(e))),
			};
			match entry.file_type() {
				Ok(file_type) if file_type.is_file() => {}
				Ok(_) => return None,
				Err(e) => return Some(Err(StoreError::Io(e))),
			}

			let file_name = entry.file_name();
			let file_name = file_name.to_string_lossy();
			if is_hidden(&file_name) {
				return None;
			}
			let (name, ext) = file_name.rsplit_once('.')?;
			let kind = kind_of(ext)?;

			Some(
				fs::read(entry.path())
					.map(|data| (name.to_string(), RawValue::new(kind, data)))
					.map_err(StoreError::Io),
			)
		})))
	}

	fn children(&self, handle: &FileHandle) -> StoreResult<ChildIter<'_>> {
		let entries = fs::read_dir(&handle.0)?;
		Ok(Box::new(entries.filter_map(|entry| {
			let entry = match entry {
				Ok(entry) => entry,
				Err(e) => return Some(Err(StoreError::Io(e))),
			};
			match entry.file_type() {
				Ok(file_type) if file_type.is_dir() => {}
				Ok(_) => return None,
				Err(e) => return Some(Err(StoreError::Io(e))),
			}
			let name = entry.file_name().to_string_lossy().into_owned();
			if is_hidden(&name) { None } else { Some(Ok(name)) }
		})))
	}
}
