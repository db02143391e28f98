/* src/lib.rs */

//!
//! Keeps a table of named, typed options in sync with a hierarchical
//! key-value store.
//!
//! - **table**: Thread-safe in-memory option table with lock-free reads.
//! - **backend**: Adapters over hierarchical stores (memory, directory tree).
//! - **io**: IOHandler with a handle cache and a write-behind persistence thread.
//! - **transfer**: Flat option files for bulk import and export.
//! - **manager**: Unified interface integrating the above (`RegOptions`).
//!
//! ## Feature Flags
//!
//! - `full`: Enables all features.
//! - `fs`: Enables [`backend::FileBackend`] (default).
//! - `events`: Enables change events on [`table::OptionsTable`].
//! - `serde`: Derives `Serialize`/`Deserialize` for values and configuration.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use regopts::backend::MemoryBackend;
//! use regopts::manager::RegOptions;
//!
//! # fn main() -> Result<(), regopts::OptError> {
//! let options = RegOptions::new(MemoryBackend::new(), "Vendor\\App")?;
//! options.init_option("Settings/ShowToolbar", true)?;
//! options.save_value("Settings/ShowToolbar", false)?;
//! options.flush_options();
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod error;
pub mod io;
pub mod manager;
pub mod name;
pub mod table;
pub mod transfer;
pub mod value;

pub use error::{ErrorKind, OptError, OptResult};
pub use manager::{RegOptions, RegOptionsBuilder};
pub use value::{OptionValue, ValueType};
