//! Filesystem primitives for hoststate
//!
//! The leaf layer both reconcilers build on: JSON document I/O, atomic
//! writes and renames, permission/ownership application and streaming
//! content checksums. Nothing here knows about reconciliation.

pub mod checksum;
pub mod error;
pub mod io;
pub mod json;
pub mod perms;

pub use checksum::{Checksum, hash_file};
pub use error::{Error, Result};
pub use io::{RobustnessConfig, atomic_replace, remove_file, write_atomic};
pub use json::{JsonObject, read_json_object, write_json_object};
pub use perms::{FileAttributes, Ownership};
