//! The identifier storage document
//!
//! `storage.json` is a flat-ish JSON object owned by the editor. This
//! module only ever touches the three identifier keys; every other key
//! passes through a rewrite untouched.
//!
//! v0.3.0: merge into the existing document instead of replacing it.
//! Earlier versions dropped editor state on every reset.

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::ResetError;
use crate::identity::DeviceIdentity;

/// The storage document, keyed by dotted setting names
pub type StorageDoc = Map<String, Value>;

/// Read the storage document, degrading to empty on any problem
///
/// Missing file, unreadable file, unparseable JSON and a top-level
/// value that is not an object all yield an empty document. The caller
/// has already backed up whatever is on disk, so nothing is lost by
/// starting fresh.
pub fn load_or_empty(path: &Path) -> StorageDoc {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!("storage not readable ({}); starting from an empty document", e);
            return StorageDoc::new();
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(doc)) => doc,
        Ok(other) => {
            debug!(
                "storage top level is {} rather than an object; starting fresh",
                json_type_name(&other)
            );
            StorageDoc::new()
        }
        Err(e) => {
            debug!("storage did not parse ({}); starting fresh", e);
            StorageDoc::new()
        }
    }
}

/// Overlay a fresh identity onto a document
///
/// Pure function of its inputs: inserts or replaces exactly the three
/// identifier keys and touches nothing else.
pub fn merge_identity(mut doc: StorageDoc, identity: &DeviceIdentity) -> StorageDoc {
    for (key, value) in identity.pairs() {
        doc.insert(key.to_string(), Value::String(value.to_string()));
    }
    doc
}

/// Write a document to disk as pretty-printed JSON
///
/// Parent directories are created as needed, which covers the
/// freshly-installed case where `globalStorage/` does not exist yet.
pub fn persist(path: &Path, doc: &StorageDoc) -> Result<(), ResetError> {
    ensure_parent(path)?;
    let rendered = serde_json::to_string_pretty(doc)?;
    fs::write(path, rendered)?;
    Ok(())
}

/// Create the parent directory chain of `path` if it is missing
pub fn ensure_parent(path: &Path) -> Result<(), ResetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
