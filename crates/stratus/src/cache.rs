//! Process-wide cache of compiled schemas.
//!
//! Compiling a schema is the expensive part of building templates, and a
//! process typically builds many templates against the same few schemas.
//! Entries are keyed by the SHA-256 digest of the schema document's
//! canonical JSON encoding, so equal documents share one compiled
//! [`Schema`] regardless of where they were loaded from.

use std::{
    collections::HashMap,
    sync::{Arc, LazyLock},
};

use log::{debug, info};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use stratus_core::Schema;
use stratus_schema::SchemaSource;

use crate::error::StratusError;

type Fingerprint = [u8; 32];

static CACHE: LazyLock<Mutex<HashMap<Fingerprint, Arc<Schema>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn fingerprint(source: &SchemaSource) -> Result<Fingerprint, StratusError> {
    let bytes = serde_json::to_vec(source)?;
    Ok(Sha256::digest(&bytes).into())
}

/// Returns the compiled form of `source`, compiling it on first request.
///
/// The lock is held while compiling, so concurrent requests for the same
/// document compile it once.
///
/// # Errors
///
/// Returns [`StratusError::Compile`] if the document does not compile.
/// Failed compilations are not cached.
pub fn compile_cached(source: &SchemaSource) -> Result<Arc<Schema>, StratusError> {
    let key = fingerprint(source)?;
    let mut cache = CACHE.lock();
    if let Some(schema) = cache.get(&key) {
        debug!("Schema cache hit");
        return Ok(Arc::clone(schema));
    }

    let schema = Arc::new(stratus_schema::compile(source)?);
    info!(
        resource_types = schema.resource_types().count(),
        types = schema.type_count();
        "Compiled schema",
    );
    cache.insert(key, Arc::clone(&schema));
    Ok(schema)
}
