// Crypto Provider — Built-in providers

pub mod file;

use std::path::Path;
use std::sync::Arc;

use crate::factory::{FactoryError, FactoryRegistry};

/// Register every built-in factory. `key_dir` is where file-backed providers
/// keep their key files.
pub fn register_builtin_factories(
    registry: &FactoryRegistry,
    key_dir: &Path,
) -> Result<(), FactoryError> {
    registry.register_factory(Arc::new(file::FileProviderFactory::new(key_dir)))?;
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
