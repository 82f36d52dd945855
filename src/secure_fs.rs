// Crypto Provider — Owner-only filesystem helpers
//
// Directories are created 0700 and files written 0600. Writes go through a
// temp file in the target directory followed by a rename, so a reader never
// observes a partially written file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Create `dir` (and parents) if missing, restricting it to the owner.
pub fn ensure_private_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
        }
    }
    Ok(())
}

/// Atomically replace `path` with `data`, readable by the owner only.
pub fn write_private_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_private_dir(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o600))?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
