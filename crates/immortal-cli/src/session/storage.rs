//! Cookie store persistence.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use cookie_store::CookieStore;
use directories::ProjectDirs;
use reqwest_cookie_store::CookieStoreMutex;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Get the cookie store file path.
fn store_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "immortal").context("Could not determine config directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("cookies.json"))
}

/// Load the persisted cookie store, or start empty.
pub fn load() -> Result<Arc<CookieStoreMutex>> {
    load_from(&store_path()?)
}

/// Save the cookie store to disk.
pub fn save(cookies: &CookieStoreMutex) -> Result<()> {
    save_to(cookies, &store_path()?)
}

/// Clear the persisted cookie store.
pub fn clear() -> Result<()> {
    let path = store_path()?;

    if path.exists() {
        fs::remove_file(&path).context("Failed to remove cookie store")?;
    }

    Ok(())
}

fn load_from(path: &Path) -> Result<Arc<CookieStoreMutex>> {
    let store = if path.exists() {
        let reader = File::open(path)
            .map(BufReader::new)
            .context("Failed to read cookie store")?;
        CookieStore::load_json(reader).map_err(|e| anyhow!("Invalid cookie store: {e}"))?
    } else {
        tracing::debug!(path = %path.display(), "no cookie store yet, starting empty");
        CookieStore::default()
    };

    Ok(Arc::new(CookieStoreMutex::new(store)))
}

fn save_to(cookies: &CookieStoreMutex, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    {
        let store = cookies.lock().unwrap();
        store
            .save_json(&mut buf)
            .map_err(|e| anyhow!("Failed to serialize cookie store: {e}"))?;
    }

    fs::write(path, &buf).context("Failed to write cookie store")?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn round_trips_persistent_cookies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        let url = Url::parse("https://api.immortal.page").unwrap();
        let mut store = CookieStore::default();
        store
            .parse(
                "refresh=rt-1; Path=/; HttpOnly; Max-Age=604800",
                &url,
            )
            .unwrap();

        let cookies = Arc::new(CookieStoreMutex::new(store));
        save_to(&cookies, &path).unwrap();

        let loaded = load_from(&path).unwrap();
        let loaded = loaded.lock().unwrap();
        assert!(loaded.get("api.immortal.page", "/", "refresh").is_some());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_from(&dir.path().join("cookies.json")).unwrap();
        assert!(loaded.lock().unwrap().iter_any().next().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn store_file_is_private() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        let cookies = Arc::new(CookieStoreMutex::new(CookieStore::default()));
        save_to(&cookies, &path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
