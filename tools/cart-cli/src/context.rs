//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use cart_cache::{Cache, FileStore};
use cart_commerce::persist::{load_cart, PersistCart};
use cart_commerce::store::CartStore;
use cart_data::ApiClient;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::{Output, ToastNotifier};

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory holding the stored cart.
    pub fn storage_dir(&self) -> PathBuf {
        resolve(&self.cwd, &self.config.storage.dir)
    }

    /// Typed view over the storage directory.
    pub fn cache(&self) -> Result<Cache<FileStore>> {
        let dir = self.storage_dir();
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open storage directory: {}", dir.display()))?;
        Ok(Cache::new(store))
    }

    /// Build the cart store: restore the stored cart, then persist every
    /// committed change back under the configured key.
    pub fn cart_store(&self) -> Result<Arc<CartStore<ApiClient>>> {
        let api = ApiClient::new(&self.config.api.base_url)
            .context("Failed to build HTTP client")?
            .with_timeout(self.config.api.timeout())
            .with_max_retries(self.config.api.max_retries);

        let cache = self.cache()?;
        let key = self.config.storage.key.as_str();
        let initial = load_cart(&cache, key);
        tracing::debug!(key, items = initial.len(), "Restored cart");

        let notifier = ToastNotifier::new(self.output.clone(), self.config.display.locale);
        let store = Arc::new(CartStore::new(api, Arc::new(notifier), initial));
        store.subscribe(Arc::new(PersistCart::new(cache, key)));
        Ok(store)
    }
}

/// Find a config file in the directory tree.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Resolve a path relative to `base`.
fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(".cart.toml"), "").unwrap();

        assert_eq!(find_config(&nested), Some(root.path().join(".cart.toml")));
    }

    #[test]
    fn test_find_config_prefers_plain_name() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("cart.toml"), "").unwrap();
        std::fs::write(root.path().join("cart.json"), "{}").unwrap();

        assert_eq!(find_config(root.path()), Some(root.path().join("cart.toml")));
    }

    #[test]
    fn test_resolve() {
        let base = Path::new("/home/shopper");
        assert_eq!(resolve(base, ".cart"), PathBuf::from("/home/shopper/.cart"));
        assert_eq!(resolve(base, "/tmp/cart"), PathBuf::from("/tmp/cart"));
    }
}
