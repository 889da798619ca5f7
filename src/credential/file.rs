use anyhow::{Result, bail};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::CredentialStore;
use crate::runtime::Runtime;

/// Stores each key as a file named after the key inside one directory.
pub struct FileCredentialStore<R: Runtime> {
    runtime: Arc<R>,
    dir: PathBuf,
}

impl<R: Runtime> FileCredentialStore<R> {
    pub fn new(runtime: Arc<R>, dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            bail!("Invalid credential key: {:?}", key);
        }
        Ok(self.dir.join(key))
    }
}

impl<R: Runtime> CredentialStore for FileCredentialStore<R> {
    #[tracing::instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !self.runtime.exists(&path) {
            return Ok(None);
        }

        let value = self.runtime.read_to_string(&path)?;
        let value = value.trim();
        if value.is_empty() {
            debug!("Ignoring empty credential file {}", path.display());
            return Ok(None);
        }
        Ok(Some(value.to_string()))
    }

    #[tracing::instrument(skip(self, value))]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        self.runtime.create_dir_all(&self.dir)?;
        self.runtime.write(&path, value.as_bytes())?;
        self.runtime.set_permissions(&path, 0o600)?;
        debug!("Stored {} in {}", key, path.display());
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if self.runtime.exists(&path) {
            self.runtime.remove_file(&path)?;
            debug!("Removed {}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::CREDENTIAL_KEY;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_round_trip_on_disk() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(Arc::new(RealRuntime), dir.path().join("tripmate"));

        assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), None);

        store.set(CREDENTIAL_KEY, "abc.def.ghi").unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("tripmate/token")).unwrap(),
            "abc.def.ghi"
        );
        assert_eq!(
            store.get(CREDENTIAL_KEY).unwrap().as_deref(),
            Some("abc.def.ghi")
        );

        store.remove(CREDENTIAL_KEY).unwrap();
        assert!(!dir.path().join("tripmate/token").exists());
        assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_trims_and_ignores_blank_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("token"), "  tok\n").unwrap();
        let store = FileCredentialStore::new(Arc::new(RealRuntime), dir.path());
        assert_eq!(store.get(CREDENTIAL_KEY).unwrap().as_deref(), Some("tok"));

        std::fs::write(dir.path().join("token"), "\n").unwrap();
        assert_eq!(store.get(CREDENTIAL_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let store = FileCredentialStore::new(Arc::new(MockRuntime::new()), "/cfg");
        assert!(store.get("../token").is_err());
        assert!(store.set("a/b", "x").is_err());
        assert!(store.remove("").is_err());
    }

    #[test]
    fn test_file_store_set_restricts_permissions() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_create_dir_all()
            .with(eq(PathBuf::from("/cfg")))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_write()
            .withf(|path, contents| path == Path::new("/cfg/token") && contents == b"tok")
            .times(1)
            .returning(|_, _| Ok(()));
        runtime
            .expect_set_permissions()
            .with(eq(PathBuf::from("/cfg/token")), eq(0o600))
            .times(1)
            .returning(|_, _| Ok(()));

        let store = FileCredentialStore::new(Arc::new(runtime), "/cfg");
        store.set(CREDENTIAL_KEY, "tok").unwrap();
    }

    #[test]
    fn test_file_store_remove_missing_does_nothing() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_remove_file().never();

        let store = FileCredentialStore::new(Arc::new(runtime), "/cfg");
        store.remove(CREDENTIAL_KEY).unwrap();
    }

    #[test]
    fn test_file_store_propagates_write_errors() {
        let mut runtime = MockRuntime::new();
        runtime.expect_create_dir_all().returning(|_| Ok(()));
        runtime
            .expect_write()
            .returning(|_, _| Err(anyhow::anyhow!("disk full")));

        let store = FileCredentialStore::new(Arc::new(runtime), "/cfg");
        let err = store.set(CREDENTIAL_KEY, "tok").unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }
}
