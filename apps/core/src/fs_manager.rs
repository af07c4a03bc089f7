use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

const DB_FILENAME: &str = "pagemood.sqlite";

/// Resolves the on-disk layout under a single root:
/// `<root>/data/db/pagemood.sqlite`.
#[derive(Debug, Clone)]
pub struct PortablePathManager {
    root: PathBuf,
}

impl PortablePathManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `home` when given, otherwise the directory holding the executable.
    pub fn from_home(home: Option<&Path>) -> Self {
        match home {
            Some(path) => Self::new(path),
            None => Self::new(Self::exe_dir()),
        }
    }

    fn exe_dir() -> PathBuf {
        match std::env::current_exe() {
            Ok(mut path) => {
                path.pop();
                path
            }
            Err(e) => {
                error!("Failed to get current exe path: {}. Falling back to current dir.", e);
                PathBuf::from(".")
            }
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn db_dir(&self) -> PathBuf {
        self.data_dir().join("db")
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_dir().join(DB_FILENAME)
    }

    /// Create the data and db directories if missing.
    pub fn init(&self) -> Result<(), std::io::Error> {
        for dir in [self.data_dir(), self.db_dir()] {
            if !dir.exists() {
                info!("Creating directory: {:?}", dir);
                fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_root() {
        let paths = PortablePathManager::new("/srv/pagemood");
        assert_eq!(paths.db_path(), PathBuf::from("/srv/pagemood/data/db/pagemood.sqlite"));
        assert_eq!(paths.data_dir(), PathBuf::from("/srv/pagemood/data"));
    }

    #[test]
    fn test_init_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PortablePathManager::new(dir.path());

        paths.init().unwrap();
        assert!(paths.db_dir().is_dir());
        assert!(paths.data_dir().is_dir());

        // second call is a no-op
        paths.init().unwrap();
    }
}
