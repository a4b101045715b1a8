use chrono::{DateTime, Local};
use std::io;
use std::path::{Path, PathBuf};

const CONTAINER_LISTING_FILE: &str = "containers.txt";
const ENV_COPY_FILE: &str = ".env";

/// One pre-deploy snapshot on disk, immutable after creation.
#[derive(Debug, Clone)]
pub struct BackupRecord {
    /// Timestamp-derived; lexicographic order equals chronological order.
    pub id: String,
    pub created_at: DateTime<Local>,
    pub dir: PathBuf,
    pub env_copy_path: PathBuf,
}

/// Backup storage rooted at one directory, one subdirectory per record.
#[derive(Debug, Clone)]
pub struct BackupStore {
    root: PathBuf,
}

impl BackupStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot the current state: the running-container listing verbatim
    /// (opaque blob, possibly empty) and a byte copy of the environment
    /// file, so later edits cannot corrupt the historical record.
    ///
    /// Two runs within the same second collide on the id and fail with
    /// `AlreadyExists`; concurrent deploys are outside the design.
    pub fn snapshot(&self, env_file: &Path, container_listing: &str) -> io::Result<BackupRecord> {
        let created_at = Local::now();
        let id = created_at.format("%Y%m%d-%H%M%S").to_string();
        let dir = self.root.join(&id);

        std::fs::create_dir(&dir)?;
        std::fs::write(dir.join(CONTAINER_LISTING_FILE), container_listing)?;

        let env_copy_path = dir.join(ENV_COPY_FILE);
        std::fs::copy(env_file, &env_copy_path)?;

        Ok(BackupRecord {
            id,
            created_at,
            dir,
            env_copy_path,
        })
    }

    /// All backup ids, newest first.
    pub fn list(&self) -> io::Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                ids.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        // Ids sort chronologically, so reverse lexicographic = newest first.
        ids.sort_unstable_by(|a, b| b.cmp(a));
        Ok(ids)
    }

    /// Remove every backup beyond the `retain` newest. Returns removed ids,
    /// oldest of the removals last. A store holding `retain` or fewer
    /// backups is left untouched.
    pub fn prune(&self, retain: usize) -> io::Result<Vec<String>> {
        let ids = self.list()?;
        if ids.len() <= retain {
            return Ok(Vec::new());
        }

        let mut removed = Vec::new();
        for id in &ids[retain..] {
            std::fs::remove_dir_all(self.root.join(id))?;
            removed.push(id.clone());
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn store_with_ids(ids: &[&str]) -> (TempDir, BackupStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path());
        for id in ids {
            std::fs::create_dir(dir.path().join(id)).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn snapshot_copies_env_by_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path().join("backups"));
        std::fs::create_dir_all(store.root()).unwrap();

        let env_file = dir.path().join(".env");
        std::fs::write(&env_file, "DB_HOST=db\n").unwrap();

        let record = store.snapshot(&env_file, "CONTAINER ID  IMAGE\nabc  api\n").unwrap();

        // Mutating the source file must not touch the snapshot.
        std::fs::write(&env_file, "DB_HOST=other\n").unwrap();

        let copied = std::fs::read_to_string(&record.env_copy_path).unwrap();
        assert_eq!(copied, "DB_HOST=db\n");

        let listing = std::fs::read_to_string(record.dir.join("containers.txt")).unwrap();
        assert!(listing.contains("abc  api"));
    }

    #[test]
    fn snapshot_accepts_empty_container_listing() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path().join("backups"));
        std::fs::create_dir_all(store.root()).unwrap();

        let env_file = dir.path().join(".env");
        std::fs::write(&env_file, "").unwrap();

        let record = store.snapshot(&env_file, "").unwrap();
        assert_eq!(
            std::fs::read_to_string(record.dir.join("containers.txt")).unwrap(),
            ""
        );
    }

    #[test]
    fn snapshot_fails_when_env_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path());

        let err = store
            .snapshot(&dir.path().join("no-such-env"), "")
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn list_is_newest_first() {
        let (_dir, store) = store_with_ids(&[
            "20260101-120000",
            "20260301-120000",
            "20260201-120000",
        ]);

        assert_eq!(
            store.list().unwrap(),
            vec!["20260301-120000", "20260201-120000", "20260101-120000"]
        );
    }

    #[test]
    fn list_of_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path().join("never-created"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn prune_keeps_the_newest() {
        let (_dir, store) = store_with_ids(&[
            "20260101-120000",
            "20260102-120000",
            "20260103-120000",
            "20260104-120000",
        ]);

        let removed = store.prune(2).unwrap();
        assert_eq!(removed, vec!["20260102-120000", "20260101-120000"]);
        assert_eq!(
            store.list().unwrap(),
            vec!["20260104-120000", "20260103-120000"]
        );
    }

    #[test]
    fn prune_below_retention_is_a_noop() {
        let (_dir, store) = store_with_ids(&["20260101-120000"]);
        assert!(store.prune(5).unwrap().is_empty());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn prune_with_zero_retention_removes_everything() {
        let (_dir, store) = store_with_ids(&["20260101-120000", "20260102-120000"]);
        let removed = store.prune(0).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(store.list().unwrap().is_empty());
    }

    proptest! {
        // After prune(k), exactly min(n, k) backups remain and they are
        // the k newest by id.
        #[test]
        fn prune_retains_exactly_min_n_k(n in 0usize..12, k in 0usize..8) {
            let dir = tempfile::tempdir().unwrap();
            let store = BackupStore::new(dir.path());

            let ids: Vec<String> = (0..n)
                .map(|i| format!("20260101-{:02}0000", i))
                .collect();
            for id in &ids {
                std::fs::create_dir(dir.path().join(id)).unwrap();
            }

            store.prune(k).unwrap();

            let mut expected: Vec<String> = ids.clone();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            expected.truncate(k);

            prop_assert_eq!(store.list().unwrap(), expected);
        }
    }
}
