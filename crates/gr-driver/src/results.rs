use gr_types::{DriverError, GrResult, ResultRecord};
use std::path::{Path, PathBuf};

/// Directory of per-item result files, one `<id>.csv` per work item.
#[derive(Debug, Clone)]
pub struct ResultStore {
    root: PathBuf,
}

impl ResultStore {
    /// Use `root` as the output directory, creating it if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> GrResult<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.csv"))
    }

    /// Write the record's output verbatim, replacing any earlier result.
    pub fn write(&self, record: &ResultRecord) -> GrResult<PathBuf> {
        let path = self.path_for(&record.id);
        std::fs::write(&path, &record.output).map_err(|source| DriverError::ResultWrite {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
