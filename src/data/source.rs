use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use log::debug;

use super::format::FileFormat;

// ---------------------------------------------------------------------------
// Dataset sources
// ---------------------------------------------------------------------------

/// A file handed over directly by the user, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from anywhere on disk into an upload.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "path has no usable file name")
            })?
            .to_string();
        let bytes = std::fs::read(path)?;
        Ok(Self { name, bytes })
    }
}

/// Where the dataset of a session comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Upload(Upload),
    /// A file inside the repository directory.
    Repository { name: String, path: PathBuf },
}

impl DatasetSource {
    /// File name used for format dispatch and display.
    pub fn name(&self) -> &str {
        match self {
            DatasetSource::Upload(upload) => &upload.name,
            DatasetSource::Repository { name, .. } => name,
        }
    }

    /// Open the content for reading. Repository files are opened lazily.
    pub fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        match self {
            DatasetSource::Upload(upload) => Ok(Box::new(Cursor::new(upload.bytes.as_slice()))),
            DatasetSource::Repository { path, .. } => Ok(Box::new(File::open(path)?)),
        }
    }
}

/// Pick the active source. The upload wins over a repository selection;
/// `None` means there is nothing to load yet.
pub fn resolve(upload: Option<Upload>, selection: Option<DatasetSource>) -> Option<DatasetSource> {
    upload.map(DatasetSource::Upload).or(selection)
}

// ---------------------------------------------------------------------------
// Repository – the local directory of candidate files
// ---------------------------------------------------------------------------

/// A flat directory of files offered for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    dir: PathBuf,
}

impl Repository {
    /// Use `dir` as the repository, creating it when missing.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        debug!("Repository directory ready at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of the loadable files, in directory listing order.
    ///
    /// The order is whatever the filesystem reports and differs between
    /// platforms; use it for display only.
    pub fn list_candidates(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if FileFormat::from_file_name(&name).is_supported() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Source for a file listed by [`Repository::list_candidates`].
    pub fn source(&self, name: &str) -> DatasetSource {
        DatasetSource::Repository {
            name: name.to_string(),
            path: self.dir.join(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("data");

        let repo = Repository::open(&dir).unwrap();
        assert!(dir.is_dir());

        // Opening again is harmless.
        Repository::open(&dir).unwrap();
        assert!(repo.list_candidates().unwrap().is_empty());
    }

    #[test]
    fn candidates_filtered_by_extension() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["a.csv", "b.xlsx", "c.parquet", "d.json", "e.txt", "f.CSV", "notes"] {
            std::fs::write(tmp.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(tmp.path().join("folder.csv")).unwrap();

        let repo = Repository::open(tmp.path()).unwrap();
        let mut names = repo.list_candidates().unwrap();
        names.sort();
        assert_eq!(names, vec!["a.csv", "b.xlsx", "c.parquet", "d.json"]);
    }

    #[test]
    fn upload_wins_over_selection() {
        let repo = Repository::open(tempfile::tempdir().unwrap().path()).unwrap();
        let upload = Upload::new("up.csv", b"a\n1\n".to_vec());

        let resolved = resolve(Some(upload.clone()), Some(repo.source("local.csv")));
        assert_eq!(resolved, Some(DatasetSource::Upload(upload)));

        let resolved = resolve(None, Some(repo.source("local.csv"))).unwrap();
        assert_eq!(resolved.name(), "local.csv");

        assert_eq!(resolve(None, None), None);
    }

    #[test]
    fn sources_open_their_content() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("x.csv"), b"a\n1\n").unwrap();
        let repo = Repository::open(tmp.path()).unwrap();

        let mut text = String::new();
        repo.source("x.csv").open().unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "a\n1\n");

        let upload = DatasetSource::Upload(Upload::new("y.csv", b"b\n2\n".to_vec()));
        let mut text = String::new();
        upload.open().unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "b\n2\n");

        assert!(repo.source("missing.csv").open().is_err());
    }

    #[test]
    fn upload_from_path_keeps_file_name() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.json");
        std::fs::write(&path, b"[]").unwrap();

        let upload = Upload::from_path(&path).unwrap();
        assert_eq!(upload.name, "report.json");
        assert_eq!(upload.bytes, b"[]");
    }
}
