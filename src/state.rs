use std::path::Path;

use rusty_sql::data::export::export_csv;
use rusty_sql::{
    resolve, AnalysisSession, AppConfig, ColumnSummary, DatasetSource, Repository, Upload,
};

// ---------------------------------------------------------------------------
// Status messages
// ---------------------------------------------------------------------------

/// A banner shown to the user, coloured by severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
}

impl Status {
    pub fn message(&self) -> &str {
        match self {
            Status::Info(m) | Status::Success(m) | Status::Warning(m) | Status::Error(m) => m,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Local directory of candidate files (None if it could not be created).
    pub repository: Option<Repository>,

    /// Loadable file names in the repository, in listing order.
    pub candidates: Vec<String>,

    /// Repository file chosen in the sidebar.
    pub selected: Option<String>,

    /// File picked through the upload dialog. Hides the repository selection.
    pub upload: Option<Upload>,

    /// Loaded table, query engine and last result.
    pub session: AnalysisSession,

    /// Column names and types of the loaded table.
    pub description: Vec<ColumnSummary>,

    /// Text of the SQL editor.
    pub sql: String,

    /// Outcome of the last load (or the empty-state prompt).
    pub load_status: Option<Status>,

    /// Outcome of the last query.
    pub query_status: Option<Status>,

    /// Set whenever the chosen source changes; the next `sync` reloads.
    source_changed: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let repository = match Repository::open(&config.data_dir) {
            Ok(repo) => Some(repo),
            Err(e) => {
                log::error!(
                    "Cannot use {} as repository: {e}",
                    config.data_dir.display()
                );
                None
            }
        };

        let mut state = Self {
            sql: config.default_query.clone(),
            config,
            repository,
            candidates: Vec::new(),
            selected: None,
            upload: None,
            session: AnalysisSession::new(),
            description: Vec::new(),
            load_status: None,
            query_status: None,
            source_changed: true,
        };
        state.refresh_candidates();
        state
    }

    /// Re-read the repository listing. Keeps the selection if the file is
    /// still there, otherwise falls back to the first candidate.
    pub fn refresh_candidates(&mut self) {
        self.candidates = match &self.repository {
            Some(repo) => repo.list_candidates().unwrap_or_else(|e| {
                log::error!("Failed to list {}: {e}", repo.dir().display());
                Vec::new()
            }),
            None => Vec::new(),
        };

        let still_listed = self
            .selected
            .as_ref()
            .is_some_and(|name| self.candidates.contains(name));
        if !still_listed {
            self.selected = self.candidates.first().cloned();
            self.source_changed = true;
        }
    }

    pub fn set_upload(&mut self, upload: Upload) {
        log::info!("Uploaded {} ({} bytes)", upload.name, upload.bytes.len());
        self.upload = Some(upload);
        self.source_changed = true;
    }

    pub fn clear_upload(&mut self) {
        if self.upload.take().is_some() {
            self.source_changed = true;
        }
    }

    pub fn select(&mut self, name: &str) {
        if self.selected.as_deref() != Some(name) {
            self.selected = Some(name.to_string());
            self.source_changed = true;
        }
    }

    /// Repository selection is only offered while no upload is active.
    pub fn selection_offered(&self) -> bool {
        self.upload.is_none()
    }

    fn resolved_source(&self) -> Option<DatasetSource> {
        let selection = if self.selection_offered() {
            self.repository
                .as_ref()
                .zip(self.selected.as_deref())
                .map(|(repo, name)| repo.source(name))
        } else {
            None
        };
        resolve(self.upload.clone(), selection)
    }

    /// Reload the dataset if the chosen source changed since the last call.
    pub fn sync(&mut self) {
        if !self.source_changed {
            return;
        }
        self.source_changed = false;
        self.description.clear();
        self.query_status = None;

        let Some(source) = self.resolved_source() else {
            self.session.clear();
            self.load_status = Some(Status::Warning(
                "No file uploaded or selected. Please upload a file to proceed.".to_string(),
            ));
            return;
        };

        self.load_status = Some(match self.session.load(&source) {
            Ok(table) => {
                self.description = table.describe();
                Status::Success(format!(
                    "File loaded successfully: {} ({} rows, {} columns)",
                    source.name(),
                    table.num_rows(),
                    table.num_columns()
                ))
            }
            Err(e) => Status::Error(format!("Error loading file: {e}")),
        });
    }

    /// Execute the SQL editor's text against the loaded table.
    pub fn run_query(&mut self) {
        self.query_status = Some(match self.session.run(&self.sql) {
            Ok(result) => Status::Info(format!("{} rows returned", result.num_rows())),
            Err(e) => Status::Error(format!("Error in query: {e}")),
        });
    }

    /// Write the last query result to `path` as CSV.
    pub fn export_results(&mut self, path: &Path) {
        let Some(result) = self.session.result() else {
            return;
        };
        self.query_status = Some(match export_csv(result, path) {
            Ok(rows) => {
                log::info!("Exported {rows} rows to {}", path.display());
                Status::Success(format!("Exported {rows} rows to {}", path.display()))
            }
            Err(e) => {
                log::error!("Export to {} failed: {e}", path.display());
                Status::Error(format!("Export failed: {e}"))
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(files: &[(&str, &str)]) -> (tempfile::TempDir, AppState) {
        let tmp = tempfile::tempdir().unwrap();
        for (name, text) in files {
            std::fs::write(tmp.path().join(name), text).unwrap();
        }
        let config = AppConfig {
            data_dir: tmp.path().to_path_buf(),
            ..AppConfig::default()
        };
        (tmp, AppState::new(config))
    }

    #[test]
    fn empty_repository_shows_prompt() {
        let (_tmp, mut state) = state_with(&[]);
        state.sync();

        assert!(matches!(state.load_status, Some(Status::Warning(_))));
        assert!(!state.session.is_loaded());
    }

    #[test]
    fn first_candidate_is_loaded() {
        let (_tmp, mut state) = state_with(&[("only.csv", "a,b\n1,2\n")]);
        state.sync();

        assert_eq!(state.selected.as_deref(), Some("only.csv"));
        assert!(matches!(state.load_status, Some(Status::Success(_))));
        assert_eq!(state.description.len(), 2);

        state.run_query();
        assert_eq!(state.session.result().unwrap().num_rows(), 1);
    }

    #[test]
    fn upload_overrides_and_clears() {
        let (_tmp, mut state) = state_with(&[("local.csv", "a\n1\n")]);
        state.sync();

        state.set_upload(Upload::new("up.json", br#"[{"z": 1}, {"z": 2}]"#.to_vec()));
        assert!(!state.selection_offered());
        state.sync();
        assert_eq!(state.session.source_name(), Some("up.json"));

        state.clear_upload();
        state.sync();
        assert_eq!(state.session.source_name(), Some("local.csv"));
    }

    #[test]
    fn bad_upload_reports_error() {
        let (_tmp, mut state) = state_with(&[]);
        state.set_upload(Upload::new("notes.txt", b"hello".to_vec()));
        state.sync();

        let Some(Status::Error(msg)) = &state.load_status else {
            panic!("expected an error, got {:?}", state.load_status);
        };
        assert!(msg.contains(".txt"));
        assert!(!state.session.is_loaded());
    }

    #[test]
    fn query_errors_are_reported() {
        let (_tmp, mut state) = state_with(&[("t.csv", "a\n1\n")]);
        state.sync();

        state.sql = "SELEKT * FROM data".to_string();
        state.run_query();
        assert!(matches!(state.query_status, Some(Status::Error(_))));
        assert!(state.session.is_loaded());
    }

    #[test]
    fn export_writes_csv() {
        let (tmp, mut state) = state_with(&[("t.csv", "a\n1\n2\n")]);
        state.sync();
        state.sql = "SELECT a FROM data ORDER BY a DESC".to_string();
        state.run_query();

        let out = tmp.path().join("out.csv");
        state.export_results(&out);
        assert_eq!(std::fs::read_to_string(out).unwrap(), "a\n2\n1\n");
    }
}
