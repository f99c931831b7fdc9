//! Per-user analysis state: the loaded table, its query session and the
//! last query result.

use log::{error, info};

use crate::data::loader;
use crate::data::model::Table;
use crate::data::source::DatasetSource;
use crate::error::{Error, LoadError, QueryError};
use crate::query::QuerySession;

/// Everything one interactive session owns.
///
/// Each user gets an independent value; nothing here is shared.
#[derive(Default)]
pub struct AnalysisSession {
    source_name: Option<String>,
    table: Option<Table>,
    query: Option<QuerySession>,
    result: Option<Table>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `source` and register it for querying.
    ///
    /// The previous table, engine and result are dropped first, so a failed
    /// load leaves the session empty rather than pointing at stale data.
    pub fn load(&mut self, source: &DatasetSource) -> Result<&Table, Error> {
        self.clear();

        let name = source.name().to_string();
        let reader = source.open().map_err(LoadError::from)?;
        let table = loader::load(reader, &name)?;
        let query = QuerySession::prepare(&table)?;

        info!("Session ready on {name}");
        self.source_name = Some(name);
        self.query = Some(query);
        Ok(self.table.insert(table))
    }

    /// Run `sql` against the loaded table.
    ///
    /// On failure the table and engine stay in place so a corrected query
    /// can be retried; only the previous result is discarded.
    pub fn run(&mut self, sql: &str) -> Result<&Table, QueryError> {
        self.result = None;

        let Some(query) = &self.query else {
            return Err(QueryError::QueryFailed("No dataset loaded".to_string()));
        };

        match query.run(sql) {
            Ok(result) => Ok(self.result.insert(result)),
            Err(e) => {
                error!("Query failed: {e}");
                Err(e)
            }
        }
    }

    /// Drop the table, engine and result.
    pub fn clear(&mut self) {
        self.source_name = None;
        self.table = None;
        self.query = None;
        self.result = None;
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn result(&self) -> Option<&Table> {
        self.result.as_ref()
    }

    /// Whether query controls should be offered.
    pub fn is_loaded(&self) -> bool {
        self.query.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::Upload;

    fn upload(name: &str, text: &str) -> DatasetSource {
        DatasetSource::Upload(Upload::new(name, text.as_bytes().to_vec()))
    }

    #[test]
    fn load_then_query() {
        let mut session = AnalysisSession::new();
        session
            .load(&upload("people.csv", "id,name\n1,a\n2,b\n3,c\n"))
            .unwrap();
        assert!(session.is_loaded());
        assert_eq!(session.source_name(), Some("people.csv"));

        let result = session.run("SELECT name FROM data WHERE id > 1").unwrap();
        assert_eq!(result.num_rows(), 2);
        assert!(session.result().is_some());
    }

    #[test]
    fn failed_load_leaves_no_table() {
        let mut session = AnalysisSession::new();
        session.load(&upload("good.csv", "a\n1\n")).unwrap();

        let err = session.load(&upload("notes.txt", "hello")).unwrap_err();
        assert!(matches!(err, Error::Load(LoadError::UnsupportedFormat(ext)) if ext == "txt"));
        assert!(session.table().is_none());
        assert!(!session.is_loaded());
        assert!(session.run("SELECT * FROM data").is_err());
    }

    #[test]
    fn failed_query_keeps_table() {
        let mut session = AnalysisSession::new();
        session.load(&upload("good.csv", "a\n1\n2\n")).unwrap();
        session.run("SELECT * FROM data").unwrap();

        assert!(session.run("SELEKT * FROM data").is_err());
        assert!(session.result().is_none());
        assert!(session.table().is_some());

        let result = session.run("SELECT a FROM data").unwrap();
        assert_eq!(result.num_rows(), 2);
    }

    #[test]
    fn reload_replaces_data() {
        let mut session = AnalysisSession::new();
        session.load(&upload("first.csv", "x\n1\n2\n3\n")).unwrap();
        session.load(&upload("second.json", r#"[{"y": 1}]"#)).unwrap();

        assert_eq!(session.source_name(), Some("second.json"));
        assert!(session.run("SELECT x FROM data").is_err());
        assert_eq!(session.run("SELECT y FROM data").unwrap().num_rows(), 1);
    }

    #[test]
    fn query_without_data_fails() {
        let mut session = AnalysisSession::new();
        assert_eq!(
            session.run("SELECT 1").unwrap_err(),
            QueryError::QueryFailed("No dataset loaded".to_string())
        );
    }
}
