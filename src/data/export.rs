//! CSV export of tables.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use arrow::csv::WriterBuilder;
use arrow::error::ArrowError;

use super::model::Table;

/// Write `table` as CSV with a header row and no index column.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), ArrowError> {
    let mut writer = WriterBuilder::new().with_header(true).build(writer);
    writer.write(table.batch())
}

/// Serialize `table` to CSV bytes.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>, ArrowError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(buf)
}

/// Export `table` to a CSV file at `path`, returning the number of rows written.
pub fn export_csv(table: &Table, path: &Path) -> std::io::Result<usize> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_csv(table, &mut writer).map_err(|e| std::io::Error::other(e.to_string()))?;
    writer.flush()?;
    Ok(table.num_rows())
}

impl Table {
    /// CSV rendering of this table. See [`write_csv`].
    pub fn to_csv(&self) -> Result<Vec<u8>, ArrowError> {
        to_csv_bytes(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::array::{Int64Array, RecordBatch, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};

    fn sample() -> Table {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("label", DataType::Utf8, true),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(StringArray::from(vec![Some("a,b"), None])),
            ],
        )
        .unwrap();
        Table::new(batch).unwrap()
    }

    #[test]
    fn csv_has_header_and_no_index() {
        let text = String::from_utf8(sample().to_csv().unwrap()).unwrap();
        assert_eq!(text, "id,label\n1,\"a,b\"\n2,\n");
    }

    #[test]
    fn export_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("query_results.csv");

        let rows = export_csv(&sample(), &path).unwrap();
        assert_eq!(rows, 2);
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("id,label\n"));
    }
}
