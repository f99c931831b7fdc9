use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray,
    TimestampMicrosecondArray,
};
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::error::ArrowError;
use arrow::json::reader::infer_json_schema_from_iterator;
use bytes::Bytes;
use calamine::{open_workbook_from_rs, Data, DataType as _, Reader, Xlsx};
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::format::FileFormat;
use super::model::Table;
use crate::error::LoadError;

/// Rows per decoded record batch. Batches are concatenated afterwards.
const BATCH_SIZE: usize = 8192;

const NO_COLUMNS: &str = "No columns to parse from file";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from `reader`.  Dispatch by the extension of `file_name`.
///
/// Supported formats:
/// * `.csv`     – header row, column types inferred from the content
/// * `.xlsx`    – first worksheet, first row is the header
/// * `.parquet` – column types taken from the file schema
/// * `.json`    – records, columns or values oriented (see [`load_json`])
///
/// The reader is consumed fully before decoding. Every failure comes back
/// as a [`LoadError`]; nothing here panics on malformed input.
pub fn load<R: Read>(reader: R, file_name: &str) -> Result<Table, LoadError> {
    let format = FileFormat::from_file_name(file_name);
    debug!("Loading {file_name} as {format}");

    let loaded = match format {
        FileFormat::Csv => read_fully(reader).and_then(|bytes| load_csv(&bytes)),
        FileFormat::Xlsx => read_fully(reader).and_then(load_xlsx),
        FileFormat::Parquet => read_fully(reader).and_then(load_parquet),
        FileFormat::Json => read_fully(reader).and_then(|bytes| load_json(&bytes)),
        FileFormat::Unsupported(ext) => {
            warn!("Rejected {file_name}: unsupported extension .{ext}");
            return Err(LoadError::UnsupportedFormat(ext));
        }
    }
    .and_then(require_columns);

    match &loaded {
        Ok(table) => info!(
            "Loaded {file_name}: {} rows, columns {:?}",
            table.num_rows(),
            table.column_names()
        ),
        Err(e) => warn!("Failed to load {file_name}: {e}"),
    }
    loaded
}

fn read_fully<R: Read>(mut reader: R) -> Result<Vec<u8>, LoadError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn require_columns(table: Table) -> Result<Table, LoadError> {
    if table.num_columns() == 0 {
        return Err(LoadError::LoadFailed(NO_COLUMNS.to_string()));
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Comma-separated text with a header row, read in one pass after a full
/// schema inference pass over every record.
fn load_csv(bytes: &[u8]) -> Result<Table, LoadError> {
    let format = Format::default().with_header(true);
    let (schema, records) = format.infer_schema(Cursor::new(bytes), None)?;
    debug!("CSV schema inferred from {records} records");
    if schema.fields().is_empty() {
        return Err(LoadError::LoadFailed(NO_COLUMNS.to_string()));
    }

    let schema = Arc::new(schema);
    let reader = arrow::csv::ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .build(Cursor::new(bytes))?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    Ok(Table::from_batches(schema, &batches)?)
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// Column type chosen for a worksheet column from its non-empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExcelColumn {
    Boolean,
    Integer,
    Float,
    DateTime,
    Text,
}

/// First worksheet of an `.xlsx` workbook. The first row names the columns.
fn load_xlsx(bytes: Vec<u8>) -> Result<Table, LoadError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::LoadFailed("Workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(LoadError::LoadFailed(NO_COLUMNS.to_string()));
    };
    let body: Vec<&[Data]> = rows.collect();

    let mut fields = Vec::with_capacity(header.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(header.len());

    for (col_idx, title) in header.iter().enumerate() {
        let cells: Vec<Option<&Data>> = body
            .iter()
            .map(|row| row.get(col_idx).filter(|c| !matches!(c, Data::Empty)))
            .collect();

        let kind = infer_excel_column(&cells);
        let (data_type, array) = build_excel_column(&cells, kind);
        debug!("Worksheet column {col_idx} inferred as {kind:?}");

        fields.push(Field::new(excel_text(title), data_type, true));
        columns.push(array);
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
    Ok(Table::new(batch)?)
}

/// Whole-number floats count as integers, since Excel stores every number
/// as a float. Whole numbers outside the `i64` range stay floats. Any mix
/// other than integer/float falls back to text.
fn infer_excel_column(cells: &[Option<&Data>]) -> ExcelColumn {
    let mut inferred: Option<ExcelColumn> = None;

    for cell in cells.iter().flatten() {
        let kind = match cell {
            Data::Bool(_) => ExcelColumn::Boolean,
            Data::Int(_) => ExcelColumn::Integer,
            Data::Float(f) if fits_i64(*f) => ExcelColumn::Integer,
            Data::Float(_) => ExcelColumn::Float,
            Data::DateTime(_) | Data::DateTimeIso(_) => ExcelColumn::DateTime,
            _ => return ExcelColumn::Text,
        };

        inferred = Some(match (inferred, kind) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(ExcelColumn::Integer), ExcelColumn::Float)
            | (Some(ExcelColumn::Float), ExcelColumn::Integer) => ExcelColumn::Float,
            _ => return ExcelColumn::Text,
        });
    }

    // A column with a header and no values holds only nulls.
    inferred.unwrap_or(ExcelColumn::Float)
}

/// `i64::MAX as f64` rounds up to 2^63, hence the strict upper bound.
fn fits_i64(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

fn build_excel_column(cells: &[Option<&Data>], kind: ExcelColumn) -> (DataType, ArrayRef) {
    match kind {
        ExcelColumn::Boolean => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|c| match c {
                    Some(Data::Bool(b)) => Some(*b),
                    _ => None,
                })
                .collect();
            (DataType::Boolean, Arc::new(BooleanArray::from(values)))
        }
        ExcelColumn::Integer => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| match c {
                    Some(Data::Int(i)) => Some(*i),
                    Some(Data::Float(f)) => Some(*f as i64),
                    _ => None,
                })
                .collect();
            (DataType::Int64, Arc::new(Int64Array::from(values)))
        }
        ExcelColumn::Float => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|c| match c {
                    Some(Data::Int(i)) => Some(*i as f64),
                    Some(Data::Float(f)) => Some(*f),
                    _ => None,
                })
                .collect();
            (DataType::Float64, Arc::new(Float64Array::from(values)))
        }
        ExcelColumn::DateTime => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| c.and_then(excel_timestamp_micros))
                .collect();
            (
                DataType::Timestamp(TimeUnit::Microsecond, None),
                Arc::new(TimestampMicrosecondArray::from(values)),
            )
        }
        ExcelColumn::Text => {
            let values: Vec<Option<String>> =
                cells.iter().map(|c| c.map(excel_text)).collect();
            (DataType::Utf8, Arc::new(StringArray::from(values)))
        }
    }
}

fn excel_timestamp_micros(cell: &Data) -> Option<i64> {
    let datetime: NaiveDateTime = cell.as_datetime()?;
    Some(datetime.and_utc().timestamp_micros())
}

fn excel_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Parquet keeps its embedded Arrow schema. Index columns written by
/// Pandas (`__index_level_0__`, ...) are dropped.
fn load_parquet(bytes: Vec<u8>) -> Result<Table, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::from(bytes))?;
    let schema = builder.schema().clone();
    let reader = builder.with_batch_size(BATCH_SIZE).build()?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    let batch = concat_batches(&schema, &batches)?;
    let keep: Vec<usize> = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| !is_pandas_index(f.name()))
        .map(|(i, _)| i)
        .collect();
    let batch = if keep.len() == schema.fields().len() {
        batch
    } else {
        batch.project(&keep)?
    };

    Ok(Table::new(batch)?)
}

fn is_pandas_index(name: &str) -> bool {
    name.starts_with("__index_level_") && name.ends_with("__")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepted JSON shapes:
///
/// ```json
/// [{"name": "a", "qty": 1}, {"name": "b", "qty": 2}]
/// {"name": ["a", "b"], "qty": [1, 2]}
/// {"name": {"0": "a", "1": "b"}, "qty": {"0": 1, "1": 2}}
/// [["a", 1], ["b", 2]]
/// ```
///
/// The last form gets positional column names `0`, `1`, ...
/// Columns with conflicting scalar types are read as text.
fn load_json(bytes: &[u8]) -> Result<Table, LoadError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let (declared, records) = json_records(root)?;

    // Columns without values still name the table's columns.
    if records.is_empty() {
        let fields: Vec<Field> = declared
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect();
        return Ok(Table::new(RecordBatch::new_empty(Arc::new(Schema::new(fields))))?);
    }

    let schema = infer_json_schema_from_iterator(records.iter().map(Ok::<_, ArrowError>))?;
    let schema = Arc::new(schema);

    let mut decoder = arrow::json::ReaderBuilder::new(schema.clone())
        .with_batch_size(BATCH_SIZE)
        .with_coerce_primitive(true)
        .build_decoder()?;

    let mut batches = Vec::new();
    for chunk in records.chunks(BATCH_SIZE) {
        decoder.serialize(chunk)?;
        if let Some(batch) = decoder.flush()? {
            batches.push(batch);
        }
    }

    Ok(Table::from_batches(schema, &batches)?)
}

/// Normalize any accepted shape into a list of JSON objects, one per row.
/// Column-oriented input also returns its column names, in file order.
fn json_records(root: JsonValue) -> Result<(Vec<String>, Vec<JsonValue>), LoadError> {
    match root {
        JsonValue::Array(items) => Ok((
            Vec::new(),
            items
                .into_iter()
                .map(|item| match item {
                    JsonValue::Object(_) => item,
                    JsonValue::Array(values) => positional_record(values),
                    scalar => positional_record(vec![scalar]),
                })
                .collect(),
        )),
        JsonValue::Object(columns) => columns_to_records(columns),
        other => Err(LoadError::LoadFailed(format!(
            "Expected a JSON array or object at the top level, found {other}"
        ))),
    }
}

fn positional_record(values: Vec<JsonValue>) -> JsonValue {
    let record: Map<String, JsonValue> = values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i.to_string(), v))
        .collect();
    JsonValue::Object(record)
}

/// Pivot column-oriented JSON into records. Rows follow the order in which
/// index labels first appear; cells a column lacks become null.
fn columns_to_records(
    columns: Map<String, JsonValue>,
) -> Result<(Vec<String>, Vec<JsonValue>), LoadError> {
    let mut names = Vec::with_capacity(columns.len());
    let mut rows: Vec<Map<String, JsonValue>> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (name, column) in columns {
        let cells: Vec<(String, JsonValue)> = match column {
            JsonValue::Array(values) => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            JsonValue::Object(by_label) => by_label.into_iter().collect(),
            scalar => {
                return Err(LoadError::LoadFailed(format!(
                    "Column '{name}' holds a scalar ({scalar}); expected an array or an index-keyed object"
                )))
            }
        };

        for (label, value) in cells {
            let row = *positions.entry(label).or_insert_with(|| {
                rows.push(Map::new());
                rows.len() - 1
            });
            rows[row].insert(name.clone(), value);
        }
        names.push(name);
    }

    let records = rows
        .into_iter()
        .map(|mut row| {
            let ordered: Map<String, JsonValue> = names
                .iter()
                .map(|name| (name.clone(), row.remove(name).unwrap_or(JsonValue::Null)))
                .collect();
            JsonValue::Object(ordered)
        })
        .collect();
    Ok((names, records))
}
