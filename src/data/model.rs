use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use arrow::array::RecordBatch;
use arrow::compute::concat_batches;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::util::display::{ArrayFormatter, FormatOptions};

// ---------------------------------------------------------------------------
// ColumnKind – coarse classification of a column's Arrow type
// ---------------------------------------------------------------------------

/// The scalar family a column belongs to, mirroring common Pandas dtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    String,
    Integer,
    Float,
    Boolean,
    /// Dates, times, timestamps and durations.
    Temporal,
    /// Nested, binary or anything else without a scalar family.
    Generic,
}

impl ColumnKind {
    /// Classify an Arrow data type.
    pub fn of(data_type: &DataType) -> Self {
        match data_type {
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => ColumnKind::String,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ColumnKind::Integer,
            DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal128(..)
            | DataType::Decimal256(..) => ColumnKind::Float,
            DataType::Boolean => ColumnKind::Boolean,
            DataType::Date32
            | DataType::Date64
            | DataType::Time32(_)
            | DataType::Time64(_)
            | DataType::Timestamp(..)
            | DataType::Duration(_)
            | DataType::Interval(_) => ColumnKind::Temporal,
            DataType::Dictionary(_, value) => ColumnKind::of(value),
            _ => ColumnKind::Generic,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnKind::String => "string",
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Temporal => "datetime",
            ColumnKind::Generic => "object",
        };
        f.write_str(label)
    }
}

/// One line of the table description: a column and its type.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    /// Arrow type as displayed, e.g. `Int64` or `Utf8`.
    pub data_type: String,
    pub kind: ColumnKind,
}

// ---------------------------------------------------------------------------
// Table – an in-memory tabular dataset
// ---------------------------------------------------------------------------

/// A fully materialized table backed by a single Arrow record batch.
///
/// Every column has the same number of rows and column names are unique.
/// Loaded datasets and query results share this type.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    /// Wrap a record batch, making column names unique.
    pub fn new(batch: RecordBatch) -> Result<Self, ArrowError> {
        Ok(Self {
            batch: with_unique_names(batch)?,
        })
    }

    /// Concatenate decoded batches into one table.
    ///
    /// `schema` is used as-is when `batches` is empty.
    pub fn from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self, ArrowError> {
        Self::new(concat_batches(&schema, batches)?)
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names in display order.
    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    /// Name and type of every column, in order.
    pub fn describe(&self) -> Vec<ColumnSummary> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| ColumnSummary {
                name: f.name().clone(),
                data_type: f.data_type().to_string(),
                kind: ColumnKind::of(f.data_type()),
            })
            .collect()
    }

    /// One display formatter per column. Nulls render as empty text.
    pub fn formatters(&self) -> Result<Vec<ArrayFormatter<'_>>, ArrowError> {
        let options = FormatOptions::default().with_null("");
        self.batch
            .columns()
            .iter()
            .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Column name normalization
// ---------------------------------------------------------------------------

/// Make column names unique the way Pandas does: blank names become
/// `Unnamed: {index}`, repeats get `.1`, `.2`, ... suffixes.
pub fn unique_column_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for (idx, name) in names.into_iter().enumerate() {
        let name = name.as_ref();
        let base = if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        out.push(candidate);
    }

    out
}

fn with_unique_names(batch: RecordBatch) -> Result<RecordBatch, ArrowError> {
    let schema = batch.schema();
    let names = unique_column_names(schema.fields().iter().map(|f| f.name()));

    let unchanged = schema
        .fields()
        .iter()
        .zip(&names)
        .all(|(f, name)| f.name() == name);
    if unchanged {
        return Ok(batch);
    }

    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .zip(names)
        .map(|(f, name)| f.as_ref().clone().with_name(name))
        .collect();
    let renamed = Schema::new_with_metadata(fields, schema.metadata().clone());

    RecordBatch::try_new(Arc::new(renamed), batch.columns().to_vec())
}
