use std::fmt;

/// Extensions offered for loading, in display order.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["csv", "xlsx", "parquet", "json"];

/// File format resolved from a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Parquet,
    Json,
    /// Anything else, carrying the rejected extension.
    Unsupported(String),
}

impl FileFormat {
    /// Dispatch on the last dot-separated segment of `name`.
    ///
    /// Matching is case-sensitive. A name without a dot is taken whole as
    /// its extension.
    pub fn from_file_name(name: &str) -> Self {
        let ext = name.rsplit('.').next().unwrap_or(name);
        match ext {
            "csv" => FileFormat::Csv,
            "xlsx" => FileFormat::Xlsx,
            "parquet" => FileFormat::Parquet,
            "json" => FileFormat::Json,
            other => FileFormat::Unsupported(other.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FileFormat::Unsupported(_))
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Csv => f.write_str("CSV"),
            FileFormat::Xlsx => f.write_str("Excel"),
            FileFormat::Parquet => f.write_str("Parquet"),
            FileFormat::Json => f.write_str("JSON"),
            FileFormat::Unsupported(ext) => write!(f, ".{ext}"),
        }
    }
}
