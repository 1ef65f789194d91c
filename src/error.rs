use crate::objects::ObjectType;
use thiserror::Error;

/// The line of a table that could not be deserialized
#[derive(Debug)]
pub struct LineError {
    pub headers: Vec<String>,
    pub values: Vec<String>,
}

/// An error that can occur when loading or querying a GTFS feed.
#[derive(Error, Debug)]
pub enum Error {
    /// The table is absent from the feed, it is read as an empty table
    #[error("table {0} is missing, it is read as empty")]
    MissingTable(String),
    #[error("Could not read GTFS: {0} is neither a file nor a directory")]
    NotFileNorDirectory(String),
    #[error("'{0}' is not a valid time")]
    MalformedTime(String),
    #[error(
        "malformed record in '{file_name}'{}",
        .line.map(|l| format!(" at line {}", l)).unwrap_or_default()
    )]
    MalformedRecord {
        file_name: String,
        line: Option<u64>,
        #[source]
        source: csv::Error,
        line_in_error: Option<LineError>,
    },
    #[error("{object_type} '{id}' referenced in '{file_name}' is not known")]
    DanglingReference {
        file_name: String,
        object_type: ObjectType,
        id: String,
    },
    #[error("{object_type} '{id}' is defined more than once")]
    DuplicateId { object_type: ObjectType, id: String },
    #[error("no {object_type} found for '{key}'")]
    NotFound { object_type: ObjectType, key: String },
    #[error("impossible to read file")]
    IO(#[from] std::io::Error),
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        file_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    /// All the problems found while loading, when the policy is to fail
    #[error(
        "the feed could not be loaded, {} problem(s) found{}",
        .0.len(),
        .0.first().map(|e| format!(", first one: {}", e)).unwrap_or_default()
    )]
    InvalidFeed(Vec<Error>),
}
