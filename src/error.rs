use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for job loading, dictionary builds and artifact output.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("corpus file '{}' does not exist", .0.display())]
    CorpusNotFound(PathBuf),
    #[error("job file '{}' does not exist", .0.display())]
    JobNotFound(PathBuf),
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("job file '{}' is malformed: {source}", .path.display())]
    MalformedJob {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid job: {0}")]
    InvalidJob(String),
    #[error("dictionary '{}' is unavailable: {source}", .path.display())]
    DictionaryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("output template '{0}' is unavailable")]
    TemplateUnavailable(String),
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, SampleError>;
