use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlacePulseError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing CSV column: {0}")]
    MissingColumn(String),
}
