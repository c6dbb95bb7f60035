use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScoringError>;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("no fastest-lap candidate in session {session_id}, simsession {simsession_number}")]
    NoFastLapCandidate {
        session_id: i64,
        simsession_number: i64,
    },
}
