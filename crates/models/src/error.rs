use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackofficeError {
    #[error("Invalid odds: {0}")]
    InvalidOdds(String),

    #[error("Invalid stake amount: {amount}")]
    InvalidStake { amount: String },

    #[error("Score not allowed for match {match_id} with status {status}")]
    ScoreNotAllowed { match_id: String, status: String },

    #[error("Bet {bet_id} potential win {actual} does not match stake x odds ({expected})")]
    InvalidPayout {
        bet_id: String,
        expected: String,
        actual: String,
    },

    #[error("Bet {bet_id} already settled")]
    AlreadySettled { bet_id: String },

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BackofficeError>;
