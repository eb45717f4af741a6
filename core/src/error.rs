use crate::types::Coord;
use jiraigen_protocol::CellCode;
use thiserror::Error;

/// Everything that can go wrong between a user gesture and an applied
/// snapshot, split by who is at fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never completed (network down, fetch rejected).
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with an error status; the message is the
    /// server's own and is shown to the user verbatim.
    #[error("{0}")]
    Business(String),
    /// A response arrived but violates the wire contract.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unknown cell code {code} at row {row}, col {col}")]
    UnknownCellCode { code: CellCode, row: Coord, col: Coord },
    #[error("board shape {found_rows}x{found_cols} does not match declared {expected_rows}x{expected_cols}")]
    BoardShape {
        expected_rows: usize,
        expected_cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub type Result<T> = core::result::Result<T, ClientError>;
