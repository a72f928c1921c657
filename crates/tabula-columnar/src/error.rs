use crate::types::ScalarKind;

pub type TableResult<T> = Result<T, TableError>;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("column {column} has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column {column} has {values} values but {nulls} null flags")]
    LengthMismatch {
        column: String,
        values: usize,
        nulls: usize,
    },

    #[error("unknown column: {0}")]
    ColumnNotFound(String),

    #[error("type mismatch for column {column}: expected {expected}, found {actual}")]
    TypeMismatch {
        column: String,
        expected: ScalarKind,
        actual: ScalarKind,
    },

    #[error("invalid argument: {0}")]
    Config(String),

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("aggregation failed: {0}")]
    Aggregation(String),
}

impl TableError {
    /// Whether this error reports an invalid table shape (duplicate names or mismatched lengths).
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            TableError::DuplicateColumn(_)
                | TableError::ColumnLengthMismatch { .. }
                | TableError::LengthMismatch { .. }
        )
    }
}
