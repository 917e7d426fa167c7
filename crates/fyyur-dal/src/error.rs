pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Show references {entity} {id}, which does not exist")]
    DanglingReference { entity: &'static str, id: i64 },

    #[error("Malformed {field} in record {id}: {reason}")]
    MalformedData {
        field: &'static str,
        id: i64,
        reason: String,
    },

    #[error("{entity} {id} still has {count} show(s)")]
    HasDependents {
        entity: &'static str,
        id: i64,
        count: u64,
    },
}

impl Error {
    pub(crate) fn not_found(entity: &str, id: i64) -> Self {
        Error::RecordNotFound(format!("{entity} {id}"))
    }

    /// Unique or foreign key violation reported by database
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Error::DatabaseError(sqlx::Error::Database(e)) => matches!(
                e.kind(),
                sqlx::error::ErrorKind::UniqueViolation | sqlx::error::ErrorKind::ForeignKeyViolation
            ),
            _ => false,
        }
    }
}
