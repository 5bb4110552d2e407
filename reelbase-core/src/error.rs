use reelbase_model::ModelError;
use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy for catalog operations.
///
/// `Constraint` and `Storage` are the two variants the transactional writer
/// reacts to: both trigger rollback plus blob compensation on the create
/// path. Nothing is ever swallowed; every variant carries enough context to
/// render a user-facing message.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("constraint violated on {context}: {message}")]
    Constraint { context: String, message: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("storage error at {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl AsRef<Uuid>) -> Self {
        CatalogError::NotFound {
            kind,
            id: *id.as_ref(),
        }
    }

    pub fn storage(path: impl Into<String>, source: std::io::Error) -> Self {
        CatalogError::Storage {
            path: path.into(),
            source,
        }
    }

    /// Classify a database error surfaced while writing under `context`
    /// (a table or relation name).
    ///
    /// Postgres integrity rejections (foreign key, uniqueness, check) become
    /// `Constraint`; everything else stays a `Database` error.
    pub fn from_db(context: &str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            match db.code().as_deref() {
                Some("23503") | Some("23505") | Some("23514") => {
                    return CatalogError::Constraint {
                        context: context.to_string(),
                        message: db.message().to_string(),
                    };
                }
                _ => {}
            }
        }
        CatalogError::Database(err)
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, CatalogError::Constraint { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, CatalogError::Storage { .. })
    }
}

impl From<ModelError> for CatalogError {
    fn from(err: ModelError) -> Self {
        let field = match &err {
            ModelError::InvalidRating(_) => "rating",
            ModelError::InvalidKind(_) => "kind",
            ModelError::InvalidFileSlot(_) => "file",
            ModelError::InvalidId(_) => "id",
        };
        CatalogError::validation(field, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
