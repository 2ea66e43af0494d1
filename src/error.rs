//! Error types surfaced by the coordinator and the ride stores

/// Failure of a coordinator operation.
///
/// Every variant maps onto exactly one [`ErrorKind`]; a transport boundary
/// should translate the kind and pass the message through untouched.
#[derive(thiserror::Error, Debug)]
pub enum RideError {
    #[error("caller must be logged in")]
    Unauthenticated,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    Validation,
    NotFound,
    BadRequest,
    Conflict,
    Store,
    Internal,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("sled failure: {0}")]
    Sled(#[from] sled::Error),
    #[error("failed to encode ride: {0}")]
    Encode(String),
    #[error("failed to decode ride: {0}")]
    Decode(#[from] minicbor::decode::Error),
    #[error("ride store lock poisoned")]
    Poisoned,
}

impl RideError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RideError::Unauthenticated => ErrorKind::Unauthenticated,
            RideError::Forbidden(_) => ErrorKind::Forbidden,
            RideError::Validation(_) => ErrorKind::Validation,
            RideError::NotFound(_) => ErrorKind::NotFound,
            RideError::BadRequest(_) => ErrorKind::BadRequest,
            RideError::Conflict(_) => ErrorKind::Conflict,
            RideError::Store(_) => ErrorKind::Store,
            RideError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn ride_not_found(ride_id: &str) -> Self {
        RideError::NotFound(format!("ride not found with id: {ride_id}"))
    }
}

impl ErrorKind {
    /// Stable code a boundary can put on the wire
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Store => "STORE_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Caller mistakes, as opposed to failures of the store or the process
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorKind::Store | ErrorKind::Internal)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
