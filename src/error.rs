use thiserror::Error;

/// Why a request failed to authenticate.
///
/// Every variant produces the same 401 response at the boundary; the
/// variants exist for logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("token extraction failed: {0}")]
    Extraction(&'static str),
    #[error("signature invalid")]
    SignatureInvalid,
    #[error("signing algorithm mismatch")]
    AlgorithmMismatch,
    #[error("token expired")]
    Expired,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("invalid credentials")]
    AuthenticationFailed,
    #[error("authorization denied")]
    AuthorizationDenied,
    #[error("refresh disabled")]
    RefreshDisabled,
    #[error("refresh window exceeded")]
    RefreshWindowExceeded,
    #[error("signing failed: {0}")]
    Signing(String),
}

impl AuthError {
    /// Stable label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "EXTRACTION_FAILURE",
            Self::SignatureInvalid => "SIGNATURE_INVALID",
            Self::AlgorithmMismatch => "ALGORITHM_MISMATCH",
            Self::Expired => "EXPIRED",
            Self::Malformed(_) => "MALFORMED",
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::AuthorizationDenied => "AUTHORIZATION_DENIED",
            Self::RefreshDisabled => "REFRESH_DISABLED",
            Self::RefreshWindowExceeded => "REFRESH_WINDOW_EXCEEDED",
            Self::Signing(_) => "SIGNING_FAILURE",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::InvalidSignature => Self::SignatureInvalid,
            ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => Self::AlgorithmMismatch,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed(e.to_string()),
        }
    }
}
