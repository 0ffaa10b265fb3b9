//! Domain errors and their HTTP mapping.

use showtime_core::catalog::CatalogError;
use showtime_web::AppError;
use thiserror::Error;

/// Errors from the booking engine.
#[derive(Error, Debug)]
pub enum BookingError {
    /// The seat is missing, belongs to another show, or is already sold.
    #[error("seat unavailable")]
    SeatUnavailable,

    /// The booking does not exist or belongs to someone else.
    #[error("booking not found")]
    BookingNotFound,

    /// The show does not exist.
    #[error("show not found")]
    ShowNotFound,

    /// The request was malformed.
    #[error("{0}")]
    Validation(String),

    /// No authenticated user.
    #[error("login required")]
    Unauthenticated,

    /// Storage failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Errors from registration and login.
#[derive(Error, Debug)]
pub enum AccountError {
    /// Missing fields or an already registered email.
    #[error("{0}")]
    Validation(String),

    /// Unknown email or wrong password.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Hashing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Storage failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::SeatUnavailable => Self::conflict(err.to_string()),
            BookingError::BookingNotFound | BookingError::ShowNotFound => {
                Self::not_found(err.to_string())
            }
            BookingError::Validation(message) => Self::validation(message),
            BookingError::Unauthenticated => Self::unauthorized(err.to_string()),
            BookingError::Catalog(source) => {
                Self::internal("An internal error occurred").with_source(source)
            }
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(message) => Self::bad_request(message),
            AccountError::InvalidCredentials => Self::bad_request(err.to_string()),
            AccountError::PasswordHash(_) => {
                Self::internal("An internal error occurred").with_source(err)
            }
            AccountError::Catalog(source) => {
                Self::internal("An internal error occurred").with_source(source)
            }
        }
    }
}

/// Map a bare catalog failure (read paths) to a 500.
#[must_use]
pub fn catalog_failure(err: CatalogError) -> AppError {
    AppError::internal("An internal error occurred").with_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_booking_error_status_mapping() {
        let cases = [
            (BookingError::SeatUnavailable, StatusCode::CONFLICT, "seat unavailable"),
            (BookingError::BookingNotFound, StatusCode::NOT_FOUND, "booking not found"),
            (BookingError::ShowNotFound, StatusCode::NOT_FOUND, "show not found"),
            (
                BookingError::Validation("Please select 2 seat(s).".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "Please select 2 seat(s).",
            ),
            (BookingError::Unauthenticated, StatusCode::UNAUTHORIZED, "login required"),
        ];

        for (err, status, message) in cases {
            let app: AppError = err.into();
            assert_eq!(app.status(), status);
            assert_eq!(app.message(), message);
        }
    }

    #[test]
    fn test_catalog_error_hidden_behind_500() {
        let app: AppError = BookingError::Catalog(CatalogError::Database("pool timed out".into())).into();
        assert_eq!(app.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!app.message().contains("pool"));
    }

    #[test]
    fn test_account_errors_are_400() {
        let app: AppError = AccountError::InvalidCredentials.into();
        assert_eq!(app.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.message(), "Invalid email or password.");

        let app: AppError = AccountError::Validation("Email already registered.".into()).into();
        assert_eq!(app.status(), StatusCode::BAD_REQUEST);
    }
}
