// src/common/db_utils.rs

use crate::common::error::AppError;

// ---
// Helpers de classificação dos erros do sqlx
// ---

/// Erros de conectividade (pool esgotado, socket caído) que o cliente pode repetir.
pub(crate) fn is_unavailable(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_)
    )
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

/// Converte violação de chave única em `Conflict`; o resto segue como erro de banco.
pub(crate) fn conflict_on_unique(error: sqlx::Error, message: &str) -> AppError {
    if is_unique_violation(&error) {
        return AppError::Conflict(message.to_string());
    }
    error.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_errors_are_retryable() {
        assert!(is_unavailable(&sqlx::Error::PoolTimedOut));
        assert!(is_unavailable(&sqlx::Error::PoolClosed));
        assert!(!is_unavailable(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        let error = conflict_on_unique(sqlx::Error::RowNotFound, "duplicated");
        assert!(matches!(error, AppError::DatabaseError(_)));
    }
}
