use crate::common::error::AppError;

/// Converte violação de chave única em um erro de domínio; o resto vira `DatabaseError`.
pub(crate) fn map_unique_violation(e: sqlx::Error, on_conflict: AppError) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_conflict;
        }
    }
    AppError::DatabaseError(e)
}
