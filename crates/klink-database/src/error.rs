//! Translation of sqlx failures into application errors.

use klink_core::error::{AppError, ErrorKind};

/// The statement that failed, which decides how constraint violations read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    /// `INSERT` or `UPDATE`.
    Write,
    /// `DELETE`.
    Delete,
}

/// Map a sqlx error from a statement on `table`.
///
/// Unique violations become 409 naming the field, foreign-key violations a
/// 400 on writes or a 409 on deletes, check violations a 400.
pub fn map_sqlx_error(err: sqlx::Error, table: &str, op: WriteOp) -> AppError {
    let sqlx::Error::Database(ref db_err) = err else {
        return AppError::with_source(
            ErrorKind::Database,
            format!("Database operation on {table} failed"),
            err,
        );
    };

    let constraint = db_err.constraint().unwrap_or_default().to_string();
    if db_err.is_unique_violation() {
        let field = constraint_field(&constraint, table);
        return AppError::conflict(format!(
            "Duplicate field value: {field}. Please use another value!"
        ));
    }
    if db_err.is_foreign_key_violation() {
        return match op {
            WriteOp::Delete => AppError::conflict("Already applied. Could not be deleted."),
            WriteOp::Write => {
                let field = constraint_field(&constraint, table);
                AppError::validation(format!("Invalid reference: {field}"))
            }
        };
    }
    if db_err.is_check_violation() {
        let field = constraint_field(&constraint, table);
        return AppError::validation(format!("Invalid input data. {field} is out of range"));
    }

    AppError::with_source(
        ErrorKind::Database,
        format!("Database operation on {table} failed"),
        err,
    )
}

/// Derive a field name from a Postgres default constraint name such as
/// `users_email_key` or `products_category_id_fkey`.
fn constraint_field(constraint: &str, table: &str) -> String {
    let trimmed = constraint
        .strip_prefix(table)
        .and_then(|s| s.strip_prefix('_'))
        .unwrap_or(constraint);
    let trimmed = ["_fkey", "_key", "_check"]
        .iter()
        .find_map(|suffix| trimmed.strip_suffix(suffix))
        .unwrap_or(trimmed);
    trimmed.to_string()
}
