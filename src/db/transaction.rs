//! Commit-or-rollback handling shared by the adapters.

use sqlx::Transaction;
use tracing::warn;

use crate::db::{DbResult, StoreError};

/// Commit `tx` when `result` is a success, roll it back otherwise.
///
/// The error in `result` is returned after a rollback. A failing rollback is
/// only logged.
pub(crate) async fn finish<DB, T>(
    tx: Transaction<'_, DB>,
    result: DbResult<T>,
    translate: fn(&str, sqlx::Error) -> StoreError,
) -> DbResult<T>
where
    DB: sqlx::Database,
{
    match result {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| translate("Could not commit transaction", e))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = tx.rollback().await {
                warn!(error = %rollback, "Rollback failed");
            }
            Err(err)
        }
    }
}
