//! Database-backed document number allocation.
//!
//! Sequences live in `document_counters`, one row per (kind, two-digit
//! year). The counter is advanced atomically with an upsert inside the
//! caller's transaction, so a rolled-back insert never burns a number
//! that was handed to a committed one out of order.

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};

use aperture_core::numbering::{DocumentKind, format_number, two_digit_year};

/// Allocates the next document number for `kind` within the caller's
/// transaction.
///
/// # Errors
///
/// Returns an error if the counter upsert fails.
pub async fn next_document_number<C: ConnectionTrait>(
    conn: &C,
    kind: DocumentKind,
    studio_code: &str,
    on_date: NaiveDate,
) -> Result<String, DbErr> {
    let year = two_digit_year(on_date);

    let row = conn
        .query_one(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r"
            INSERT INTO document_counters (doc_type, year, last_seq)
            VALUES ($1, $2, 1)
            ON CONFLICT (doc_type, year)
            DO UPDATE SET last_seq = document_counters.last_seq + 1
            RETURNING last_seq
            ",
            [kind.as_str().into(), year.into()],
        ))
        .await?
        .ok_or_else(|| DbErr::Custom("counter upsert returned no row".to_string()))?;

    let sequence: i64 = row.try_get("", "last_seq")?;
    Ok(format_number(kind, studio_code, year, sequence))
}
