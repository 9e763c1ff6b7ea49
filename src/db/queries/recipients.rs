use crate::models::recipient::{NewRecipient, Recipient};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::debug;

fn map_row(row: &Row<'_>) -> rusqlite::Result<Recipient> {
    Ok(Recipient {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
    })
}

pub fn list_recipients(conn: &Connection) -> rusqlite::Result<Vec<Recipient>> {
    let mut stmt = conn.prepare("SELECT id, name, address FROM recipients ORDER BY name, id")?;
    let recipients = stmt.query_map([], map_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(recipients)
}

pub fn get_recipient(conn: &Connection, id: i64) -> rusqlite::Result<Option<Recipient>> {
    conn.query_row(
        "SELECT id, name, address FROM recipients WHERE id = ?",
        [id],
        map_row,
    )
    .optional()
}

/// Recipients among `ids`, in id order. Unknown ids are skipped.
pub fn get_recipients(conn: &Connection, ids: &[i64]) -> rusqlite::Result<Vec<Recipient>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, name, address FROM recipients WHERE id IN ({}) ORDER BY id",
        vec!["?"; ids.len()].join(", ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let recipients = stmt
        .query_map(params_from_iter(ids), map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(recipients)
}

pub fn create_recipient(conn: &Connection, recipient: &NewRecipient) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO recipients (name, address) VALUES (?, ?)",
        params![recipient.name, recipient.address],
    )?;
    let id = conn.last_insert_rowid();
    debug!(recipient_id = id, name = %recipient.name, "Created recipient");
    Ok(id)
}
