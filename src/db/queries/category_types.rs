use crate::models::category::{CategoryType, NewCategoryType};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

fn map_row(row: &Row<'_>) -> rusqlite::Result<CategoryType> {
    Ok(CategoryType {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

pub fn list_category_types(conn: &Connection) -> rusqlite::Result<Vec<CategoryType>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description
         FROM category_types
         ORDER BY id",
    )?;

    let types = stmt.query_map([], map_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(types)
}

pub fn get_category_type(conn: &Connection, id: i64) -> rusqlite::Result<Option<CategoryType>> {
    conn.query_row(
        "SELECT id, name, description FROM category_types WHERE id = ?",
        [id],
        map_row,
    )
    .optional()
}

pub fn find_category_type_by_name(
    conn: &Connection,
    name: &str,
) -> rusqlite::Result<Option<CategoryType>> {
    conn.query_row(
        "SELECT id, name, description FROM category_types WHERE name = ? ORDER BY id LIMIT 1",
        [name],
        map_row,
    )
    .optional()
}

pub fn create_category_type(conn: &Connection, new: &NewCategoryType) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO category_types (name, description) VALUES (?, ?)",
        params![new.name, new.description],
    )?;
    let id = conn.last_insert_rowid();
    debug!(type_id = id, name = %new.name, "Created category type");
    Ok(id)
}
