use crate::models::category::{Category, NewCategory};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

fn map_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        type_id: row.get(2)?,
        parent_id: row.get(3)?,
        icon_file: row.get(4)?,
    })
}

pub fn list_categories(conn: &Connection) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type_id, parent_id, icon_file
         FROM categories
         ORDER BY id",
    )?;

    let categories = stmt.query_map([], map_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(categories)
}

pub fn list_categories_by_type(conn: &Connection, type_id: i64) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type_id, parent_id, icon_file
         FROM categories
         WHERE type_id = ?
         ORDER BY id",
    )?;

    let categories = stmt
        .query_map([type_id], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(categories)
}

pub fn get_category(conn: &Connection, id: i64) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        "SELECT id, name, type_id, parent_id, icon_file
         FROM categories WHERE id = ?",
        [id],
        map_row,
    )
    .optional()
}

pub fn find_category_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        "SELECT id, name, type_id, parent_id, icon_file
         FROM categories WHERE name = ? ORDER BY id LIMIT 1",
        [name],
        map_row,
    )
    .optional()
}

pub fn count_children(conn: &Connection, parent_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM categories WHERE parent_id = ?",
        [parent_id],
        |row| row.get(0),
    )
}

pub fn create_category(conn: &Connection, category: &NewCategory) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO categories (name, type_id, parent_id, icon_file) VALUES (?, ?, ?, ?)",
        params![
            category.name,
            category.type_id,
            category.parent_id,
            category.icon_file
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(category_id = id, name = %category.name, "Created category");
    Ok(id)
}

/// Writes every column of `category` back to its row.
pub fn update_category(conn: &Connection, category: &Category) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE categories SET name = ?, type_id = ?, parent_id = ?, icon_file = ?
         WHERE id = ?",
        params![
            category.name,
            category.type_id,
            category.parent_id,
            category.icon_file,
            category.id
        ],
    )?;
    if rows > 0 {
        debug!(
            category_id = category.id,
            parent_id = ?category.parent_id,
            "Updated category"
        );
    }
    Ok(rows > 0)
}
