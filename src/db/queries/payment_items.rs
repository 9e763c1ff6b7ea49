use std::collections::{BTreeSet, HashMap};

use crate::models::category::Category;
use crate::models::payment_item::{NewPaymentItem, PaymentItem, PaymentItemWithRelations};
use crate::services::category_tree::CategoryFilter;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::{debug, trace};

use super::recipients;

#[derive(Debug, Clone)]
pub struct PaymentItemFilter {
    pub expense_only: bool,
    pub income_only: bool,
    pub categories: CategoryFilter,
}

impl Default for PaymentItemFilter {
    fn default() -> Self {
        Self {
            expense_only: false,
            income_only: false,
            categories: CategoryFilter::Any,
        }
    }
}

const ITEM_COLUMNS: &str = "p.id, p.amount_cents, p.date, p.periodic, p.description,
                p.invoice_path, p.product_image_path, p.recipient_id";

fn map_row(row: &Row<'_>) -> rusqlite::Result<PaymentItem> {
    Ok(PaymentItem {
        id: row.get(0)?,
        amount_cents: row.get(1)?,
        date: row.get(2)?,
        periodic: row.get(3)?,
        description: row.get(4)?,
        invoice_path: row.get(5)?,
        product_image_path: row.get(6)?,
        recipient_id: row.get(7)?,
    })
}

pub fn list_payment_items(
    conn: &Connection,
    filter: &PaymentItemFilter,
) -> rusqlite::Result<Vec<PaymentItemWithRelations>> {
    let mut sql = format!("SELECT {} FROM payment_items p WHERE 1=1", ITEM_COLUMNS);
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if filter.expense_only {
        sql.push_str(" AND p.amount_cents < 0");
    }
    if filter.income_only {
        sql.push_str(" AND p.amount_cents > 0");
    }
    if let CategoryFilter::Ids(ids) = &filter.categories {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sql.push_str(&format!(
            " AND EXISTS(SELECT 1 FROM payment_item_categories pic
                         WHERE pic.payment_item_id = p.id AND pic.category_id IN ({}))",
            placeholders(ids.len())
        ));
        for id in ids {
            params_vec.push(Box::new(*id));
        }
    }

    sql.push_str(" ORDER BY p.date, p.id");
    trace!(sql = %sql, "Listing payment items");

    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map(params_refs.as_slice(), map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    with_relations(conn, items)
}

/// Bound parameters per `IN (...)` batch, well under SQLite's limit.
const BATCH_SIZE: usize = 500;

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Attaches recipients and categories with one query per batch of items
/// instead of one per item.
fn with_relations(
    conn: &Connection,
    items: Vec<PaymentItem>,
) -> rusqlite::Result<Vec<PaymentItemWithRelations>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let item_ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    let recipient_ids: Vec<i64> = items
        .iter()
        .filter_map(|i| i.recipient_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut categories_by_item: HashMap<i64, Vec<Category>> = HashMap::new();
    for chunk in item_ids.chunks(BATCH_SIZE) {
        let sql = format!(
            "SELECT pic.payment_item_id, c.id, c.name, c.type_id, c.parent_id, c.icon_file
             FROM payment_item_categories pic
             JOIN categories c ON c.id = pic.category_id
             WHERE pic.payment_item_id IN ({})
             ORDER BY pic.payment_item_id, c.id",
            placeholders(chunk.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(chunk), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Category {
                    id: row.get(1)?,
                    name: row.get(2)?,
                    type_id: row.get(3)?,
                    parent_id: row.get(4)?,
                    icon_file: row.get(5)?,
                },
            ))
        })?;
        for row in rows {
            let (item_id, category) = row?;
            categories_by_item.entry(item_id).or_default().push(category);
        }
    }

    let mut recipients_by_id = HashMap::new();
    for chunk in recipient_ids.chunks(BATCH_SIZE) {
        for recipient in recipients::get_recipients(conn, chunk)? {
            recipients_by_id.insert(recipient.id, recipient);
        }
    }

    trace!(
        items = items.len(),
        recipients = recipients_by_id.len(),
        "Loaded payment item relations"
    );

    Ok(items
        .into_iter()
        .map(|item| PaymentItemWithRelations {
            recipient: item
                .recipient_id
                .and_then(|id| recipients_by_id.get(&id).cloned()),
            categories: categories_by_item.remove(&item.id).unwrap_or_default(),
            item,
        })
        .collect())
}

pub fn get_payment_item(conn: &Connection, id: i64) -> rusqlite::Result<Option<PaymentItem>> {
    conn.query_row(
        &format!("SELECT {} FROM payment_items p WHERE p.id = ?", ITEM_COLUMNS),
        [id],
        map_row,
    )
    .optional()
}

pub fn get_payment_item_with_relations(
    conn: &Connection,
    id: i64,
) -> rusqlite::Result<Option<PaymentItemWithRelations>> {
    match get_payment_item(conn, id)? {
        Some(item) => Ok(with_relations(conn, vec![item])?.pop()),
        None => Ok(None),
    }
}

pub fn create_payment_item(conn: &Connection, item: &NewPaymentItem) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO payment_items (amount_cents, date, periodic, description,
                                    invoice_path, product_image_path, recipient_id)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            item.amount_cents,
            item.date,
            item.periodic,
            item.description,
            item.invoice_path,
            item.product_image_path,
            item.recipient_id
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(item_id = id, amount_cents = item.amount_cents, "Created payment item");
    Ok(id)
}

pub fn update_payment_item(conn: &Connection, item: &PaymentItem) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE payment_items SET amount_cents = ?, date = ?, periodic = ?, description = ?,
                invoice_path = ?, product_image_path = ?, recipient_id = ?
         WHERE id = ?",
        params![
            item.amount_cents,
            item.date,
            item.periodic,
            item.description,
            item.invoice_path,
            item.product_image_path,
            item.recipient_id,
            item.id
        ],
    )?;
    if rows > 0 {
        debug!(item_id = item.id, "Updated payment item");
    }
    Ok(rows > 0)
}

pub fn delete_payment_item(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM payment_items WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(item_id = id, "Deleted payment item");
    }
    Ok(rows > 0)
}

/// Replaces the category links of an item.
pub fn set_item_categories(
    conn: &Connection,
    item_id: i64,
    category_ids: &[i64],
) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM payment_item_categories WHERE payment_item_id = ?",
        [item_id],
    )?;
    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO payment_item_categories (payment_item_id, category_id)
         VALUES (?, ?)",
    )?;
    for category_id in category_ids {
        stmt.execute(params![item_id, category_id])?;
    }
    debug!(item_id, count = category_ids.len(), "Set payment item categories");
    Ok(())
}
