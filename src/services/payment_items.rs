use std::collections::HashSet;

use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::info;

use crate::db::queries::payment_items::{self, PaymentItemFilter};
use crate::db::queries::{categories, category_types, recipients};
use crate::error::{AppError, AppResult};
use crate::models::{
    NewPaymentItem, PaymentItemUpdate, PaymentItemWithRelations, STANDARD_TYPE, UNCLASSIFIED,
};
use crate::services::categories as category_service;
use crate::services::category_tree::TreeIndex;

/// Query options as received from the caller, before filter expansion.
#[derive(Debug, Clone, Default)]
pub struct PaymentItemQuery {
    pub expense_only: bool,
    pub income_only: bool,
    pub category_ids: Vec<i64>,
}

fn validate_date(date: &str) -> AppResult<String> {
    let date = date.trim();
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(AppError::Validation(format!(
            "Invalid date '{}': expected YYYY-MM-DD",
            date
        )));
    }
    Ok(date.to_string())
}

fn validate_recipient(conn: &Connection, recipient_id: Option<i64>) -> AppResult<()> {
    if let Some(id) = recipient_id {
        if recipients::get_recipient(conn, id)?.is_none() {
            return Err(AppError::NotFound(format!("Recipient {} not found", id)));
        }
    }
    Ok(())
}

/// Resolves the categories to link. An empty list falls back to
/// `UNCLASSIFIED`. Only the standard type may appear more than once.
fn resolve_categories(conn: &Connection, requested: &[i64]) -> AppResult<Vec<i64>> {
    if requested.is_empty() {
        let unclassified = categories::find_category_by_name(conn, UNCLASSIFIED)?
            .ok_or_else(|| AppError::Internal(format!("{} category is missing", UNCLASSIFIED)))?;
        return Ok(vec![unclassified.id]);
    }

    let standard_type_id =
        category_types::find_category_type_by_name(conn, STANDARD_TYPE)?.map(|t| t.id);

    let mut seen_ids = HashSet::new();
    let mut seen_types = HashSet::new();
    let mut resolved = Vec::with_capacity(requested.len());

    for &id in requested {
        if !seen_ids.insert(id) {
            continue;
        }
        let category = categories::get_category(conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;
        if Some(category.type_id) != standard_type_id && !seen_types.insert(category.type_id) {
            return Err(AppError::Validation(
                "Only one category per type is allowed".into(),
            ));
        }
        resolved.push(id);
    }

    Ok(resolved)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<PaymentItemWithRelations> {
    payment_items::get_payment_item_with_relations(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("Payment item {} not found", id)))
}

pub fn list(conn: &Connection, query: &PaymentItemQuery) -> AppResult<Vec<PaymentItemWithRelations>> {
    if query.expense_only && query.income_only {
        return Err(AppError::Validation(
            "Choose only one filter: expense_only or income_only".into(),
        ));
    }

    let filter = PaymentItemFilter {
        expense_only: query.expense_only,
        income_only: query.income_only,
        categories: category_service::category_filter(conn, &query.category_ids)?,
    };

    Ok(payment_items::list_payment_items(conn, &filter)?)
}

pub fn create(conn: &Connection, new: &NewPaymentItem) -> AppResult<PaymentItemWithRelations> {
    let date = validate_date(&new.date)?;
    validate_recipient(conn, new.recipient_id)?;
    let category_ids = resolve_categories(conn, &new.category_ids)?;

    let tx = conn.unchecked_transaction()?;
    let id = payment_items::create_payment_item(
        &tx,
        &NewPaymentItem {
            date,
            ..new.clone()
        },
    )?;
    payment_items::set_item_categories(&tx, id, &category_ids)?;
    tx.commit()?;

    info!(item_id = id, categories = ?category_ids, "Payment item created");
    get(conn, id)
}

pub fn update(
    conn: &Connection,
    id: i64,
    update: &PaymentItemUpdate,
) -> AppResult<PaymentItemWithRelations> {
    let mut item = get(conn, id)?.item;

    if let Some(amount_cents) = update.amount_cents {
        item.amount_cents = amount_cents;
    }
    if let Some(date) = &update.date {
        item.date = validate_date(date)?;
    }
    if let Some(periodic) = update.periodic {
        item.periodic = periodic;
    }
    if let Some(description) = &update.description {
        item.description = description.clone();
    }
    if let Some(invoice_path) = &update.invoice_path {
        item.invoice_path = invoice_path.clone();
    }
    if let Some(product_image_path) = &update.product_image_path {
        item.product_image_path = product_image_path.clone();
    }
    if let Some(recipient_id) = update.recipient_id {
        validate_recipient(conn, recipient_id)?;
        item.recipient_id = recipient_id;
    }
    let category_ids = match &update.category_ids {
        Some(ids) => Some(resolve_categories(conn, ids)?),
        None => None,
    };

    let tx = conn.unchecked_transaction()?;
    payment_items::update_payment_item(&tx, &item)?;
    if let Some(ids) = &category_ids {
        payment_items::set_item_categories(&tx, id, ids)?;
    }
    tx.commit()?;

    get(conn, id)
}

pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
    if !payment_items::delete_payment_item(conn, id)? {
        return Err(AppError::NotFound(format!("Payment item {} not found", id)));
    }
    Ok(())
}

/// Icon of the first category, in id order, that resolves to one.
pub fn resolve_icon(conn: &Connection, id: i64) -> AppResult<Option<String>> {
    let item = get(conn, id)?;
    if item.categories.is_empty() {
        return Ok(None);
    }
    let index = TreeIndex::build(categories::list_categories(conn)?);
    Ok(item
        .categories
        .iter()
        .find_map(|c| index.resolve_icon(c.id))
        .map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert_eq!(validate_date(" 2024-02-29 ").unwrap(), "2024-02-29");
        assert!(validate_date("2024-02-29T08:30:00").is_err());
        assert!(validate_date("29.02.2024").is_err());
        assert!(validate_date("2023-02-29").is_err());
        assert!(validate_date("yesterday").is_err());
    }
}
