//! Validated access to category types and categories.
//!
//! Every check runs before the first write, so a rejected request leaves the
//! database untouched. Reparenting reads the tree and writes the new parent
//! inside one `BEGIN IMMEDIATE` transaction; SQLite's write lock serializes
//! concurrent reparents, so two moves that each look fine alone cannot
//! interleave into a cycle.

use std::collections::BTreeSet;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{debug, info};

use crate::db::queries::{categories, category_types};
use crate::error::{AppError, AppResult};
use crate::models::{
    Category, CategoryType, CategoryUpdate, CategoryWithPath, NewCategory, NewCategoryType,
    UNCLASSIFIED,
};
use crate::services::category_tree::{CategoryFilter, TreeIndex};

fn validate_name(name: &str, what: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} name must not be empty", what)));
    }
    Ok(trimmed.to_string())
}

/// `UNCLASSIFIED` is seeded once; no other category may take its name.
fn reject_reserved_name(name: &str) -> AppResult<()> {
    if name == UNCLASSIFIED {
        return Err(AppError::Validation(format!(
            "Category name '{}' is reserved",
            UNCLASSIFIED
        )));
    }
    Ok(())
}

pub fn list_types(conn: &Connection) -> AppResult<Vec<CategoryType>> {
    Ok(category_types::list_category_types(conn)?)
}

pub fn get_type(conn: &Connection, id: i64) -> AppResult<CategoryType> {
    category_types::get_category_type(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("Category type {} not found", id)))
}

pub fn create_type(conn: &Connection, new: &NewCategoryType) -> AppResult<CategoryType> {
    let new = NewCategoryType {
        name: validate_name(&new.name, "Category type")?,
        description: new.description.clone(),
    };
    let id = category_types::create_category_type(conn, &new)?;
    info!(type_id = id, name = %new.name, "Category type created");
    get_type(conn, id)
}

pub fn get_category(conn: &Connection, id: i64) -> AppResult<Category> {
    categories::get_category(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
}

pub fn list_all(conn: &Connection) -> AppResult<Vec<Category>> {
    Ok(categories::list_categories(conn)?)
}

pub fn list_by_type(conn: &Connection, type_id: i64) -> AppResult<Vec<Category>> {
    get_type(conn, type_id)?;
    Ok(categories::list_categories_by_type(conn, type_id)?)
}

/// Checks that `parent_id` names an existing category of `type_id` other
/// than `UNCLASSIFIED`.
fn validate_parent(conn: &Connection, parent_id: i64, type_id: i64) -> AppResult<Category> {
    let parent = categories::get_category(conn, parent_id)?.ok_or_else(|| {
        AppError::Validation(format!("Parent category {} does not exist", parent_id))
    })?;
    if parent.is_unclassified() {
        return Err(AppError::Validation(format!(
            "{} cannot have subcategories",
            UNCLASSIFIED
        )));
    }
    if parent.type_id != type_id {
        return Err(AppError::Validation(format!(
            "Parent category '{}' belongs to a different category type",
            parent.name
        )));
    }
    Ok(parent)
}

fn validate_type_exists(conn: &Connection, type_id: i64) -> AppResult<()> {
    if category_types::get_category_type(conn, type_id)?.is_none() {
        return Err(AppError::Validation(format!(
            "Category type {} does not exist",
            type_id
        )));
    }
    Ok(())
}

pub fn create_category(conn: &Connection, new: &NewCategory) -> AppResult<Category> {
    let name = validate_name(&new.name, "Category")?;
    reject_reserved_name(&name)?;
    validate_type_exists(conn, new.type_id)?;
    if let Some(parent_id) = new.parent_id {
        validate_parent(conn, parent_id, new.type_id)?;
    }

    let id = categories::create_category(
        conn,
        &NewCategory {
            name,
            type_id: new.type_id,
            parent_id: new.parent_id,
            icon_file: new.icon_file.clone(),
        },
    )?;
    get_category(conn, id)
}

pub fn update_category(conn: &Connection, id: i64, update: &CategoryUpdate) -> AppResult<Category> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let current = get_category(&tx, id)?;
    let mut updated = current.clone();

    if let Some(name) = &update.name {
        updated.name = validate_name(name, "Category")?;
    }

    if let Some(type_id) = update.type_id {
        if type_id != current.type_id {
            validate_type_exists(&tx, type_id)?;
            if categories::count_children(&tx, id)? > 0 {
                return Err(AppError::Validation(format!(
                    "Category '{}' has subcategories and cannot change its type",
                    current.name
                )));
            }
        }
        updated.type_id = type_id;
    }

    if let Some(parent_id) = update.parent_id {
        updated.parent_id = parent_id;
    }

    if let Some(icon_file) = &update.icon_file {
        updated.icon_file = icon_file.clone();
    }

    if current.is_unclassified() {
        if updated.name != current.name
            || updated.type_id != current.type_id
            || updated.parent_id.is_some()
        {
            return Err(AppError::Validation(format!(
                "{} is built in; only its icon can change",
                UNCLASSIFIED
            )));
        }
    } else if updated.name != current.name {
        reject_reserved_name(&updated.name)?;
    }

    if let Some(parent_id) = updated.parent_id {
        validate_parent(&tx, parent_id, updated.type_id)?;

        let index = TreeIndex::build(categories::list_categories_by_type(&tx, current.type_id)?);
        if !index.can_reparent(id, parent_id) {
            return Err(AppError::Validation(format!(
                "Moving '{}' under category {} would create a cycle",
                current.name, parent_id
            )));
        }
    }

    categories::update_category(&tx, &updated)?;
    tx.commit()?;

    if updated.parent_id != current.parent_id {
        info!(
            category_id = id,
            from = ?current.parent_id,
            to = ?updated.parent_id,
            "Category reparented"
        );
    }

    Ok(updated)
}

/// Fresh index over one type, or over everything when `type_id` is `None`.
pub fn load_index(conn: &Connection, type_id: Option<i64>) -> AppResult<TreeIndex> {
    let rows = match type_id {
        Some(type_id) => categories::list_categories_by_type(conn, type_id)?,
        None => categories::list_categories(conn)?,
    };
    debug!(count = rows.len(), type_id = ?type_id, "Built category index");
    Ok(TreeIndex::build(rows))
}

pub fn descendants(conn: &Connection, id: i64) -> AppResult<BTreeSet<i64>> {
    let category = get_category(conn, id)?;
    let index = load_index(conn, Some(category.type_id))?;
    Ok(index.descendants_of(id))
}

pub fn resolve_icon(conn: &Connection, id: i64) -> AppResult<Option<String>> {
    let category = get_category(conn, id)?;
    let index = load_index(conn, Some(category.type_id))?;
    Ok(index.resolve_icon(id).map(String::from))
}

pub fn parent_options(conn: &Connection, id: i64) -> AppResult<Vec<Category>> {
    let category = get_category(conn, id)?;
    let index = load_index(conn, Some(category.type_id))?;
    Ok(index.parent_options(id).into_iter().cloned().collect())
}

pub fn selectable(conn: &Connection, type_id: Option<i64>) -> AppResult<Vec<Category>> {
    let index = load_index(conn, type_id)?;
    Ok(index.selectable(type_id).into_iter().cloned().collect())
}

pub fn tree(conn: &Connection, type_id: Option<i64>) -> AppResult<Vec<CategoryWithPath>> {
    if let Some(type_id) = type_id {
        get_type(conn, type_id)?;
    }
    let index = load_index(conn, type_id)?;
    Ok(index.flatten(type_id))
}

/// Turns a user selection into the filter a payment item query applies.
pub fn category_filter(conn: &Connection, selected: &[i64]) -> AppResult<CategoryFilter> {
    if selected.is_empty() {
        return Ok(CategoryFilter::Any);
    }
    let index = load_index(conn, None)?;
    Ok(CategoryFilter::from_selection(selected, &index))
}
