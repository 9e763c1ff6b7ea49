use rusqlite::Connection;
use tracing::info;

use crate::db::queries::{categories, category_types};
use crate::models::{NewCategory, NewCategoryType, STANDARD_TYPE, UNCLASSIFIED};

/// Ids of the rows seeded on first run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    pub standard_type_id: i64,
    pub unclassified_id: i64,
}

/// Creates the `standard` category type and the `UNCLASSIFIED` category when
/// they are missing. Safe to call on every start.
pub fn ensure_defaults(conn: &Connection) -> rusqlite::Result<Defaults> {
    let tx = conn.unchecked_transaction()?;

    let standard_type_id = match category_types::find_category_type_by_name(&tx, STANDARD_TYPE)? {
        Some(t) => t.id,
        None => {
            info!("Seeding standard category type");
            category_types::create_category_type(
                &tx,
                &NewCategoryType {
                    name: STANDARD_TYPE.into(),
                    description: Some(
                        "Default category type for basic expense/income classification".into(),
                    ),
                },
            )?
        }
    };

    let unclassified_id = match categories::find_category_by_name(&tx, UNCLASSIFIED)? {
        Some(c) => c.id,
        None => {
            info!("Seeding {} category", UNCLASSIFIED);
            categories::create_category(
                &tx,
                &NewCategory {
                    name: UNCLASSIFIED.into(),
                    type_id: standard_type_id,
                    parent_id: None,
                    icon_file: None,
                },
            )?
        }
    };

    tx.commit()?;

    Ok(Defaults {
        standard_type_id,
        unclassified_id,
    })
}
