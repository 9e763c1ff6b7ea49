use serde::{Deserialize, Serialize};

/// Name of the catch-all category seeded at bootstrap.
pub const UNCLASSIFIED: &str = "UNCLASSIFIED";

/// Name of the category type seeded at bootstrap. Payment items may carry
/// several categories of this type.
pub const STANDARD_TYPE: &str = "standard";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategoryType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub type_id: i64,
    pub parent_id: Option<i64>,
    pub icon_file: Option<String>,
}

impl Category {
    pub fn is_unclassified(&self) -> bool {
        self.name == UNCLASSIFIED
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub type_id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub icon_file: Option<String>,
}

/// Partial update. The outer `Option` tells whether the field was sent at all,
/// so `"parent_id": null` detaches a category while a missing key keeps it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub type_id: Option<i64>,
    #[serde(default, deserialize_with = "crate::form_utils::deserialize_present")]
    pub parent_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "crate::form_utils::deserialize_present")]
    pub icon_file: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithPath {
    #[serde(flatten)]
    pub category: Category,
    pub path: String,
    pub depth: i64,
}
