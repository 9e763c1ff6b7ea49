use crate::models::category::Category;
use crate::models::recipient::Recipient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentItem {
    pub id: i64,
    pub amount_cents: i64,
    pub date: String,
    pub periodic: bool,
    pub description: Option<String>,
    pub invoice_path: Option<String>,
    pub product_image_path: Option<String>,
    pub recipient_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentItemWithRelations {
    #[serde(flatten)]
    pub item: PaymentItem,
    pub recipient: Option<Recipient>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPaymentItem {
    pub amount_cents: i64,
    pub date: String,
    #[serde(default)]
    pub periodic: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub invoice_path: Option<String>,
    #[serde(default)]
    pub product_image_path: Option<String>,
    #[serde(default)]
    pub recipient_id: Option<i64>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// Partial update; `category_ids: []` resets the item to the default tag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentItemUpdate {
    #[serde(default)]
    pub amount_cents: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub periodic: Option<bool>,
    #[serde(default, deserialize_with = "crate::form_utils::deserialize_present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::form_utils::deserialize_present")]
    pub invoice_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::form_utils::deserialize_present")]
    pub product_image_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::form_utils::deserialize_present")]
    pub recipient_id: Option<Option<i64>>,
    #[serde(default)]
    pub category_ids: Option<Vec<i64>>,
}
