pub mod categories;
pub mod category_types;
pub mod payment_items;
pub mod recipients;
