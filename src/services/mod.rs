pub mod categories;
pub mod category_tree;
pub mod icon_storage;
pub mod payment_items;
