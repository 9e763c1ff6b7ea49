pub mod category;
pub mod payment_item;
pub mod recipient;

pub use category::{
    Category, CategoryType, CategoryUpdate, CategoryWithPath, NewCategory, NewCategoryType,
    STANDARD_TYPE, UNCLASSIFIED,
};
pub use payment_item::{NewPaymentItem, PaymentItem, PaymentItemUpdate, PaymentItemWithRelations};
pub use recipient::{NewRecipient, Recipient};
