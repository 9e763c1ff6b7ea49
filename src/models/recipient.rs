use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRecipient {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}
