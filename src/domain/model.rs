use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ShopError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "soft-skill", alias = "софт-скил")]
    Soft,
    #[serde(rename = "hard-skill", alias = "хард-скил")]
    Hard,
    #[serde(rename = "other", alias = "другое")]
    Other,
    #[serde(rename = "additional", alias = "дополнительное")]
    Additional,
    #[serde(rename = "button", alias = "кнопка")]
    Button,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Soft => "soft-skill",
            Category::Hard => "hard-skill",
            Category::Other => "other",
            Category::Additional => "additional",
            Category::Button => "button",
        }
    }

    /// Suffix of the `card__category_*` state class.
    pub fn modifier(&self) -> &'static str {
        match self {
            Category::Soft => "soft",
            Category::Hard => "hard",
            Category::Other => "other",
            Category::Additional => "additional",
            Category::Button => "button",
        }
    }
}

/// Immutable catalog entry. A price of 0 marks a priceless product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: Category,
    pub price: u64,
}

impl Product {
    pub fn is_priceless(&self) -> bool {
        self.price == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(ShopError::InvalidConfigValueError {
                field: "payment".to_string(),
                value: other.to_string(),
                reason: "expected 'card' or 'cash'".to_string(),
            }),
        }
    }
}

/// Text fields of the order draft that users edit through forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    Address,
    Email,
    Phone,
}

impl OrderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderField::Address => "address",
            OrderField::Email => "email",
            OrderField::Phone => "phone",
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderField {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "address" => Ok(OrderField::Address),
            "email" => Ok(OrderField::Email),
            "phone" => Ok(OrderField::Phone),
            other => Err(ShopError::UnknownEvent {
                name: format!("order field '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub payment: PaymentMethod,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub items: Vec<String>,
    pub total: u64,
}

impl OrderDraft {
    pub fn set_field(&mut self, field: OrderField, value: String) {
        match field {
            OrderField::Address => self.address = value,
            OrderField::Email => self.email = value,
            OrderField::Phone => self.phone = value,
        }
    }
}

/// Per-field messages; an empty map means the draft can be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<OrderField, String>);

impl ValidationErrors {
    pub fn insert(&mut self, field: OrderField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: OrderField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages for `fields`, in field order.
    pub fn messages_for(&self, fields: &[OrderField]) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(field, _)| fields.contains(field))
            .map(|(_, message)| message.as_str())
            .collect()
    }
}

/// Body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub payment: PaymentMethod,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub total: u64,
    pub items: Vec<String>,
}

impl From<&OrderDraft> for OrderRequest {
    fn from(draft: &OrderDraft) -> Self {
        Self {
            payment: draft.payment,
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            address: draft.address.clone(),
            total: draft.total,
            items: draft.items.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    #[serde(rename = "id")]
    pub order_id: String,
    pub total: u64,
}
