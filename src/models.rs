//! Domain models handed to the presentation layer.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Numeric backend id.
    pub id: i64,
    /// Public code, e.g. `USR-00001`.
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub registered_at: Option<String>,
    pub active: bool,
    /// Months since registration.
    pub seniority_months: i64,
    /// 0 to 5.
    pub rating_average: f64,
    pub rating_count: i64,
    pub products_for_sale: i64,
    pub products_sold: i64,
    pub products_bought: i64,
    /// Base64 profile picture.
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    /// Public code, e.g. `PRD-00000001`.
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// `nuevo` or `segunda_mano`.
    pub condition: String,
    /// `disponible` or `vendido`.
    pub sale_state: String,
    pub location: String,
    pub age_months: i64,
    pub published_at: Option<String>,
    pub category_id: i64,
    pub category_name: String,
    pub owner_id: i64,
    pub owner_name: String,
    pub owner_rating: f64,
    pub tags: Vec<String>,
    pub comment_count: i64,
    pub image_count: i64,
    /// Base64 main picture.
    pub main_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub product_count: i64,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PurchaseStatus {
    Pending,
    Processing,
    Confirmed,
    Cancelled,
    Rejected,
    Completed,
}

impl PurchaseStatus {
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Processing,
        Self::Confirmed,
        Self::Cancelled,
        Self::Rejected,
        Self::Completed,
    ];

    /// Wire value used by the backend.
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Processing => "procesando",
            Self::Confirmed => "confirmada",
            Self::Cancelled => "cancelada",
            Self::Rejected => "rechazada",
            Self::Completed => "completada",
        }
    }

    /// Parse a wire value; anything unrecognized is `Pending`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|status| status.value() == value)
            .unwrap_or(Self::Pending)
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Buyer or seller as shown on a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchasedProduct {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub id: i64,
    pub purchase_id: String,
    pub status: PurchaseStatus,
    pub amount: f64,
    pub created_at: Option<String>,
    pub confirmed_at: Option<String>,
    pub buyer: Option<Party>,
    pub seller: Option<Party>,
    pub product: Option<PurchasedProduct>,
}

/// The other participant of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterpart {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: i64,
    pub subject: String,
    pub counterpart: Counterpart,
    pub state: String,
    pub message_count: i64,
    pub last_message: Option<String>,
    pub last_message_at: Option<String>,
    pub product_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub sent_at: Option<String>,
    pub read: bool,
    pub sender_id: i64,
    pub sender_name: String,
    pub from_buyer: bool,
    pub from_seller: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_status_roundtrip() {
        for status in PurchaseStatus::ALL {
            assert_eq!(PurchaseStatus::parse(status.value()), status);
        }
    }

    #[test]
    fn test_purchase_status_unknown_is_pending() {
        assert_eq!(PurchaseStatus::parse("enviada"), PurchaseStatus::Pending);
        assert_eq!(PurchaseStatus::parse(""), PurchaseStatus::Pending);
        assert_eq!(PurchaseStatus::parse("CONFIRMADA"), PurchaseStatus::Pending);
    }

    #[test]
    fn test_purchase_status_display() {
        assert_eq!(PurchaseStatus::Rejected.to_string(), "rechazada");
    }
}
