//! Typed request parameters, one struct per endpoint.
//!
//! Optional filters are left out of the JSON when unset.

use crate::models::PurchaseStatus;
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};

pub const DEFAULT_LIMIT: u32 = 20;
pub const MESSAGES_DEFAULT_LIMIT: u32 = 50;
pub const CATEGORIES_LIMIT: u32 = 100;

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    #[must_use]
    pub const fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, DEFAULT_LIMIT)
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    #[serde(serialize_with = "expose")]
    pub password: &'a SecretString,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterForm {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "ubicacion", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    #[serde(serialize_with = "expose")]
    pub token: &'a SecretString,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductQuery {
    #[serde(flatten)]
    pub page: Page,
    #[serde(rename = "categoria_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    /// `nuevo` or `segunda_mano`.
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Name search.
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "estado")]
    pub condition: String,
    #[serde(rename = "ubicacion")]
    pub location: String,
    #[serde(rename = "categoria_id")]
    pub category_id: i64,
    #[serde(rename = "antiguedad", skip_serializing_if = "Option::is_none")]
    pub age_months: Option<i64>,
    /// Base64 encoded pictures.
    #[serde(rename = "imagenes", skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// Partial update; unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precio", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "ubicacion", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ProductUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Which side of the purchase the caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PurchaseRole {
    #[serde(rename = "compras")]
    Buyer,
    #[serde(rename = "ventas")]
    Seller,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurchaseQuery {
    #[serde(flatten)]
    pub page: Page,
    #[serde(rename = "tipo", skip_serializing_if = "Option::is_none")]
    pub role: Option<PurchaseRole>,
    #[serde(
        rename = "estado",
        skip_serializing_if = "Option::is_none",
        serialize_with = "status_value"
    )]
    pub status: Option<PurchaseStatus>,
}

#[allow(clippy::ref_option)]
fn status_value<S: Serializer>(
    status: &Option<PurchaseStatus>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match status {
        Some(status) => serializer.serialize_str(status.value()),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct NewPurchase {
    #[serde(rename = "producto_id")]
    pub product_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMessage<'a> {
    #[serde(rename = "contenido")]
    pub content: &'a str,
}
