//! Wire shapes of the `result` payloads.
//!
//! Every field the backend may omit is optional here; defaults are applied
//! when mapping onto [`crate::models`].

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub id: i64,
    #[serde(rename = "id_usuario", default)]
    pub user_id: Option<String>,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "ubicacion", default)]
    pub location: Option<String>,
    #[serde(rename = "fecha_registro", default)]
    pub registered_at: Option<String>,
    #[serde(rename = "activo", default)]
    pub active: Option<bool>,
    #[serde(rename = "antiguedad", default)]
    pub seniority_months: Option<i64>,
    #[serde(rename = "valoracion_promedio", default)]
    pub rating_average: Option<f64>,
    #[serde(rename = "total_valoraciones", default)]
    pub rating_count: Option<i64>,
    #[serde(rename = "total_productos_venta", default)]
    pub products_for_sale: Option<i64>,
    #[serde(rename = "total_productos_vendidos", default)]
    pub products_sold: Option<i64>,
    #[serde(rename = "total_productos_comprados", default)]
    pub products_bought: Option<i64>,
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
}

/// Login, registration and refresh reply.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResult {
    #[serde(rename = "mensaje", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "usuario", default)]
    pub user: Option<UserDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerDto {
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "valoracion", default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductDto {
    pub id: i64,
    #[serde(rename = "id_producto", default)]
    pub product_id: Option<String>,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "precio", default)]
    pub price: Option<f64>,
    #[serde(rename = "estado", default)]
    pub condition: Option<String>,
    #[serde(rename = "antiguedad_meses", default)]
    pub age_months: Option<i64>,
    #[serde(rename = "ubicacion", default)]
    pub location: Option<String>,
    #[serde(rename = "estado_venta", default)]
    pub sale_state: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<NamedRef>,
    #[serde(rename = "propietario", default)]
    pub owner: Option<OwnerDto>,
    #[serde(rename = "etiquetas", default)]
    pub tags: Option<Vec<NamedRef>>,
    #[serde(rename = "total_comentarios", default)]
    pub comment_count: Option<i64>,
    #[serde(rename = "total_imagenes", default)]
    pub image_count: Option<i64>,
    #[serde(rename = "imagen_principal", default)]
    pub main_image: Option<String>,
    #[serde(rename = "fecha_publicacion", default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(rename = "productos", default)]
    pub products: Option<Vec<ProductDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductWriteResult {
    #[serde(rename = "mensaje", default)]
    pub message: Option<String>,
    #[serde(rename = "producto", default)]
    pub product: Option<ProductDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDto {
    pub id: i64,
    #[serde(rename = "id_categoria", default)]
    pub category_id: Option<String>,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "total_productos", default)]
    pub product_count: Option<i64>,
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPage {
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(rename = "categorias", default)]
    pub categories: Option<Vec<CategoryDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchasedProductDto {
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "precio", default)]
    pub price: Option<f64>,
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseDto {
    pub id: i64,
    #[serde(rename = "id_compra", default)]
    pub purchase_id: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
    #[serde(rename = "monto", default)]
    pub amount: Option<f64>,
    #[serde(rename = "fecha", default)]
    pub created_at: Option<String>,
    #[serde(rename = "fecha_confirmacion", default)]
    pub confirmed_at: Option<String>,
    #[serde(rename = "comprador", default)]
    pub buyer: Option<NamedRef>,
    #[serde(rename = "vendedor", default)]
    pub seller: Option<NamedRef>,
    #[serde(rename = "producto", default)]
    pub product: Option<PurchasedProductDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchasePage {
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(rename = "compras", default)]
    pub purchases: Option<Vec<PurchaseDto>>,
}

/// Reply of purchase creation and of every state transition.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseActionResult {
    #[serde(rename = "mensaje", default)]
    pub message: Option<String>,
    #[serde(rename = "compra_id", default)]
    pub purchase_id: Option<i64>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationDto {
    pub id: i64,
    #[serde(rename = "asunto", default)]
    pub subject: Option<String>,
    #[serde(rename = "otro_usuario", default)]
    pub counterpart: Option<NamedRef>,
    #[serde(rename = "estado", default)]
    pub state: Option<String>,
    #[serde(rename = "total_mensajes", default)]
    pub message_count: Option<i64>,
    #[serde(rename = "ultimo_mensaje", default)]
    pub last_message: Option<String>,
    #[serde(rename = "fecha_ultimo_mensaje", default)]
    pub last_message_at: Option<String>,
    #[serde(rename = "producto_id", default)]
    pub product_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationPage {
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(rename = "conversaciones", default)]
    pub conversations: Option<Vec<ConversationDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageDto {
    pub id: i64,
    #[serde(rename = "contenido", default)]
    pub content: Option<String>,
    #[serde(rename = "fecha_envio", default)]
    pub sent_at: Option<String>,
    #[serde(rename = "leido", default)]
    pub read: Option<bool>,
    #[serde(rename = "remitente", default)]
    pub sender: Option<NamedRef>,
    #[serde(rename = "es_de_comprador", default)]
    pub from_buyer: Option<bool>,
    #[serde(rename = "es_de_vendedor", default)]
    pub from_seller: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagePage {
    #[serde(rename = "conversacion_id", default)]
    pub conversation_id: Option<i64>,
    #[serde(rename = "total_mensajes", default)]
    pub total: Option<i64>,
    #[serde(rename = "mensajes", default)]
    pub messages: Option<Vec<MessageDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    #[serde(rename = "mensaje", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<MessageDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatStarted {
    #[serde(rename = "conversacion_id", default)]
    pub conversation_id: Option<i64>,
    #[serde(rename = "asunto", default)]
    pub subject: Option<String>,
}
