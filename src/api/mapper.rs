use super::dto::{
    CategoryDto, ConversationDto, MessageDto, NamedRef, ProductDto, PurchaseDto,
    PurchasedProductDto, UserDto,
};
use crate::models::{
    Category, Conversation, Counterpart, Message, Party, Product, Purchase, PurchaseStatus,
    PurchasedProduct, User,
};

pub const DEFAULT_CONDITION: &str = "nuevo";
pub const DEFAULT_SALE_STATE: &str = "disponible";
pub const DEFAULT_CONVERSATION_STATE: &str = "abierta";

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            user_id: dto.user_id.unwrap_or_default(),
            name: dto.name.unwrap_or_default(),
            email: dto.email.unwrap_or_default(),
            phone: dto.phone,
            location: dto.location,
            registered_at: dto.registered_at,
            active: dto.active.unwrap_or(true),
            seniority_months: dto.seniority_months.unwrap_or_default(),
            rating_average: dto.rating_average.unwrap_or_default(),
            rating_count: dto.rating_count.unwrap_or_default(),
            products_for_sale: dto.products_for_sale.unwrap_or_default(),
            products_sold: dto.products_sold.unwrap_or_default(),
            products_bought: dto.products_bought.unwrap_or_default(),
            image: dto.image,
        }
    }
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        let (category_id, category_name) = dto
            .category
            .map_or((0, String::new()), |c| (c.id, c.name.unwrap_or_default()));
        let (owner_id, owner_name, owner_rating) = dto.owner.map_or((0, String::new(), 0.0), |o| {
            (
                o.id,
                o.name.unwrap_or_default(),
                o.rating.unwrap_or_default(),
            )
        });

        Self {
            id: dto.id,
            product_id: dto.product_id.unwrap_or_default(),
            name: dto.name.unwrap_or_default(),
            description: dto.description.unwrap_or_default(),
            price: dto.price.unwrap_or_default(),
            condition: dto
                .condition
                .unwrap_or_else(|| DEFAULT_CONDITION.to_string()),
            sale_state: dto
                .sale_state
                .unwrap_or_else(|| DEFAULT_SALE_STATE.to_string()),
            location: dto.location.unwrap_or_default(),
            age_months: dto.age_months.unwrap_or_default(),
            published_at: dto.published_at,
            category_id,
            category_name,
            owner_id,
            owner_name,
            owner_rating,
            tags: dto
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(|tag| tag.name.unwrap_or_default())
                .collect(),
            comment_count: dto.comment_count.unwrap_or_default(),
            image_count: dto.image_count.unwrap_or_default(),
            main_image: dto.main_image,
        }
    }
}

impl From<CategoryDto> for Category {
    fn from(dto: CategoryDto) -> Self {
        Self {
            id: dto.id,
            category_id: dto.category_id.unwrap_or_default(),
            name: dto.name.unwrap_or_default(),
            description: dto.description,
            product_count: dto.product_count.unwrap_or_default(),
            image: dto.image,
        }
    }
}

impl From<NamedRef> for Party {
    fn from(dto: NamedRef) -> Self {
        Self {
            id: dto.id,
            name: dto.name.unwrap_or_default(),
        }
    }
}

impl From<PurchasedProductDto> for PurchasedProduct {
    fn from(dto: PurchasedProductDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name.unwrap_or_default(),
            price: dto.price.unwrap_or_default(),
            image: dto.image,
        }
    }
}

impl From<PurchaseDto> for Purchase {
    fn from(dto: PurchaseDto) -> Self {
        Self {
            id: dto.id,
            purchase_id: dto.purchase_id.unwrap_or_default(),
            status: dto
                .status
                .as_deref()
                .map_or(PurchaseStatus::Pending, PurchaseStatus::parse),
            amount: dto.amount.unwrap_or_default(),
            created_at: dto.created_at,
            confirmed_at: dto.confirmed_at,
            buyer: dto.buyer.map(Party::from),
            seller: dto.seller.map(Party::from),
            product: dto.product.map(PurchasedProduct::from),
        }
    }
}

impl From<ConversationDto> for Conversation {
    fn from(dto: ConversationDto) -> Self {
        let counterpart = dto.counterpart.map_or(
            Counterpart {
                id: 0,
                name: String::new(),
            },
            |other| Counterpart {
                id: other.id,
                name: other.name.unwrap_or_default(),
            },
        );

        Self {
            id: dto.id,
            subject: dto.subject.unwrap_or_default(),
            counterpart,
            state: dto
                .state
                .unwrap_or_else(|| DEFAULT_CONVERSATION_STATE.to_string()),
            message_count: dto.message_count.unwrap_or_default(),
            last_message: dto.last_message,
            last_message_at: dto.last_message_at,
            product_id: dto.product_id,
        }
    }
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        let (sender_id, sender_name) = dto
            .sender
            .map_or((0, String::new()), |s| (s.id, s.name.unwrap_or_default()));

        Self {
            id: dto.id,
            content: dto.content.unwrap_or_default(),
            sent_at: dto.sent_at,
            read: dto.read.unwrap_or_default(),
            sender_id,
            sender_name,
            from_buyer: dto.from_buyer.unwrap_or_default(),
            from_seller: dto.from_seller.unwrap_or_default(),
        }
    }
}

/// Map every element of an optional wire list.
pub fn map_all<D, M: From<D>>(items: Option<Vec<D>>) -> Vec<M> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(M::from)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_product_gets_defaults() {
        let dto: ProductDto = serde_json::from_value(json!({"id": 9})).unwrap();
        let product = Product::from(dto);

        assert_eq!(product.id, 9);
        assert_eq!(product.name, "");
        assert_eq!(product.condition, "nuevo");
        assert_eq!(product.sale_state, "disponible");
        assert_eq!(product.category_id, 0);
        assert_eq!(product.owner_rating, 0.0);
        assert!(product.tags.is_empty());
        assert_eq!(product.main_image, None);
    }

    #[test]
    fn test_full_product() {
        let dto: ProductDto = serde_json::from_value(json!({
            "id": 4,
            "id_producto": "PRD-00000004",
            "nombre": "Bicicleta",
            "descripcion": "Casi nueva",
            "precio": 120.5,
            "estado": "segunda_mano",
            "antiguedad_meses": 14,
            "ubicacion": "Sevilla",
            "estado_venta": "vendido",
            "categoria": {"id": 2, "nombre": "Deportes"},
            "propietario": {"id": 7, "nombre": "Luis", "valoracion": 4.5},
            "etiquetas": [{"id": 1, "nombre": "montaña"}, {"id": 2}],
            "total_comentarios": 3,
            "total_imagenes": 2,
            "imagen_principal": "aGVsbG8=",
            "fecha_publicacion": "2024-05-01T10:00:00"
        }))
        .unwrap();
        let product = Product::from(dto);

        assert_eq!(product.product_id, "PRD-00000004");
        assert_eq!(product.condition, "segunda_mano");
        assert_eq!(product.sale_state, "vendido");
        assert_eq!((product.category_id, product.category_name.as_str()), (2, "Deportes"));
        assert_eq!((product.owner_id, product.owner_name.as_str()), (7, "Luis"));
        assert_eq!(product.tags, vec!["montaña".to_string(), String::new()]);
        assert_eq!(product.age_months, 14);
    }

    #[test]
    fn test_user_defaults_to_active() {
        let dto: UserDto = serde_json::from_value(json!({
            "id": 5,
            "id_usuario": "USR-00005",
            "nombre": "Ana",
            "email": "ana@example.com"
        }))
        .unwrap();
        let user = User::from(dto);
        assert!(user.active);
        assert_eq!(user.rating_count, 0);

        let dto: UserDto =
            serde_json::from_value(json!({"id": 5, "activo": false, "antiguedad": 12})).unwrap();
        let user = User::from(dto);
        assert!(!user.active);
        assert_eq!(user.seniority_months, 12);
    }

    #[test]
    fn test_purchase_status_mapping() {
        let dto: PurchaseDto = serde_json::from_value(json!({
            "id": 1,
            "estado": "rechazada",
            "comprador": {"id": 3, "nombre": "Eva"},
            "producto": {"id": 8}
        }))
        .unwrap();
        let purchase = Purchase::from(dto);
        assert_eq!(purchase.status, PurchaseStatus::Rejected);
        assert_eq!(purchase.buyer.unwrap().name, "Eva");
        assert_eq!(purchase.seller, None);
        assert_eq!(purchase.product.unwrap().price, 0.0);

        let dto: PurchaseDto = serde_json::from_value(json!({"id": 2})).unwrap();
        assert_eq!(Purchase::from(dto).status, PurchaseStatus::Pending);

        let dto: PurchaseDto = serde_json::from_value(json!({"id": 3, "estado": "perdida"})).unwrap();
        assert_eq!(Purchase::from(dto).status, PurchaseStatus::Pending);
    }

    #[test]
    fn test_conversation_and_message_defaults() {
        let dto: ConversationDto = serde_json::from_value(json!({"id": 11})).unwrap();
        let conversation = Conversation::from(dto);
        assert_eq!(conversation.state, "abierta");
        assert_eq!(conversation.counterpart.id, 0);
        assert_eq!(conversation.product_id, None);

        let dto: MessageDto = serde_json::from_value(json!({
            "id": 2,
            "contenido": "Hola",
            "remitente": {"id": 4, "nombre": "Eva"},
            "es_de_comprador": true
        }))
        .unwrap();
        let message = Message::from(dto);
        assert_eq!(message.sender_name, "Eva");
        assert!(message.from_buyer);
        assert!(!message.from_seller);
        assert!(!message.read);
    }

    #[test]
    fn test_map_all() {
        let categories: Vec<Category> = map_all::<CategoryDto, _>(None);
        assert!(categories.is_empty());

        let dtos: Vec<CategoryDto> =
            serde_json::from_value(json!([{"id": 1, "nombre": "Hogar"}, {"id": 2}])).unwrap();
        let categories: Vec<Category> = map_all(Some(dtos));
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Hogar");
    }
}
