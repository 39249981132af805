use super::{failure, SERVER_ERROR};
use crate::{
    api::{
        dto::{ProductDto, ProductPage, ProductWriteResult},
        mapper::map_all,
        ApiClient, NewProduct, NoParams, ProductQuery, ProductUpdate,
    },
    models::Product,
    resource::ResourceFlow,
};
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const LIST_PATH: &str = "api/v1/productos/listar";
pub const PRODUCTS_PATH: &str = "api/v1/productos";

pub const NOT_FOUND: &str = "Product not found";
pub const CREATE_FAILED: &str = "Error creating product";
pub const UPDATE_FAILED: &str = "Error updating product";
pub const DELETE_FAILED: &str = "Error deleting product";

fn product_path(id: i64) -> String {
    format!("{PRODUCTS_PATH}/{id}")
}

#[derive(Debug, Clone)]
pub struct ProductRepository {
    api: Arc<ApiClient>,
}

impl ProductRepository {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Paged listing with optional category, condition and name filters.
    #[must_use]
    pub fn list(&self, query: ProductQuery) -> ResourceFlow<Vec<Product>> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { list_products(&api, &query).await })
    }

    #[must_use]
    pub fn get(&self, id: i64) -> ResourceFlow<Product> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { get_product(&api, id).await })
    }

    /// Publish a product; yields the new product id.
    #[must_use]
    pub fn create(&self, product: NewProduct) -> ResourceFlow<i64> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { create_product(&api, &product).await })
    }

    #[must_use]
    pub fn update(&self, id: i64, update: ProductUpdate) -> ResourceFlow<()> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { update_product(&api, id, &update).await })
    }

    #[must_use]
    pub fn delete(&self, id: i64) -> ResourceFlow<()> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { delete_product(&api, id).await })
    }
}

#[instrument(skip(api))]
async fn list_products(api: &ApiClient, query: &ProductQuery) -> Result<Vec<Product>, String> {
    let reply: Option<ProductPage> = api
        .call(Method::POST, LIST_PATH, query)
        .await
        .map_err(|e| failure("products.list", &e, SERVER_ERROR))?;

    let products: Vec<Product> = reply.map_or_else(Vec::new, |page| map_all(page.products));
    debug!(count = products.len(), "products listed");
    Ok(products)
}

#[instrument(skip(api))]
async fn get_product(api: &ApiClient, id: i64) -> Result<Product, String> {
    let reply: Option<ProductDto> = api
        .call(Method::POST, &product_path(id), &NoParams {})
        .await
        .map_err(|e| failure("products.get", &e, SERVER_ERROR))?;

    reply.map(Product::from).ok_or_else(|| NOT_FOUND.to_string())
}

#[instrument(skip_all, fields(name = %product.name))]
async fn create_product(api: &ApiClient, product: &NewProduct) -> Result<i64, String> {
    let reply: Option<ProductWriteResult> = api
        .call(Method::POST, PRODUCTS_PATH, product)
        .await
        .map_err(|e| failure("products.create", &e, CREATE_FAILED))?;

    reply
        .and_then(|result| result.product)
        .map(|product| product.id)
        .ok_or_else(|| CREATE_FAILED.to_string())
}

#[instrument(skip(api, update))]
async fn update_product(api: &ApiClient, id: i64, update: &ProductUpdate) -> Result<(), String> {
    let _: Option<Value> = api
        .call(Method::PUT, &product_path(id), update)
        .await
        .map_err(|e| failure("products.update", &e, UPDATE_FAILED))?;
    Ok(())
}

#[instrument(skip(api))]
async fn delete_product(api: &ApiClient, id: i64) -> Result<(), String> {
    let _: Option<Value> = api
        .call(Method::DELETE, &product_path(id), &NoParams {})
        .await
        .map_err(|e| failure("products.delete", &e, DELETE_FAILED))?;
    Ok(())
}
