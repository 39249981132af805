use super::{failure, SERVER_ERROR};
use crate::{
    api::{dto::CategoryPage, mapper::map_all, params::CATEGORIES_LIMIT, ApiClient, Page},
    models::Category,
    resource::ResourceFlow,
};
use http::Method;
use std::sync::Arc;
use tracing::instrument;

pub const CATEGORIES_PATH: &str = "api/v1/categorias";

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    api: Arc<ApiClient>,
}

impl CategoryRepository {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Every category, in one page.
    #[must_use]
    pub fn list(&self) -> ResourceFlow<Vec<Category>> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { list_categories(&api).await })
    }
}

#[instrument(skip(api))]
async fn list_categories(api: &ApiClient) -> Result<Vec<Category>, String> {
    let page = Page::new(0, CATEGORIES_LIMIT);

    let reply: Option<CategoryPage> = api
        .call(Method::POST, CATEGORIES_PATH, &page)
        .await
        .map_err(|e| failure("categories.list", &e, SERVER_ERROR))?;

    Ok(reply.map_or_else(Vec::new, |page| map_all(page.categories)))
}
