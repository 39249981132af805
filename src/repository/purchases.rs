use super::{failure, SERVER_ERROR};
use crate::{
    api::{
        dto::{PurchaseActionResult, PurchasePage},
        mapper::map_all,
        params::NewPurchase,
        ApiClient, NoParams, PurchaseQuery,
    },
    models::Purchase,
    resource::ResourceFlow,
};
use http::Method;
use std::{fmt, sync::Arc};
use tracing::{info, instrument};

pub const PURCHASES_PATH: &str = "api/v1/compras";
pub const CREATE_PATH: &str = "api/v1/compras/crear";

pub const CREATE_FAILED: &str = "Error creating purchase";

/// Seller or buyer decision on a pending purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Confirm,
    Reject,
    Cancel,
}

impl Transition {
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::Confirm => "confirmar",
            Self::Reject => "rechazar",
            Self::Cancel => "cancelar",
        }
    }

    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Confirm => "Error confirming purchase",
            Self::Reject => "Error rejecting purchase",
            Self::Cancel => "Error cancelling purchase",
        }
    }

    #[must_use]
    pub fn path(self, purchase_id: i64) -> String {
        format!("{PURCHASES_PATH}/{purchase_id}/{}", self.action())
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Confirm => "confirm",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
        })
    }
}

#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    api: Arc<ApiClient>,
}

impl PurchaseRepository {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Purchases and sales of the current user, optionally filtered by role and status.
    #[must_use]
    pub fn list(&self, query: PurchaseQuery) -> ResourceFlow<Vec<Purchase>> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { list_purchases(&api, &query).await })
    }

    /// Buy a product; yields the purchase id.
    #[must_use]
    pub fn create(&self, product_id: i64) -> ResourceFlow<i64> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { create_purchase(&api, product_id).await })
    }

    #[must_use]
    pub fn confirm(&self, purchase_id: i64) -> ResourceFlow<()> {
        self.transition(purchase_id, Transition::Confirm)
    }

    #[must_use]
    pub fn reject(&self, purchase_id: i64) -> ResourceFlow<()> {
        self.transition(purchase_id, Transition::Reject)
    }

    #[must_use]
    pub fn cancel(&self, purchase_id: i64) -> ResourceFlow<()> {
        self.transition(purchase_id, Transition::Cancel)
    }

    fn transition(&self, purchase_id: i64, transition: Transition) -> ResourceFlow<()> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { apply_transition(&api, purchase_id, transition).await })
    }
}

#[instrument(skip(api))]
async fn list_purchases(api: &ApiClient, query: &PurchaseQuery) -> Result<Vec<Purchase>, String> {
    let reply: Option<PurchasePage> = api
        .call(Method::POST, PURCHASES_PATH, query)
        .await
        .map_err(|e| failure("purchases.list", &e, SERVER_ERROR))?;

    Ok(reply.map_or_else(Vec::new, |page| map_all(page.purchases)))
}

#[instrument(skip(api))]
async fn create_purchase(api: &ApiClient, product_id: i64) -> Result<i64, String> {
    let reply: Option<PurchaseActionResult> = api
        .call(Method::POST, CREATE_PATH, &NewPurchase { product_id })
        .await
        .map_err(|e| failure("purchases.create", &e, CREATE_FAILED))?;

    let purchase_id = reply
        .and_then(|result| result.purchase_id)
        .ok_or_else(|| CREATE_FAILED.to_string())?;

    info!(purchase_id, "purchase created");
    Ok(purchase_id)
}

#[instrument(skip(api))]
async fn apply_transition(
    api: &ApiClient,
    purchase_id: i64,
    transition: Transition,
) -> Result<(), String> {
    let reply: Option<PurchaseActionResult> = api
        .call(Method::POST, &transition.path(purchase_id), &NoParams {})
        .await
        .map_err(|e| failure("purchases.transition", &e, transition.failure_message()))?;

    info!(
        purchase_id,
        %transition,
        status = reply.and_then(|r| r.status).as_deref().unwrap_or("unknown"),
        "purchase updated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_paths() {
        assert_eq!(Transition::Confirm.path(12), "api/v1/compras/12/confirmar");
        assert_eq!(Transition::Reject.path(12), "api/v1/compras/12/rechazar");
        assert_eq!(Transition::Cancel.path(3), "api/v1/compras/3/cancelar");
    }
}
