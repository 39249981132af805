use super::render::{follow, or_dash};
use crate::{
    api::PurchaseQuery,
    cli::globals::GlobalArgs,
    models::{Party, Purchase},
    repository::Transition,
};
use anyhow::Result;

#[derive(Debug)]
pub enum Operation {
    List(PurchaseQuery),
    Buy(i64),
    Transition(Transition, i64),
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub operation: Operation,
}

/// Execute a purchase action.
/// # Errors
/// Returns an error if the request fails or the backend refuses the change.
pub async fn execute(args: Args) -> Result<()> {
    let market = args.globals.marketplace(args.globals.open_store()?)?;

    match args.operation {
        Operation::List(query) => {
            let purchases = follow(market.purchases.list(query), "Loading purchases").await?;
            if purchases.is_empty() {
                println!("No purchases");
            }
            for purchase in &purchases {
                println!("{}", purchase_line(purchase));
            }
        }
        Operation::Buy(product_id) => {
            let id = follow(market.purchases.create(product_id), "Requesting purchase").await?;
            println!("Purchase {id} requested");
        }
        Operation::Transition(transition, id) => {
            let flow = match transition {
                Transition::Confirm => market.purchases.confirm(id),
                Transition::Reject => market.purchases.reject(id),
                Transition::Cancel => market.purchases.cancel(id),
            };
            follow(flow, "Updating purchase").await?;
            println!("Purchase {id}: {transition} done");
        }
    }

    Ok(())
}

fn party(party: Option<&Party>) -> &str {
    or_dash(party.map(|p| p.name.as_str()))
}

fn purchase_line(purchase: &Purchase) -> String {
    let product = purchase
        .product
        .as_ref()
        .map_or("-", |p| p.name.as_str());

    format!(
        "{:>6}  {:<14}  {:<11}  {:>10.2}  {}  {} -> {}  {}",
        purchase.id,
        purchase.purchase_id,
        purchase.status,
        purchase.amount,
        product,
        party(purchase.seller.as_ref()),
        party(purchase.buyer.as_ref()),
        or_dash(purchase.created_at.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PurchaseStatus, PurchasedProduct};

    #[test]
    fn test_purchase_line() {
        let purchase = Purchase {
            id: 12,
            purchase_id: "CMP-00000012".into(),
            status: PurchaseStatus::Confirmed,
            amount: 35.0,
            created_at: Some("2024-05-01 10:00:00".into()),
            confirmed_at: None,
            buyer: Some(Party {
                id: 3,
                name: "Ana".into(),
            }),
            seller: None,
            product: Some(PurchasedProduct {
                id: 9,
                name: "Lámpara".into(),
                price: 35.0,
                image: None,
            }),
        };

        let line = purchase_line(&purchase);
        assert!(line.contains("confirmada"));
        assert!(line.contains("35.00"));
        assert!(line.contains("Lámpara  - -> Ana"));
        assert!(line.ends_with("2024-05-01 10:00:00"));
    }
}
