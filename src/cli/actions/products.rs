use super::render::{follow, or_dash, truncate};
use crate::{
    api::{NewProduct, ProductQuery, ProductUpdate},
    cli::globals::GlobalArgs,
    models::{Category, Product},
};
use anyhow::{bail, Result};

#[derive(Debug)]
pub enum Operation {
    List(ProductQuery),
    Show(i64),
    Create(NewProduct),
    Update(i64, ProductUpdate),
    Delete(i64),
    Categories,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub operation: Operation,
}

/// Execute a catalog action.
/// # Errors
/// Returns an error if the request fails or is rejected.
pub async fn execute(args: Args) -> Result<()> {
    let market = args.globals.marketplace(args.globals.open_store()?)?;

    match args.operation {
        Operation::List(query) => {
            let products = follow(market.products.list(query), "Loading products").await?;
            if products.is_empty() {
                println!("No products found");
            }
            for product in &products {
                println!("{}", product_line(product));
            }
        }
        Operation::Show(id) => {
            let product = follow(market.products.get(id), "Loading product").await?;
            print!("{}", product_detail(&product));
        }
        Operation::Create(product) => {
            let id = follow(market.products.create(product), "Publishing product").await?;
            println!("Product {id} published");
        }
        Operation::Update(id, update) => {
            if update.is_empty() {
                bail!("nothing to update: pass at least one of --name, --description, --price, --location");
            }
            follow(market.products.update(id, update), "Updating product").await?;
            println!("Product {id} updated");
        }
        Operation::Delete(id) => {
            follow(market.products.delete(id), "Deleting product").await?;
            println!("Product {id} deleted");
        }
        Operation::Categories => {
            let categories = follow(market.categories.list(), "Loading categories").await?;
            for category in &categories {
                println!("{}", category_line(category));
            }
        }
    }

    Ok(())
}

fn product_line(product: &Product) -> String {
    format!(
        "{:>6}  {:<32}  {:>10.2}  {:<12}  {}",
        product.id,
        truncate(&product.name, 32),
        product.price,
        product.condition,
        product.location
    )
}

fn product_detail(product: &Product) -> String {
    let mut out = format!("{} ({})\n", product.name, product.product_id);
    out.push_str(&format!("  price:      {:.2}\n", product.price));
    out.push_str(&format!(
        "  condition:  {} ({} months)\n",
        product.condition, product.age_months
    ));
    out.push_str(&format!("  state:      {}\n", product.sale_state));
    out.push_str(&format!(
        "  category:   {} [{}]\n",
        product.category_name, product.category_id
    ));
    out.push_str(&format!(
        "  seller:     {} [{}] rating {:.1}\n",
        product.owner_name, product.owner_id, product.owner_rating
    ));
    out.push_str(&format!("  location:   {}\n", product.location));
    out.push_str(&format!(
        "  published:  {}\n",
        or_dash(product.published_at.as_deref())
    ));
    if !product.tags.is_empty() {
        out.push_str(&format!("  tags:       {}\n", product.tags.join(", ")));
    }
    out.push_str(&format!(
        "  images:     {}  comments: {}\n",
        product.image_count, product.comment_count
    ));
    if !product.description.is_empty() {
        out.push_str(&format!("\n{}\n", product.description));
    }
    out
}

fn category_line(category: &Category) -> String {
    format!(
        "{:>4}  {:<24}  {:>5} products",
        category.id, category.name, category.product_count
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::commands::{connection, session};
    use std::time::Duration;

    fn product() -> Product {
        Product {
            id: 4,
            product_id: "PRD-00000004".into(),
            name: "Bicicleta".into(),
            description: "Casi nueva".into(),
            price: 120.5,
            condition: "segunda_mano".into(),
            sale_state: "disponible".into(),
            location: "Sevilla".into(),
            age_months: 14,
            published_at: None,
            category_id: 2,
            category_name: "Deportes".into(),
            owner_id: 7,
            owner_name: "Luis".into(),
            owner_rating: 4.5,
            tags: vec!["montaña".into()],
            comment_count: 3,
            image_count: 2,
            main_image: None,
        }
    }

    #[test]
    fn test_product_line() {
        let line = product_line(&product());
        assert!(line.contains("Bicicleta"));
        assert!(line.contains("120.50"));
        assert!(line.ends_with("Sevilla"));
    }

    #[test]
    fn test_product_detail() {
        let detail = product_detail(&product());
        assert!(detail.starts_with("Bicicleta (PRD-00000004)\n"));
        assert!(detail.contains("seller:     Luis [7] rating 4.5"));
        assert!(detail.contains("published:  -"));
        assert!(detail.contains("tags:       montaña"));
        assert!(detail.ends_with("Casi nueva\n"));
    }

    #[tokio::test]
    async fn test_update_without_changes_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let globals = GlobalArgs::new(
            connection::Options {
                // nothing listens here; the command must fail before any request
                base_url: Some("http://127.0.0.1:9".to_string()),
                connect_timeout: Duration::from_secs(1),
                read_timeout: Duration::from_secs(1),
                write_timeout: Duration::from_secs(1),
            },
            session::Options {
                store_path: dir.path().join("session.bin"),
                master_key: None,
                master_key_file: dir.path().join("master.key"),
            },
        );

        let err = execute(Args {
            globals,
            operation: Operation::Update(4, ProductUpdate::default()),
        })
        .await
        .unwrap_err();

        assert!(err.to_string().starts_with("nothing to update"));
    }
}
