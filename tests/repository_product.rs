mod common;

use catalog_api::domain::entities::{NewProduct, ProductFilter};
use catalog_api::domain::listing::{ListQuery, PageRequest, SortSpec};
use catalog_api::domain::repositories::ProductRepository;
use catalog_api::infrastructure::persistence::PgProductRepository;
use sqlx::PgPool;
use std::sync::Arc;

const SAFELIST: &[&str] = &["id", "name", "-id", "-name"];

fn query(sort: &str, page: u32, page_size: u32) -> ListQuery {
    ListQuery::new(
        SortSpec::resolve(sort, SAFELIST).unwrap(),
        PageRequest::new(page, page_size).unwrap(),
    )
}

fn new_product(name: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: "test product".to_string(),
        category: "tools".to_string(),
        image_url: "https://img.example.com/p.png".to_string(),
        price: "10.00".to_string(),
    }
}

#[sqlx::test]
async fn test_insert_and_fetch(pool: PgPool) {
    let repo = PgProductRepository::new(Arc::new(pool));

    let created = repo.insert(new_product("Anvil")).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.version, 1);

    let fetched = repo.fetch(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[sqlx::test]
async fn test_fetch_missing_is_not_found(pool: PgPool) {
    let repo = PgProductRepository::new(Arc::new(pool));

    assert!(repo.fetch(4242).await.unwrap_err().is_not_found());
    assert!(repo.fetch(0).await.unwrap_err().is_not_found());
}

#[sqlx::test]
async fn test_update_increments_version(pool: PgPool) {
    let repo = PgProductRepository::new(Arc::new(pool));
    let mut product = repo.insert(new_product("Anvil")).await.unwrap();

    product.name = "Heavy anvil".to_string();
    let version = repo.update(&product).await.unwrap();
    assert_eq!(version, 2);

    let stored = repo.fetch(product.id).await.unwrap();
    assert_eq!(stored.name, "Heavy anvil");
    assert_eq!(stored.version, 2);
}

#[sqlx::test]
async fn test_concurrent_update_loses(pool: PgPool) {
    let repo = PgProductRepository::new(Arc::new(pool));
    let product = repo.insert(new_product("Anvil")).await.unwrap();

    let mut first = product.clone();
    let mut second = product.clone();
    first.price = "12.00".to_string();
    second.price = "8.00".to_string();

    repo.update(&first).await.unwrap();
    let err = repo.update(&second).await.unwrap_err();
    assert!(matches!(err, catalog_api::AppError::EditConflict { .. }));

    assert_eq!(repo.fetch(product.id).await.unwrap().price, "12.00");
}

#[sqlx::test]
async fn test_update_deleted_is_not_found(pool: PgPool) {
    let repo = PgProductRepository::new(Arc::new(pool));
    let product = repo.insert(new_product("Anvil")).await.unwrap();

    repo.delete(product.id).await.unwrap();

    assert!(repo.update(&product).await.unwrap_err().is_not_found());
    assert!(repo.delete(product.id).await.unwrap_err().is_not_found());
    assert!(!repo.exists(product.id).await.unwrap());
}

#[sqlx::test]
async fn test_list_counts_before_paging(pool: PgPool) {
    for name in ["Anvil", "Bucket", "Chisel"] {
        common::create_test_product(&pool, name, "tools", "1.00").await;
    }
    let repo = PgProductRepository::new(Arc::new(pool));

    let (rows, total) = repo
        .list(ProductFilter::default(), query("name", 2, 2))
        .await
        .unwrap();

    assert_eq!(total, 3);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Chisel");
}

#[sqlx::test]
async fn test_list_full_text_filter(pool: PgPool) {
    common::create_test_product(&pool, "Cast iron pan", "kitchen", "40.00").await;
    common::create_test_product(&pool, "Iron anvil", "tools", "90.00").await;
    common::create_test_product(&pool, "Bucket", "tools", "5.00").await;
    let repo = PgProductRepository::new(Arc::new(pool));

    let filter = ProductFilter {
        name: "iron".to_string(),
        category: String::new(),
    };
    let (rows, total) = repo.list(filter, query("-id", 1, 10)).await.unwrap();

    assert_eq!(total, 2);
    assert_eq!(rows[0].name, "Iron anvil");
    assert_eq!(rows[1].name, "Cast iron pan");
}

#[sqlx::test]
async fn test_list_beyond_last_page(pool: PgPool) {
    common::create_test_product(&pool, "Anvil", "tools", "1.00").await;
    let repo = PgProductRepository::new(Arc::new(pool));

    let (rows, total) = repo
        .list(ProductFilter::default(), query("id", 5, 10))
        .await
        .unwrap();

    assert!(rows.is_empty());
    assert_eq!(total, 0);
}
