//! The client library against a live server: session handling, catalog
//! fetch, and cart math over real products.

use loomline_client::{ApiClient, ApiClientError, CartStore, ProductFilter, SortKey};
use loomline_integration_tests::base_url;
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn register_then_me_round_trips() {
    let mut api = ApiClient::new(base_url());

    let email = format!("client-{}@example.com", Uuid::new_v4());
    let session = api
        .register("Client Test", &email, "integration-password")
        .await
        .expect("register");
    assert_eq!(session.user.email, email);
    assert!(api.is_logged_in());

    let me = api.me().await.expect("me");
    assert_eq!(me.id, session.user.id);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn login_failure_surfaces_the_server_message() {
    let mut api = ApiClient::new(base_url());

    let result = api.login("nobody@example.com", "wrong-password").await;
    match result {
        Err(ApiClientError::Api { status, message }) => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected an API error, got {other:?}"),
    }
    assert!(!api.is_logged_in());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn catalog_feeds_filters_and_cart() {
    let api = ApiClient::new(base_url());

    let products = api.products().await.expect("products");

    // The filter pipeline accepts whatever the live catalog holds.
    let filter = ProductFilter {
        in_stock_only: true,
        ..ProductFilter::new()
    };
    let in_stock = filter.apply(&products, SortKey::PriceAsc);
    assert!(in_stock.iter().all(|p| p.stock > 0));

    if let Some(product) = in_stock.first() {
        let mut cart = CartStore::new();
        let size = product.sizes.first().cloned().unwrap_or_default();
        let color = product.colors.first().cloned().unwrap_or_default();

        cart.add(product, &size, &color, 2);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(
            cart.subtotal(),
            product.effective_price() * Decimal::from(2)
        );
    }
}
