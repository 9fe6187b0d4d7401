use actix_web::{http::StatusCode, test::TestRequest};
use storefront_engine::{cache::CatalogCache, test_utils::fixtures::seeded_catalog, RemoteError};

use super::helpers::*;

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (status, body) = send(&app, TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn catalog_sorted_by_price() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (status, products) = send_json(&app, TestRequest::get().uri("/api/catalog?ordem=price_asc")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&products), ["Camisa Vermelha", "Camisa Azul", "Calça Jeans"]);

    let (_, products) = send_json(&app, TestRequest::get().uri("/api/catalog?ordem=price_desc")).await;
    assert_eq!(names(&products), ["Calça Jeans", "Camisa Azul", "Camisa Vermelha"]);
}

#[actix_web::test]
async fn catalog_filters_by_category_search_and_featured() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (_, products) =
        send_json(&app, TestRequest::get().uri("/api/catalog?categoria=camisas&ordem=price_asc")).await;
    assert_eq!(names(&products), ["Camisa Vermelha", "Camisa Azul"]);

    let (_, products) = send_json(&app, TestRequest::get().uri("/api/catalog?busca=JEANS")).await;
    assert_eq!(names(&products), ["Calça Jeans"]);

    let (_, products) = send_json(&app, TestRequest::get().uri("/api/catalog?destaque=true")).await;
    assert_eq!(names(&products), ["Camisa Azul"]);
}

#[actix_web::test]
async fn wildcard_search_is_the_unfiltered_catalog() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let cache = CatalogCache::new();
    let app = test_app(&seeded.db, &cache).await;
    let (status, products) = send_json(&app, TestRequest::get().uri("/api/catalog?busca=*&ordem=price_asc")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&products), ["Camisa Vermelha", "Camisa Azul", "Calça Jeans"]);
    let (_, products) = send_json(&app, TestRequest::get().uri("/api/catalog?ordem=price_asc")).await;
    assert_eq!(names(&products), ["Camisa Vermelha", "Camisa Azul", "Calça Jeans"]);
    assert_eq!(seeded.db.call_count("fetch_products"), 1);
}

#[actix_web::test]
async fn unknown_category_gives_an_empty_list() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (status, products) = send_json(&app, TestRequest::get().uri("/api/catalog?categoria=sapatos")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products, serde_json::json!([]));
    assert_eq!(seeded.db.call_count("fetch_products"), 0);
}

#[actix_web::test]
async fn repeated_reads_are_served_from_the_cache() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let cache = CatalogCache::new();
    let app = test_app(&seeded.db, &cache).await;
    for _ in 0..3 {
        let (status, _) = send(&app, TestRequest::get().uri("/api/catalog?ordem=recent")).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(seeded.db.call_count("fetch_products"), 1);
    assert_eq!(cache.stats().hits, 2);
}

#[actix_web::test]
async fn product_detail() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (status, product) = send_json(&app, TestRequest::get().uri("/api/products/camisa-azul")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["name"], "Camisa Azul");
    assert_eq!(product["category"]["slug"], "camisas");
    assert_eq!(product["primary_image"], "https://cdn.example.com/azul-1.jpg");
    let link = product["purchase_link"].as_str().unwrap();
    assert!(link.starts_with("https://wa.me/5588992376857?text="), "was: {link}");
}

#[actix_web::test]
async fn missing_product_is_not_found() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (status, body) = send(&app, TestRequest::get().uri("/api/products/sapato-social")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. No product with slug sapato-social"}"#);
}

#[actix_web::test]
async fn categories_and_active_banners() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (status, categories) = send_json(&app, TestRequest::get().uri("/api/categories")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&categories), ["Camisas", "Calças"]);

    let (status, banners) = send_json(&app, TestRequest::get().uri("/api/banners")).await;
    assert_eq!(status, StatusCode::OK);
    let titles = banners.as_array().unwrap().iter().map(|b| b["title"].as_str().unwrap()).collect::<Vec<_>>();
    assert_eq!(titles, ["Verão", "Inverno"]);
}

#[actix_web::test]
async fn hero_carousel() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (status, hero) = send_json(&app, TestRequest::get().uri("/api/hero")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hero["current"], 0);
    assert_eq!(hero["interval_secs"], 5);
    assert_eq!(hero["slides"][0]["image_url"], "https://cdn.example.com/hero-1.jpg");
    assert_eq!(hero["slides"][1]["image_url"], "https://cdn.example.com/hero-2.jpg");
    assert_eq!(hero["slides"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn hero_falls_back_without_banners() {
    let _ = env_logger::try_init().ok();
    let db = storefront_engine::MemoryCatalog::new();
    let app = test_app(&db, &CatalogCache::new()).await;
    let (status, hero) = send_json(&app, TestRequest::get().uri("/api/hero")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hero["slides"].as_array().unwrap().len(), 1);
    assert_eq!(hero["slides"][0]["image_url"], "/assets/hero-banner.jpg");
    assert_eq!(hero["interval_secs"], 0);
}

#[actix_web::test]
async fn remote_failure_is_a_bad_gateway() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let cache = CatalogCache::new();
    let app = test_app(&seeded.db, &cache).await;
    seeded.db.fail_next(RemoteError::new("connection reset"));
    let (status, body) = send(&app, TestRequest::get().uri("/api/categories")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("connection reset"), "was: {body}");
    assert!(cache.is_empty());
    // Failures aren't cached, so the next read goes back to the service
    let (status, _) = send(&app, TestRequest::get().uri("/api/categories")).await;
    assert_eq!(status, StatusCode::OK);
}
