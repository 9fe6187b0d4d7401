use actix_web::{
    http::{header::CONTENT_TYPE, StatusCode},
    test::TestRequest,
};
use serde_json::json;
use storefront_engine::{cache::CatalogCache, test_utils::fixtures::seeded_catalog, RemoteError};

use super::helpers::*;

#[actix_web::test]
async fn create_product_shows_up_in_the_catalog() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let cache = CatalogCache::new();
    let app = test_app(&seeded.db, &cache).await;
    let token = admin_token(&app).await;

    // Warm up the listing so that the write has something to invalidate
    let (_, before) = send_json(&app, TestRequest::get().uri("/api/catalog?ordem=price_asc")).await;
    assert_eq!(names(&before).len(), 3);

    let body = json!({ "name": "Camisa Polo", "price": "89,90", "category_id": seeded.shirts.id });
    let req = bearer(TestRequest::post().uri("/admin/products"), &token).set_json(body);
    let (status, product) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["slug"], "camisa-polo");
    assert_eq!(product["price"].as_f64(), Some(89.9));
    assert_eq!(product["is_active"], true);

    let (_, after) = send_json(&app, TestRequest::get().uri("/api/catalog?ordem=price_asc")).await;
    assert_eq!(names(&after), ["Camisa Vermelha", "Camisa Polo", "Camisa Azul", "Calça Jeans"]);
    assert_eq!(seeded.db.call_count("fetch_products"), 2);
}

#[actix_web::test]
async fn invalid_product_never_reaches_the_service() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let token = admin_token(&app).await;
    let body = json!({ "name": "  ", "price": "10" });
    let req = bearer(TestRequest::post().uri("/admin/products"), &token).set_json(body);
    let (status, err) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Invalid input. name is required");

    let body = json!({ "name": "Boné", "price": "caro" });
    let (status, _) = send_json(&app, bearer(TestRequest::post().uri("/admin/products"), &token).set_json(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(seeded.db.call_count("insert_product"), 0);
    assert_eq!(seeded.db.product_count(), 3);
}

#[actix_web::test]
async fn update_product_renames_and_invalidates_detail() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let token = admin_token(&app).await;
    let (status, _) = send(&app, TestRequest::get().uri("/api/products/calca-jeans")).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/admin/products/{}", seeded.jeans.id);
    let body = json!({ "name": "Calça Jeans Slim", "description": null });
    let (status, product) = send_json(&app, bearer(TestRequest::patch().uri(&uri), &token).set_json(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["slug"], "calca-jeans-slim");

    let (status, _) = send(&app, TestRequest::get().uri("/api/products/calca-jeans")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, detail) = send_json(&app, TestRequest::get().uri("/api/products/calca-jeans-slim")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Calça Jeans Slim");
}

#[actix_web::test]
async fn empty_patch_is_rejected() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let token = admin_token(&app).await;
    let uri = format!("/admin/products/{}", seeded.jeans.id);
    let (status, _) = send(&app, bearer(TestRequest::patch().uri(&uri), &token).set_json(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(seeded.db.call_count("update_product"), 0);
}

#[actix_web::test]
async fn delete_product() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let token = admin_token(&app).await;
    let (_, before) = send_json(&app, bearer(TestRequest::get().uri("/admin/products"), &token)).await;
    assert_eq!(names(&before).len(), 3);

    let uri = format!("/admin/products/{}", seeded.red_shirt.id);
    let (status, body) = send_json(&app, bearer(TestRequest::delete().uri(&uri), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, after) = send_json(&app, bearer(TestRequest::get().uri("/admin/products"), &token)).await;
    assert_eq!(names(&after), ["Calça Jeans", "Camisa Azul"]);
}

#[actix_web::test]
async fn remote_write_failure_is_a_bad_gateway() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let cache = CatalogCache::new();
    let app = test_app(&seeded.db, &cache).await;
    let token = admin_token(&app).await;
    send(&app, TestRequest::get().uri("/api/catalog")).await;
    let cached = cache.len();
    assert!(cached > 0);

    seeded.db.fail_next(RemoteError::with_status(409, "duplicate key value violates unique constraint"));
    let body = json!({ "name": "Camisa Azul", "price": 100 });
    let req = bearer(TestRequest::post().uri("/admin/products"), &token).set_json(body);
    let (status, err) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(err["error"].as_str().unwrap().contains("duplicate key"));
    assert_eq!(cache.len(), cached);
}

#[actix_web::test]
async fn product_images() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let token = admin_token(&app).await;
    let uri = format!("/admin/products/{}/images", seeded.red_shirt.id);
    let body = json!({ "image_url": "https://cdn.example.com/vermelha.jpg", "display_order": 1 });
    let (status, image) = send_json(&app, bearer(TestRequest::post().uri(&uri), &token).set_json(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let image_id = image["id"].as_str().unwrap().to_string();

    let (_, detail) = send_json(&app, TestRequest::get().uri("/api/products/camisa-vermelha")).await;
    assert_eq!(detail["primary_image"], "https://cdn.example.com/vermelha.jpg");

    let uri = format!("/admin/images/{image_id}");
    let body = json!({ "image_url": "https://cdn.example.com/vermelha-2.jpg" });
    let (status, _) = send(&app, bearer(TestRequest::patch().uri(&uri), &token).set_json(body)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, detail) = send_json(&app, TestRequest::get().uri("/api/products/camisa-vermelha")).await;
    assert_eq!(detail["primary_image"], "https://cdn.example.com/vermelha-2.jpg");

    let (status, _) = send(&app, bearer(TestRequest::delete().uri(&uri), &token)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, detail) = send_json(&app, TestRequest::get().uri("/api/products/camisa-vermelha")).await;
    assert!(detail["primary_image"].is_null());
}

#[actix_web::test]
async fn categories_crud() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let token = admin_token(&app).await;
    let body = json!({ "name": "Acessórios", "display_order": 3 });
    let (status, category) =
        send_json(&app, bearer(TestRequest::post().uri("/admin/categories"), &token).set_json(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["slug"], "acessorios");
    let id = category["id"].as_str().unwrap().to_string();

    let (_, categories) = send_json(&app, TestRequest::get().uri("/api/categories")).await;
    assert_eq!(names(&categories), ["Camisas", "Calças", "Acessórios"]);

    let uri = format!("/admin/categories/{id}");
    let body = json!({ "name": "Bonés" });
    let (status, category) = send_json(&app, bearer(TestRequest::patch().uri(&uri), &token).set_json(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(category["slug"], "bones");

    let (status, _) = send(&app, bearer(TestRequest::delete().uri(&uri), &token)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, categories) = send_json(&app, TestRequest::get().uri("/api/categories")).await;
    assert_eq!(names(&categories), ["Camisas", "Calças"]);
}

#[actix_web::test]
async fn renaming_a_category_refreshes_filtered_listings() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let token = admin_token(&app).await;
    let (_, products) = send_json(&app, TestRequest::get().uri("/api/catalog?categoria=calcas")).await;
    assert_eq!(names(&products), ["Calça Jeans"]);

    let uri = format!("/admin/categories/{}", seeded.trousers.id);
    let (status, _) =
        send(&app, bearer(TestRequest::patch().uri(&uri), &token).set_json(json!({ "name": "Bermudas" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, products) = send_json(&app, TestRequest::get().uri("/api/catalog?categoria=calcas")).await;
    assert_eq!(products, json!([]));
    let (_, products) = send_json(&app, TestRequest::get().uri("/api/catalog?categoria=bermudas")).await;
    assert_eq!(names(&products), ["Calça Jeans"]);
}

#[actix_web::test]
async fn banner_without_image_is_rejected() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let cache = CatalogCache::new();
    let app = test_app(&seeded.db, &cache).await;
    let token = admin_token(&app).await;
    send(&app, TestRequest::get().uri("/api/banners")).await;
    let cached = cache.len();

    let body = json!({ "title": "Promoção" });
    let (status, err) = send_json(&app, bearer(TestRequest::post().uri("/admin/banners"), &token).set_json(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Invalid input. image_url is required");
    assert_eq!(seeded.db.call_count("insert_banner"), 0);
    assert_eq!(cache.len(), cached);
}

#[actix_web::test]
async fn banners_crud_updates_the_hero() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let token = admin_token(&app).await;
    let (_, hero) = send_json(&app, TestRequest::get().uri("/api/hero")).await;
    assert_eq!(hero["slides"].as_array().unwrap().len(), 2);

    let body = json!({ "title": "Promoção", "image_url": "https://cdn.example.com/promo.jpg", "display_order": 0 });
    let req = bearer(TestRequest::post().uri("/admin/banners"), &token).set_json(body);
    let (status, banner) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, hero) = send_json(&app, TestRequest::get().uri("/api/hero")).await;
    assert_eq!(hero["slides"].as_array().unwrap().len(), 3);
    assert_eq!(hero["slides"][0]["image_url"], "https://cdn.example.com/promo.jpg");

    let (_, all) = send_json(&app, bearer(TestRequest::get().uri("/admin/banners"), &token)).await;
    assert_eq!(all.as_array().unwrap().len(), 4);

    let uri = format!("/admin/banners/{}", banner["id"].as_str().unwrap());
    let (status, _) =
        send(&app, bearer(TestRequest::patch().uri(&uri), &token).set_json(json!({ "is_active": false }))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, hero) = send_json(&app, TestRequest::get().uri("/api/hero")).await;
    assert_eq!(hero["slides"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, bearer(TestRequest::delete().uri(&uri), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seeded.db.banner_count(), 3);
}

#[actix_web::test]
async fn upload_image() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let token = admin_token(&app).await;
    let req = bearer(TestRequest::post().uri("/admin/uploads?folder=banners&filename=Promo.PNG"), &token)
        .insert_header((CONTENT_TYPE, "image/png"))
        .set_payload(vec![0x89, b'P', b'N', b'G']);
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let url = body["url"].as_str().unwrap();
    let key = url.split("/public/images/").nth(1).unwrap();
    assert!(key.starts_with("banners/") && key.ends_with(".png"), "was: {key}");
    let (data, content_type) = seeded.db.stored_object(key).unwrap();
    assert_eq!(data.as_ref(), &[0x89, b'P', b'N', b'G']);
    assert_eq!(content_type, "image/png");
}

#[actix_web::test]
async fn empty_upload_is_rejected() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let token = admin_token(&app).await;
    let req = bearer(TestRequest::post().uri("/admin/uploads?filename=foto.jpg"), &token);
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = bearer(TestRequest::post().uri("/admin/uploads?filename=sem-extensao"), &token).set_payload("x");
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(seeded.db.call_count("upload_object"), 0);
}
