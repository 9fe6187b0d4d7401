use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header::AUTHORIZATION, StatusCode},
    test,
    test::TestRequest,
    web,
    App,
    Error,
};
use log::debug;
use serde_json::{json, Value};
use storefront_engine::{
    cache::CatalogCache,
    test_utils::fixtures::{ADMIN_EMAIL, ADMIN_PASSWORD},
    AdminApi,
    AuthApi,
    CatalogApi,
    MemoryCatalog,
};

use crate::{
    config::StoreSettings,
    server::{configure_routes, json_config},
};

/// Builds the full app over `db`, with `ADMIN_EMAIL` as the only admin.
pub async fn test_app(
    db: &MemoryCatalog,
    cache: &CatalogCache,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let auth_api = AuthApi::new(db.clone(), [ADMIN_EMAIL]);
    let app = App::new()
        .app_data(web::Data::new(CatalogApi::new(db.clone(), cache.clone())))
        .app_data(web::Data::new(AdminApi::new(db.clone(), cache.clone())))
        .app_data(web::Data::new(auth_api.clone()))
        .app_data(web::Data::new(StoreSettings::default()))
        .app_data(json_config())
        .configure(|cfg| configure_routes::<MemoryCatalog>(cfg, auth_api));
    test::init_service(app).await
}

pub async fn send<S, B>(app: &S, req: TestRequest) -> (StatusCode, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let body = String::from_utf8_lossy(&body).into_owned();
    debug!("Response: {status} {body}");
    (status, body)
}

pub async fn send_json<S, B>(app: &S, req: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let (status, body) = send(app, req).await;
    let value = serde_json::from_str(&body).unwrap_or(Value::String(body));
    (status, value)
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = TestRequest::post().uri("/auth/login").set_json(json!({ "email": email, "password": password }));
    send_json(app, req).await
}

/// Signs the seeded admin in and returns the access token.
pub async fn admin_token<S, B>(app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let (status, session) = login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {session}");
    session["access_token"].as_str().expect("access token in session").to_string()
}

pub fn bearer(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header((AUTHORIZATION, format!("Bearer {token}")))
}

pub fn names(products: &Value) -> Vec<String> {
    products
        .as_array()
        .map(|a| a.iter().filter_map(|p| p["name"].as_str().map(String::from)).collect())
        .unwrap_or_default()
}
