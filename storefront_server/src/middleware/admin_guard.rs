//! Admin guard middleware.
//!
//! Wrap the back-office scope with [`AdminGuardFactory`]. Every request must carry an `Authorization: Bearer <token>`
//! header. The token is verified by [`AuthApi`], which also checks the owner against the admin allowlist. On success
//! the verified [`AdminIdentity`] is stored in the request extensions, where handlers can pick it up with the
//! [`AdminUser`] extractor. Otherwise the request is answered with a 401 (missing or invalid token) or 403 (not an
//! admin) and never reaches the handler.
use std::{
    fmt::Display,
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    FromRequest,
    HttpMessage,
    HttpRequest,
};
use futures::future::LocalBoxFuture;
use log::*;
use storefront_engine::{
    traits::{AdminIdentity, AuthManagement},
    AuthApi,
};

use crate::{errors::ServerError, helpers::bearer_token};

pub struct AdminGuardFactory<A> {
    auth: AuthApi<A>,
}

impl<A> AdminGuardFactory<A> {
    pub fn new(auth: AuthApi<A>) -> Self {
        Self { auth }
    }
}

impl<S, B, A> Transform<S, ServiceRequest> for AdminGuardFactory<A>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    A: AuthManagement + Clone + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AdminGuardService<S, A>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminGuardService { auth: self.auth.clone(), service: Rc::new(service) }))
    }
}

pub struct AdminGuardService<S, A> {
    auth: AuthApi<A>,
    service: Rc<S>,
}

impl<S, B, A> Service<ServiceRequest> for AdminGuardService<S, A>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    A: AuthManagement + Clone + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let auth = self.auth.clone();
        Box::pin(async move {
            match authorise(&auth, &req).await {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                },
                Err(e) => Ok(req.error_response(e).map_into_right_body()),
            }
        })
    }
}

async fn authorise<A: AuthManagement>(auth: &AuthApi<A>, req: &ServiceRequest) -> Result<AdminIdentity, ServerError> {
    let token = bearer_token(req.headers()).ok_or_else(|| {
        debug!("💻️ No bearer token on request to {}", req.path());
        ServerError::Unauthorized("A bearer token is required".into())
    })?;
    let identity = auth.authenticate(&token).await.map_err(|e| {
        info!("💻️ Refused back-office request to {}. {e}", req.path());
        ServerError::from(e)
    })?;
    trace!("💻️ {} is authorised for {}", identity.user_id, req.path());
    Ok(identity)
}

/// The admin behind the current request. Only available inside a scope wrapped by [`AdminGuardFactory`].
#[derive(Debug, Clone)]
pub struct AdminUser(pub AdminIdentity);

impl Display for AdminUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0.email {
            Some(email) => f.write_str(email),
            None => f.write_str(&self.0.user_id),
        }
    }
}

impl FromRequest for AdminUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<AdminIdentity>().cloned();
        ready(identity.map(AdminUser).ok_or_else(|| {
            warn!("💻️ No admin identity found in request extensions. Is the route behind the admin guard?");
            ServerError::Unauthorized("No admin identity for this request".into())
        }))
    }
}
