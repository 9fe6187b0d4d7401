use std::sync::Arc;

use bytes::Bytes;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client,
    Method,
    RequestBuilder,
    Response,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use crate::{
    config::HostedStoreConfig,
    data_objects::{AuthSession, AuthUser},
    query::RowQuery,
    HostedStoreError,
};

const PREFER_REPRESENTATION: &str = "return=representation";

#[derive(Clone)]
pub struct HostedStoreApi {
    config: HostedStoreConfig,
    client: Arc<Client>,
}

impl HostedStoreApi {
    pub fn new(config: HostedStoreConfig) -> Result<Self, HostedStoreError> {
        let mut headers = HeaderMap::with_capacity(3);
        let api_key = HeaderValue::from_str(config.api_key.reveal().as_str())
            .map_err(|e| HostedStoreError::Initialization(e.to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_key.reveal()))
            .map_err(|e| HostedStoreError::Initialization(e.to_string()))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| HostedStoreError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &HostedStoreConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.url)
    }

    fn table_url(&self, table: &str) -> String {
        self.url(&format!("/rest/v1/{table}"))
    }

    /// Sends the request and checks the status. Non-2xx responses become [`HostedStoreError::QueryError`] carrying
    /// the response body as the message.
    async fn send(&self, req: RequestBuilder) -> Result<Response, HostedStoreError> {
        let response = req.send().await.map_err(|e| HostedStoreError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let message =
                response.text().await.map_err(|e| HostedStoreError::RestResponseError(e.to_string()))?;
            Err(HostedStoreError::QueryError { status, message })
        }
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: String,
        params: &[(String, String)],
        body: Option<B>,
        prefer: Option<&'static str>,
    ) -> Result<T, HostedStoreError> {
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(prefer) = prefer {
            req = req.header("Prefer", prefer);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = self.send(req).await?;
        response.json::<T>().await.map_err(|e| HostedStoreError::JsonError(e.to_string()))
    }

    /// Fetches all rows of `table` matching `query`.
    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &RowQuery) -> Result<Vec<T>, HostedStoreError> {
        let params = query.to_params();
        debug!("Selecting from {table} with {} parameters", params.len());
        self.rest_query::<Vec<T>, ()>(Method::GET, self.table_url(table), &params, None, None).await
    }

    /// Fetches the first row matching `query`, or `None` if there isn't one.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &RowQuery,
    ) -> Result<Option<T>, HostedStoreError> {
        let query = query.clone().limit(1);
        let mut rows = self.select::<T>(table, &query).await?;
        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }

    /// Inserts a single row and returns it as stored.
    pub async fn insert<T: DeserializeOwned, B: Serialize>(&self, table: &str, row: &B) -> Result<T, HostedStoreError> {
        debug!("Inserting row into {table}");
        let rows = self
            .rest_query::<Vec<T>, &B>(Method::POST, self.table_url(table), &[], Some(row), Some(PREFER_REPRESENTATION))
            .await?;
        let row = rows.into_iter().next().ok_or(HostedStoreError::EmptyResponse)?;
        info!("Inserted row into {table}");
        Ok(row)
    }

    /// Applies `changes` to the row with the given id and returns the updated row.
    pub async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        id: &str,
        changes: &B,
    ) -> Result<T, HostedStoreError> {
        debug!("Updating {table} row {id}");
        let params = RowQuery::new().eq("id", id).to_params();
        let rows = self
            .rest_query::<Vec<T>, &B>(
                Method::PATCH,
                self.table_url(table),
                &params,
                Some(changes),
                Some(PREFER_REPRESENTATION),
            )
            .await?;
        let row = rows.into_iter().next().ok_or(HostedStoreError::EmptyResponse)?;
        info!("Updated {table} row {id}");
        Ok(row)
    }

    pub async fn delete(&self, table: &str, id: &str) -> Result<(), HostedStoreError> {
        debug!("Deleting {table} row {id}");
        let params = RowQuery::new().eq("id", id).to_params();
        let req = self.client.request(Method::DELETE, self.table_url(table)).query(&params);
        self.send(req).await?;
        info!("Deleted {table} row {id}");
        Ok(())
    }

    /// Stores `data` under `key` in the configured bucket and returns its public URL.
    pub async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> Result<String, HostedStoreError> {
        let url = self.url(&format!("/storage/v1/object/{}/{key}", self.config.bucket));
        debug!("Uploading {} bytes to {key}", data.len());
        let content_type =
            HeaderValue::from_str(content_type).map_err(|e| HostedStoreError::RestRequestError(e.to_string()))?;
        let req = self.client.post(url).header(CONTENT_TYPE, content_type).body(data);
        self.send(req).await?;
        let public_url = self.public_url(key);
        info!("Uploaded {key}");
        Ok(public_url)
    }

    pub fn public_url(&self, key: &str) -> String {
        self.url(&format!("/storage/v1/object/public/{}/{key}", self.config.bucket))
    }

    /// Exchanges an e-mail and password for an access token.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, HostedStoreError> {
        let url = self.url("/auth/v1/token");
        let params = vec![("grant_type".to_string(), "password".to_string())];
        let body = json!({ "email": email, "password": password });
        debug!("Requesting access token");
        self.rest_query::<AuthSession, _>(Method::POST, url, &params, Some(body), None).await
    }

    /// Asks the auth service who owns `access_token`. Invalid or expired tokens come back as a 401/403
    /// [`HostedStoreError::QueryError`].
    pub async fn fetch_user(&self, access_token: &str) -> Result<AuthUser, HostedStoreError> {
        let bearer = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| HostedStoreError::RestRequestError(e.to_string()))?;
        let req = self.client.get(self.url("/auth/v1/user")).header(AUTHORIZATION, bearer);
        let response = self.send(req).await?;
        response.json::<AuthUser>().await.map_err(|e| HostedStoreError::JsonError(e.to_string()))
    }
}
