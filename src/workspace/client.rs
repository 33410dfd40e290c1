//! HTTP client for the record store API

use std::time::Duration;

use reqwest::{multipart, Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use super::error::{ClientError, ClientResult};
use crate::api::ApiResponse;
use crate::auth::API_KEY_HEADER;
use crate::errors::ErrorResponse;
use crate::models::{
    Account, Creator, Deal, DeleteAccountRequest, DeleteCreatorRequest, DeleteDealRequest,
    ExportRequest, ImportPreview, ImportSummary, LoginRequest, Session, UpdateAccountRequest,
    UpdateCreatorRequest, UpdateDealRequest,
};

/// Store client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Store root, e.g. `http://127.0.0.1:8080`
    pub base_url: String,
    pub timeout: Duration,
    /// Machine PSK sent as `x-api-key`
    pub api_key: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// HTTP client for the `/api/*` endpoints
#[derive(Debug, Clone)]
pub struct CrmClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    session_token: Option<String>,
}

impl CrmClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            session_token: None,
        })
    }

    pub fn set_session_token(&mut self, token: Option<String>) {
        self.session_token = token;
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, url);

        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        if let Some(token) = &self.session_token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Map a non-2xx response to a client error, preferring the store's own message.
    async fn failure(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|body| body.message)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            _ => ClientError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Send a request and decode the success envelope.
    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<ApiResponse<T>> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }

        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.success {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "Request failed".to_string()),
            });
        }
        Ok(envelope)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Vec<T>> {
        let envelope = Self::send::<Vec<T>>(self.request(Method::GET, path)).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn write<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        Self::send(self.request(method, path).json(body)).await
    }

    // ========== Auth API ==========

    /// Exchange the shared password for a session and keep its token.
    pub async fn login(&mut self, password: &str) -> ClientResult<Session> {
        let request = LoginRequest {
            password: password.to_string(),
        };
        let session = self
            .write::<Session, _>(Method::POST, "/api/auth/login", &request)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing session data".to_string()))?;

        self.session_token = Some(session.token.clone());
        Ok(session)
    }

    /// Revoke the current session. The local token is dropped even if the store is unreachable.
    pub async fn logout(&mut self) -> ClientResult<()> {
        let result = Self::send::<serde_json::Value>(self.request(Method::POST, "/api/auth/logout"))
            .await
            .map(|_| ());
        self.session_token = None;
        result
    }

    // ========== Record API ==========

    pub async fn list_creators(&self) -> ClientResult<Vec<Creator>> {
        self.fetch("/api/creators").await
    }

    pub async fn list_accounts(&self) -> ClientResult<Vec<Account>> {
        self.fetch("/api/accounts").await
    }

    pub async fn list_deals(&self) -> ClientResult<Vec<Deal>> {
        self.fetch("/api/deals").await
    }

    pub async fn create_creator(&self, creator: &Creator) -> ClientResult<ApiResponse<Creator>> {
        self.write(Method::POST, "/api/creators", creator).await
    }

    pub async fn update_creator(
        &self,
        creator_id: &str,
        creator: &Creator,
    ) -> ClientResult<ApiResponse<Creator>> {
        let body = UpdateCreatorRequest {
            creator_id: creator_id.to_string(),
            updated_data: creator.clone(),
        };
        self.write(Method::PUT, "/api/creators", &body).await
    }

    pub async fn delete_creator(&self, creator_id: &str) -> ClientResult<ApiResponse<()>> {
        let body = DeleteCreatorRequest {
            creator_id: creator_id.to_string(),
        };
        self.write(Method::DELETE, "/api/creators", &body).await
    }

    pub async fn create_account(&self, account: &Account) -> ClientResult<ApiResponse<Account>> {
        self.write(Method::POST, "/api/accounts", account).await
    }

    /// Update the account stored under `account_id` (`creatorId-platform`).
    pub async fn update_account(
        &self,
        account_id: &str,
        account: &Account,
    ) -> ClientResult<ApiResponse<Account>> {
        let body = UpdateAccountRequest {
            account_id: account_id.to_string(),
            updated_data: account.clone(),
        };
        self.write(Method::PUT, "/api/accounts", &body).await
    }

    pub async fn delete_account(&self, account_id: &str) -> ClientResult<ApiResponse<()>> {
        let body = DeleteAccountRequest {
            account_id: account_id.to_string(),
        };
        self.write(Method::DELETE, "/api/accounts", &body).await
    }

    pub async fn create_deal(&self, deal: &Deal) -> ClientResult<ApiResponse<Deal>> {
        self.write(Method::POST, "/api/deals", deal).await
    }

    pub async fn update_deal(&self, deal_id: &str, deal: &Deal) -> ClientResult<ApiResponse<Deal>> {
        let body = UpdateDealRequest {
            deal_id: deal_id.to_string(),
            updated_data: deal.clone(),
        };
        self.write(Method::PUT, "/api/deals", &body).await
    }

    pub async fn delete_deal(&self, deal_id: &str) -> ClientResult<ApiResponse<()>> {
        let body = DeleteDealRequest {
            deal_id: deal_id.to_string(),
        };
        self.write(Method::DELETE, "/api/deals", &body).await
    }

    // ========== Import / export API ==========

    fn upload(bytes: Vec<u8>, filename: &str) -> ClientResult<multipart::Form> {
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("text/csv")?;
        Ok(multipart::Form::new().part("file", part))
    }

    /// Parse and validate an import file without writing anything.
    pub async fn import_preview(&self, bytes: Vec<u8>, filename: &str) -> ClientResult<ImportPreview> {
        let form = Self::upload(bytes, filename)?;
        let response = self
            .request(Method::POST, "/api/import/preview")
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }
        Ok(response.json().await?)
    }

    pub async fn import_creators(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> ClientResult<ApiResponse<ImportSummary>> {
        let form = Self::upload(bytes, filename)?;
        Self::send(
            self.request(Method::POST, "/api/import/creators")
                .multipart(form),
        )
        .await
    }

    /// Render rows server-side and return the file body.
    pub async fn export(&self, request: &ExportRequest) -> ClientResult<Vec<u8>> {
        let response = self
            .request(Method::POST, "/api/export")
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CrmClient::new(ClientConfig::new("http://localhost:8080/")).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
        assert!(client.session_token().is_none());
    }
}
