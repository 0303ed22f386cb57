//! `reqwest`-backed implementation of [`AdminApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use olab_core::config::api::ApiConfig;
use olab_core::error::{AppError, ErrorKind};
use olab_core::result::AppResult;
use olab_core::types::UserId;
use olab_entity::acl::{AclQuery, AclRow};
use olab_entity::reference::{Group, Role};
use olab_entity::session::{AuthInfo, Credentials};
use olab_entity::user::User;

use crate::api::AdminApi;
use crate::upload::FileUpload;

/// HTTP client for the OLab backend.
#[derive(Debug, Clone)]
pub struct HttpAdminApi {
    client: Client,
    base_url: Url,
}

/// Body of `PUT users/{id}`.
#[derive(Serialize)]
struct UpdateUserBody<'a> {
    #[serde(flatten)]
    user: &'a User,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

impl HttpAdminApi {
    /// Create a client from the API configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            AppError::configuration(format!("Invalid API base URL '{}': {e}", config.base_url))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self { client, base_url })
    }

    /// The base URL all endpoint paths are joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::internal(format!("Invalid endpoint path '{path}': {e}")))
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> AppResult<RequestBuilder> {
        let url = self.url(path)?;
        debug!(%method, %url, "API request");
        let builder = self.client.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(builder: RequestBuilder) -> AppResult<Response> {
        let response = builder.send().await?;
        check_status(response).await
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> AppResult<T> {
        let response = Self::send(builder).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Map a non-success status to the matching error kind.
async fn check_status(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    warn!(%status, %url, "API call failed");

    let message = format!("{} {}: {}", status, url.path(), body.trim());
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::authentication(message),
        StatusCode::NOT_FOUND => AppError::not_found(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::validation(message)
        }
        _ => AppError::network(message),
    })
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn login(&self, credentials: &Credentials) -> AppResult<AuthInfo> {
        let builder = self
            .request(Method::POST, "auth/login", None)?
            .json(credentials);
        Self::send_json(builder).await
    }

    async fn get_users(&self, token: &str) -> AppResult<Vec<User>> {
        Self::send_json(self.request(Method::GET, "users", Some(token))?).await
    }

    async fn update_user(
        &self,
        token: &str,
        user: &User,
        password: Option<&str>,
    ) -> AppResult<User> {
        let builder = self
            .request(Method::PUT, &format!("users/{}", user.id), Some(token))?
            .json(&UpdateUserBody { user, password });
        Self::send_json(builder).await
    }

    async fn delete_users(&self, token: &str, ids: &[UserId]) -> AppResult<()> {
        let builder = self.request(Method::DELETE, "users", Some(token))?.json(ids);
        Self::send(builder).await?;
        Ok(())
    }

    async fn import_users(&self, token: &str, upload: &FileUpload) -> AppResult<Vec<User>> {
        let part = reqwest::multipart::Part::bytes(upload.data.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(upload.mime_type())?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let builder = self
            .request(Method::POST, "users/import", Some(token))?
            .multipart(form);
        Self::send_json(builder).await
    }

    async fn get_groups(&self, token: &str) -> AppResult<Vec<Group>> {
        Self::send_json(self.request(Method::GET, "groups", Some(token))?).await
    }

    async fn get_roles(&self, token: &str) -> AppResult<Vec<Role>> {
        Self::send_json(self.request(Method::GET, "roles", Some(token))?).await
    }

    async fn get_acls(&self, token: &str, query: &AclQuery) -> AppResult<Vec<AclRow>> {
        let builder = self
            .request(Method::GET, "acls", Some(token))?
            .query(&query.to_params());
        Self::send_json(builder).await
    }

    async fn post_acl(&self, token: &str, row: &AclRow) -> AppResult<AclRow> {
        let builder = self.request(Method::POST, "acls", Some(token))?.json(row);
        Self::send_json(builder).await
    }

    async fn put_acl(&self, token: &str, row: &AclRow) -> AppResult<()> {
        let builder = self
            .request(Method::PUT, &format!("acls/{}", row.id), Some(token))?
            .json(row);
        Self::send(builder).await?;
        Ok(())
    }

    async fn delete_acl(&self, token: &str, row: &AclRow) -> AppResult<()> {
        let builder = self.request(Method::DELETE, &format!("acls/{}", row.id), Some(token))?;
        Self::send(builder).await?;
        Ok(())
    }
}
