//! Reqwest-backed entity service client
//!
//! The session token is injected at construction rather than read from
//! process-global state at call time; a missing token short-circuits every
//! call into `ApiError::MissingCredential` before any request is built.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::entity::{AckEnvelope, EntityDraft, ListEnvelope};
use crate::domain::menu::Menu;
use crate::infrastructure::api::ApiError;

use self::client_types::{MenuEnvelope, ProfileEnvelope};

/// A fetched page of records
#[derive(Debug, Clone)]
pub struct Page {
    pub rows: Vec<crate::domain::entity::EntityRecord>,
    pub total_count: u64,
}

/// Signed-in user shown in the topbar/profile popup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// Abstract admin API.
///
/// The runtime worker and tests depend on this trait rather than on
/// reqwest directly.
#[async_trait]
pub trait EntityApi: Send + Sync + 'static {
    /// List one page of records; `query` is empty unless server-side
    /// search is enabled.
    async fn list(
        &self,
        endpoint: &str,
        page: u64,
        page_size: u64,
        query: &str,
    ) -> Result<Page, ApiError>;

    async fn create(&self, endpoint: &str, draft: &EntityDraft) -> Result<(), ApiError>;

    async fn update(&self, endpoint: &str, id: &str, draft: &EntityDraft) -> Result<(), ApiError>;

    async fn delete(&self, endpoint: &str, id: &str) -> Result<(), ApiError>;

    /// Navigation menu tree for the sidebar
    async fn menus(&self) -> Result<Vec<Menu>, ApiError>;

    /// Signed-in user profile
    async fn profile(&self) -> Result<Profile, ApiError>;
}

/// HTTP implementation over the CRM backend
pub struct HttpEntityApi {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpEntityApi {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    fn token(&self) -> Result<&str, ApiError> {
        self.token.as_deref().ok_or(ApiError::MissingCredential)
    }

    // endpoints come from the menu payload and may or may not carry their
    // trailing slash; the service expects exactly one
    fn url(&self, endpoint: &str) -> String {
        let path = endpoint.trim_start_matches('/').trim_end_matches('/');
        format!("{}/{}/", self.base_url, path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        // prefer the service's own message when the error body parses
        let message = match response.json::<AckEnvelope>().await {
            Ok(ack) if !ack.message.is_empty() => ack.message,
            _ => status.to_string(),
        };
        Err(ApiError::Rejected {
            status: Some(status.as_u16()),
            message,
        })
    }

    async fn check_ack(response: reqwest::Response) -> Result<(), ApiError> {
        let response = Self::check_status(response).await?;
        let ack: AckEnvelope = response.json().await?;
        if ack.success {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                status: None,
                message: ack.message,
            })
        }
    }
}

#[async_trait]
impl EntityApi for HttpEntityApi {
    async fn list(
        &self,
        endpoint: &str,
        page: u64,
        page_size: u64,
        query: &str,
    ) -> Result<Page, ApiError> {
        let token = self.token()?;
        let mut request = self
            .http
            .get(self.url(endpoint))
            .bearer_auth(token)
            .query(&[("page", page.to_string()), ("page_size", page_size.to_string())]);
        if !query.is_empty() {
            request = request.query(&[("search", query)]);
        }

        let response = Self::check_status(request.send().await?).await?;
        let envelope: ListEnvelope = response.json().await?;
        if !envelope.success {
            return Err(ApiError::Rejected {
                status: None,
                message: envelope.message,
            });
        }
        Ok(Page {
            rows: envelope.data,
            total_count: envelope.count,
        })
    }

    async fn create(&self, endpoint: &str, draft: &EntityDraft) -> Result<(), ApiError> {
        let token = self.token()?;
        let response = self
            .http
            .post(self.url(endpoint))
            .bearer_auth(token)
            .json(draft)
            .send()
            .await?;
        Self::check_ack(response).await
    }

    async fn update(&self, endpoint: &str, id: &str, draft: &EntityDraft) -> Result<(), ApiError> {
        let token = self.token()?;
        let url = format!("{}{}/", self.url(endpoint), id);
        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .json(draft)
            .send()
            .await?;
        Self::check_ack(response).await
    }

    async fn delete(&self, endpoint: &str, id: &str) -> Result<(), ApiError> {
        let token = self.token()?;
        let url = format!("{}{}/", self.url(endpoint), id);
        let response = self.http.delete(url).bearer_auth(token).send().await?;
        Self::check_ack(response).await
    }

    async fn menus(&self) -> Result<Vec<Menu>, ApiError> {
        let token = self.token()?;
        let response = self
            .http
            .get(self.url("user/menu-list/"))
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let envelope: MenuEnvelope = response.json().await?;
        if !envelope.success {
            return Err(ApiError::Rejected {
                status: None,
                message: envelope.message,
            });
        }
        Ok(envelope.data)
    }

    async fn profile(&self) -> Result<Profile, ApiError> {
        let token = self.token()?;
        let response = self
            .http
            .get(self.url("user/profile/"))
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let envelope: ProfileEnvelope = response.json().await?;
        if !envelope.success {
            return Err(ApiError::Rejected {
                status: None,
                message: envelope.message,
            });
        }
        Ok(envelope.data)
    }
}

mod client_types {
    //! Private response shapes for the shell endpoints

    use serde::Deserialize;

    use crate::domain::menu::Menu;

    use super::Profile;

    #[derive(Debug, Deserialize)]
    pub struct MenuEnvelope {
        #[serde(default)]
        pub success: bool,
        #[serde(default)]
        pub message: String,
        #[serde(default)]
        pub data: Vec<Menu>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ProfileEnvelope {
        #[serde(default)]
        pub success: bool,
        #[serde(default)]
        pub message: String,
        #[serde(default)]
        pub data: Profile,
    }
}
