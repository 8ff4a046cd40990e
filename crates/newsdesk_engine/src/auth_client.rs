use newsdesk_core::{UserProfile, Verdict};
use reqwest::StatusCode;
use url::Url;

use crate::http::{BodyError, ClientSettings, HttpCore, SetupError};
use crate::wire::WireVerify;
use crate::{AuthError, Credential};

const VERIFY_PATH: &str = "api/auth/verify";
const LOGOUT_PATH: &str = "api/auth/logout";

#[async_trait::async_trait]
pub trait AuthClient: Send + Sync {
    /// One remote round trip; `Err` only for transport or decode faults.
    async fn verify(&self, credential: &Credential) -> Result<Verdict, AuthError>;

    /// Tell the backend the session is over. Callers treat failure as non-fatal.
    async fn logout(&self, credential: &Credential) -> Result<(), AuthError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestAuthClient {
    http: HttpCore,
    verify_url: Url,
    logout_url: Url,
}

impl ReqwestAuthClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, SetupError> {
        let http = HttpCore::new(settings)?;
        let verify_url = http.endpoint(VERIFY_PATH)?;
        let logout_url = http.endpoint(LOGOUT_PATH)?;
        Ok(Self {
            http,
            verify_url,
            logout_url,
        })
    }
}

#[async_trait::async_trait]
impl AuthClient for ReqwestAuthClient {
    async fn verify(&self, credential: &Credential) -> Result<Verdict, AuthError> {
        let response = self
            .http
            .client
            .get(self.verify_url.clone())
            .bearer_auth(credential.expose())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(Verdict::Rejected);
        }
        if !status.is_success() {
            return Err(AuthError::Status(status.as_u16()));
        }

        let body = self.http.read_body(response).await.map_err(|err| match err {
            BodyError::TooLarge { actual, .. } => {
                AuthError::Decode(format!("verification body too large ({actual} bytes)"))
            }
            BodyError::Transport(err) => AuthError::from(err),
        })?;
        let wire: WireVerify =
            serde_json::from_slice(&body).map_err(|err| AuthError::Decode(err.to_string()))?;

        match (wire.valid, wire.user) {
            (true, Some(user)) => Ok(Verdict::Valid(UserProfile::from(user))),
            (true, None) => Err(AuthError::Decode("valid verdict without a user".to_string())),
            (false, _) => Ok(Verdict::Rejected),
        }
    }

    async fn logout(&self, credential: &Credential) -> Result<(), AuthError> {
        let response = self
            .http
            .client
            .post(self.logout_url.clone())
            .bearer_auth(credential.expose())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status.as_u16()));
        }
        Ok(())
    }
}
