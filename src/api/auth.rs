//! Login, registration and logout.

use reqwest::Method;
use secrecy::SecretString;
use tracing::info;

use super::client::ApiClient;
use super::models::{LoginRequest, LoginResponse, RegisterRequest, User};
use crate::error::{ApiError, Error};
use crate::session::{SaveOptions, Session};
use crate::validation;

impl ApiClient {
    /// Log in and persist the session. Returns the logged-in user.
    pub async fn login(
        &self,
        email: &str,
        password: SecretString,
        remember_email: bool,
    ) -> Result<User, Error> {
        validation::validate_email(email)?;

        let body = LoginRequest {
            email: email.trim().to_string(),
            password,
        };
        let resp: LoginResponse = self.send_json(Method::POST, &["auth", "login"], &body).await?;

        let session = Session::new(resp.token, resp.user);
        self.session()
            .save(&session, SaveOptions { remember_email })
            .await
            .map_err(ApiError::from)?;

        info!(email = %session.user.email, role = %session.user.role, "Logged in");
        Ok(session.user)
    }

    /// Create an account. The user still has to log in afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, Error> {
        validation::require("name", &request.name)?;
        validation::validate_email(&request.email)?;
        if let Some(phone) = &request.phone {
            validation::validate_phone(phone)?;
        }

        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum RegisterBody {
            Wrapped { user: User },
            Bare(User),
        }

        let body: RegisterBody = self
            .send_json(Method::POST, &["auth", "register"], request)
            .await?;
        let user = match body {
            RegisterBody::Wrapped { user } | RegisterBody::Bare(user) => user,
        };
        info!(email = %user.email, role = %user.role, "Registered");
        Ok(user)
    }

    /// Forget the token and user locally. There is no server-side logout.
    pub async fn logout(&self) -> Result<(), Error> {
        self.session().logout().await.map_err(ApiError::from)?;
        Ok(())
    }

    /// The stored user, or [`ApiError::NotAuthenticated`].
    pub async fn require_user(&self) -> Result<User, ApiError> {
        self.session()
            .current_user()
            .await?
            .ok_or(ApiError::NotAuthenticated)
    }
}
