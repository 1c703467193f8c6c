//! Company and user profile endpoints.

use reqwest::Method;

use super::client::ApiClient;
use super::models::{Profile, ProfileKind};
use crate::error::ApiError;

impl ApiClient {
    pub async fn get_profile(&self, kind: ProfileKind) -> Result<Profile, ApiError> {
        self.get(&kind.path()).await
    }

    /// Send the full profile; the server answers with the stored record.
    pub async fn update_profile(
        &self,
        kind: ProfileKind,
        profile: &Profile,
    ) -> Result<Profile, ApiError> {
        self.send_json(Method::PUT, &kind.path(), profile).await
    }
}
