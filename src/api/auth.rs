use anyhow::Result;
use log::info;

use super::decode;
use super::types::{Credentials, Health, NewUser, Token, User};
use crate::credential::CredentialStore;
use crate::http::{RequestClient, RequestDescriptor, Transport};

impl<T: Transport, S: CredentialStore> RequestClient<T, S> {
    /// Creates an account. Sent without a credential.
    #[tracing::instrument(skip(self, user), fields(username = %user.username))]
    pub async fn register(&self, user: &NewUser) -> Result<User> {
        let descriptor =
            RequestDescriptor::post("/auth/register", serde_json::to_value(user)?).without_auth();
        decode(self.execute(&descriptor).await?, "registered user")
    }

    /// Exchanges username and password for a token and stores it.
    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Token> {
        let descriptor = RequestDescriptor::post("/auth/login", serde_json::to_value(credentials)?)
            .without_auth();
        let token: Token = decode(self.execute(&descriptor).await?, "login token")?;

        if !token.access_token.trim().is_empty() {
            self.set_credential(token.access_token.clone())?;
            info!("Logged in as {}", credentials.username);
        }
        Ok(token)
    }

    /// Drops the stored credential. Nothing is sent to the server.
    pub fn logout(&self) -> Result<()> {
        self.clear_credential()
    }

    pub async fn current_user(&self) -> Result<User> {
        decode(self.get("/auth/me", &[]).await?, "user")
    }

    pub async fn health(&self) -> Result<Health> {
        let descriptor = RequestDescriptor::get("/api/health").without_auth();
        decode(self.execute(&descriptor).await?, "health status")
    }
}
