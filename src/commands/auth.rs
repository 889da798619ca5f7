use anyhow::{Result, bail};
use log::debug;

use crate::{
    api::{Credentials, NewUser, User},
    credential::CredentialStore,
    http::{RequestClient, Transport},
};

fn describe_user(user: &User) -> String {
    format!("{} <{}> (id {})", user.username, user.email, user.id)
}

#[tracing::instrument(skip(client, password))]
pub async fn login<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    username: &str,
    password: &str,
) -> Result<()> {
    let credentials = Credentials {
        username: username.to_string(),
        password: password.to_string(),
    };
    let token = client.login(&credentials).await?;
    if token.access_token.trim().is_empty() {
        bail!("Server accepted the login but returned no token");
    }
    println!("Logged in as {}", username);
    Ok(())
}

#[tracing::instrument(skip(client, password))]
pub async fn register<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let user = client
        .register(&NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .await?;
    println!("Registered {}", describe_user(&user));
    println!("Run `tripmate login {}` to sign in.", user.username);
    Ok(())
}

pub fn logout<T: Transport, S: CredentialStore>(client: &RequestClient<T, S>) -> Result<()> {
    if !client.is_authenticated() {
        debug!("No stored credential");
        println!("Not logged in.");
        return Ok(());
    }
    client.logout()?;
    println!("Logged out.");
    Ok(())
}

pub async fn whoami<T: Transport, S: CredentialStore>(client: &RequestClient<T, S>) -> Result<()> {
    let user = client.current_user().await?;
    println!("{}", describe_user(&user));
    Ok(())
}

pub async fn health<T: Transport, S: CredentialStore>(client: &RequestClient<T, S>) -> Result<()> {
    let health = client.health().await?;
    if health.message.is_empty() {
        println!("{}", health.status);
    } else {
        println!("{}: {}", health.status, health.message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::client;
    use crate::credential::CREDENTIAL_KEY;
    use crate::http::{FailureKind, RequestFailed};
    use reqwest::StatusCode;

    #[test]
    fn test_describe_user() {
        let user = User {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            created_at: "2024-01-01T00:00:00".to_string(),
        };
        assert_eq!(describe_user(&user), "alice <alice@example.com> (id 7)");
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let (client, _) = client(
            StatusCode::OK,
            r#"{"access_token": "abc.def", "token_type": "bearer"}"#,
            None,
        );

        login(&client, "alice", "secret1").await.unwrap();

        assert_eq!(client.credential().as_deref(), Some("abc.def"));
        assert_eq!(
            client.store().get(CREDENTIAL_KEY).unwrap().as_deref(),
            Some("abc.def")
        );
    }

    #[tokio::test]
    async fn test_login_empty_token_is_error() {
        let (client, _) = client(StatusCode::OK, r#"{"access_token": ""}"#, None);

        let err = login(&client, "alice", "secret1").await.unwrap_err();

        assert!(err.to_string().contains("no token"));
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let (client, _) = client(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": "Incorrect username or password"}"#,
            None,
        );

        let err = login(&client, "alice", "wrong").await.unwrap_err();

        let failed = err.downcast_ref::<RequestFailed>().unwrap();
        assert_eq!(failed.kind(), FailureKind::Unauthorized);
        assert_eq!(failed.message, "Incorrect username or password");
    }

    #[tokio::test]
    async fn test_register_validation_message() {
        let (client, _) = client(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"loc": ["body", "username"],
                "msg": "String should have at least 3 characters",
                "type": "string_too_short", "ctx": {"min_length": 3}}]}"#,
            None,
        );

        let err = register(&client, "al", "al@example.com", "secret1")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Username length must be at least 3 characters"
        );
    }

    #[test]
    fn test_logout_clears_credential() {
        let (client, seen) = client(StatusCode::OK, "{}", Some("tok"));

        logout(&client).unwrap();

        assert!(!client.is_authenticated());
        assert_eq!(client.store().get(CREDENTIAL_KEY).unwrap(), None);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_logout_when_logged_out() {
        let (client, _) = client(StatusCode::OK, "{}", None);
        logout(&client).unwrap();
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_whoami_and_health() {
        let (client, seen) = client(
            StatusCode::OK,
            r#"{"id": 1, "username": "alice", "email": "a@example.com",
                "created_at": "2024-01-01T00:00:00", "status": "ok", "message": "up"}"#,
            Some("tok"),
        );

        whoami(&client).await.unwrap();
        health(&client).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].url, "http://travel.test/auth/me");
        assert_eq!(seen[1].url, "http://travel.test/api/health");
    }
}
