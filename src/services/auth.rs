//! Sign-in and sign-out workflows.

use crate::api::{ApiRequest, ApiTransport};
use crate::domain::types::ApiToken;
use crate::dto::api::LoginResponse;
use crate::forms::login::LoginForm;
use crate::services::{ServiceError, ServiceResult};
use crate::session::{Session, SessionStore};

pub const LOGIN_PATH: &str = "/auth/login";

/// Validates the credentials, exchanges them for a token and stores the
/// resulting session.
pub async fn login<T, S>(transport: &T, session: &S, form: LoginForm) -> ServiceResult<Session>
where
    T: ApiTransport + ?Sized,
    S: SessionStore + ?Sized,
{
    form.check()?;

    let body = serde_json::to_value(&form).map_err(|err| ServiceError::Unexpected(err.to_string()))?;

    let response = transport
        .send(ApiRequest::post(LOGIN_PATH).json(body))
        .await
        .map_err(|err| {
            log::error!("Login request failed: {err}");
            err
        })?;

    if response.is_unauthorized() {
        log::warn!("Login rejected for {}", form.username);
        return Err(ServiceError::InvalidCredentials);
    }

    if !response.is_success() {
        return Err(match response.message() {
            Some(message) => ServiceError::Rejected(message.to_string()),
            None => ServiceError::Unexpected(format!(
                "login failed with status {}",
                response.status
            )),
        });
    }

    let payload: LoginResponse = serde_json::from_value(response.body)
        .map_err(|err| ServiceError::Unexpected(err.to_string()))?;

    let token = payload
        .token
        .ok_or_else(|| ServiceError::Unexpected("login response has no token".to_string()))?;

    let new_session = Session::new(ApiToken::new(token)?, payload.user);
    session.store(new_session.clone())?;

    log::info!("Signed in as {}", form.username);

    Ok(new_session)
}

/// Forgets the stored session.
pub fn logout<S>(session: &S) -> ServiceResult<()>
where
    S: SessionStore + ?Sized,
{
    session.clear()?;
    log::info!("Signed out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::errors::ApiError;
    use crate::api::mock::MockTransport;
    use crate::api::{ApiResponse, Method};
    use crate::session::memory::MemorySessionStore;

    #[tokio::test]
    async fn login_stores_session() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.method == Method::Post
                    && request.path == LOGIN_PATH
                    && request.body
                        == Some(json!({"username": "admin", "password": "secret"}))
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::ok(json!({
                    "access_token": "abc",
                    "user": {"id": 1, "name": "Admin", "role": "admin"}
                })))
            });
        let store = MemorySessionStore::new();

        let session = login(&transport, &store, LoginForm::new(" admin ", "secret"))
            .await
            .unwrap();

        assert_eq!(session.token.as_str(), "abc");
        assert_eq!(session.user.as_ref().unwrap().name, "Admin");
        assert_eq!(store.current(), Some(session));
    }

    #[tokio::test]
    async fn unauthorized_login_is_invalid_credentials() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(ApiResponse::new(401, json!({"message": "bad"}))));
        let store = MemorySessionStore::new();

        let result = login(&transport, &store, LoginForm::new("admin", "wrong")).await;

        assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn invalid_form_is_not_sent() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();
        let store = MemorySessionStore::new();

        let result = login(&transport, &store, LoginForm::new("", "")).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[tokio::test]
    async fn missing_token_is_unexpected() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(ApiResponse::ok(json!({"user": null}))));
        let store = MemorySessionStore::new();

        let result = login(&transport, &store, LoginForm::new("admin", "secret")).await;

        assert!(matches!(result, Err(ServiceError::Unexpected(_))));
    }

    #[tokio::test]
    async fn transport_failure_is_propagated() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Err(ApiError::Timeout));
        let store = MemorySessionStore::new();

        let result = login(&transport, &store, LoginForm::new("admin", "secret")).await;

        assert!(matches!(result, Err(ServiceError::Api(ApiError::Timeout))));
    }

    #[test]
    fn logout_clears_session() {
        let store = MemorySessionStore::with_session(Session::new(
            ApiToken::new("abc").unwrap(),
            None,
        ));

        logout(&store).unwrap();

        assert!(store.current().is_none());
    }
}
