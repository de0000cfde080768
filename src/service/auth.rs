use crate::config::SessionConfig;
use crate::database::session::SessionRepository;
use crate::database::user::{UserRepository, dummy_verify, hash_password, verify_password};
use crate::error::app_error::AppError;
use crate::models::session::IssuedSession;
use crate::models::user::User;
use crate::service::session::SessionService;
use tracing::{info, warn};
use uuid::Uuid;

/// Account registration, login and logout on top of [`SessionService`].
pub struct AuthService<'a, R: ?Sized> {
    repository: &'a R,
    config: &'a SessionConfig,
}

impl<'a, R: UserRepository + SessionRepository + ?Sized> AuthService<'a, R> {
    pub fn new(repository: &'a R, config: &'a SessionConfig) -> Self {
        AuthService { repository, config }
    }

    fn sessions(&self) -> SessionService<'a, R> {
        SessionService::new(self.repository, self.config)
    }

    /// Expects an already normalized email.
    pub async fn register(&self, email: &str, password: &str) -> Result<(User, IssuedSession), AppError> {
        if self.repository.get_user_by_email(email).await?.is_some() {
            return Err(AppError::UserAlreadyExists(email.to_string()));
        }

        let digest = hash_password(password)?;
        let user = self.repository.create_user(email, &digest).await?;
        info!(user_id = %user.id, "user registered");

        let issued = self.sessions().create_session(&user.id).await?;
        Ok((user, issued))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, IssuedSession), AppError> {
        let Some(user) = self.repository.get_user_by_email(email).await? else {
            dummy_verify(password);
            warn!("login attempt for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if let Err(e) = verify_password(&user, password) {
            warn!(user_id = %user.id, "login attempt with wrong password");
            return Err(e);
        }

        let issued = self.sessions().create_session(&user.id).await?;
        Ok((user, issued))
    }

    pub async fn logout(&self, session_id: &Uuid) -> Result<(), AppError> {
        if self.sessions().revoke(session_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("session not found"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::app_error::AuthError;
    use crate::test_utils::InMemoryRepository;

    fn config() -> SessionConfig {
        SessionConfig {
            jwt_secret: "test-secret".to_string(),
            ttl_seconds: 3600,
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let repo = InMemoryRepository::new();
        let config = config();
        let auth = AuthService::new(&repo, &config);

        let (user, issued) = auth.register("alice@x.com", "pw1").await.unwrap();
        assert_eq!(issued.session.user_id, user.id);
        assert_ne!(user.password_digest, "pw1");

        let (logged_in, _) = auth.login("alice@x.com", "pw1").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repo = InMemoryRepository::new();
        let config = config();
        let auth = AuthService::new(&repo, &config);

        auth.register("alice@x.com", "pw1").await.unwrap();
        let result = auth.register("alice@x.com", "other").await;
        assert!(matches!(result, Err(AppError::UserAlreadyExists(_))));
    }

    #[tokio::test]
    async fn bad_credentials_are_rejected_alike() {
        let repo = InMemoryRepository::new();
        let config = config();
        let auth = AuthService::new(&repo, &config);
        auth.register("alice@x.com", "pw1").await.unwrap();

        assert!(matches!(auth.login("alice@x.com", "wrong").await, Err(AppError::InvalidCredentials)));
        assert!(matches!(auth.login("nobody@x.com", "pw1").await, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn logout_invalidates_the_token() {
        let repo = InMemoryRepository::new();
        let config = config();
        let auth = AuthService::new(&repo, &config);
        let sessions = SessionService::new(&repo, &config);

        let (_, issued) = auth.register("alice@x.com", "pw1").await.unwrap();
        let context = sessions.verify(&issued.token).await.unwrap();

        auth.logout(&context.session_id).await.unwrap();
        assert!(matches!(sessions.verify(&issued.token).await, Err(AppError::Auth(AuthError::Revoked))));

        let again = auth.logout(&context.session_id).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn logout_leaves_other_sessions_alone() {
        let repo = InMemoryRepository::new();
        let config = config();
        let auth = AuthService::new(&repo, &config);
        let sessions = SessionService::new(&repo, &config);

        let (_, first) = auth.register("alice@x.com", "pw1").await.unwrap();
        let (_, second) = auth.login("alice@x.com", "pw1").await.unwrap();

        auth.logout(&first.session.id).await.unwrap();
        assert!(sessions.verify(&second.token).await.is_ok());
    }
}
