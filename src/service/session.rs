use crate::config::SessionConfig;
use crate::database::session::SessionRepository;
use crate::error::app_error::{AppError, AuthError};
use crate::models::session::{IssuedSession, NewSession, SessionClaims, SessionContext};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

/// Hex SHA-256 of a bearer token, as stored on the session row.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Issues, verifies and revokes bearer sessions.
pub struct SessionService<'a, R: ?Sized> {
    repository: &'a R,
    config: &'a SessionConfig,
}

impl<'a, R: SessionRepository + ?Sized> SessionService<'a, R> {
    pub fn new(repository: &'a R, config: &'a SessionConfig) -> Self {
        SessionService { repository, config }
    }

    pub async fn create_session(&self, user_id: &Uuid) -> Result<IssuedSession, AppError> {
        let now = Utc::now();
        let expires_at = now + self.config.ttl();
        let claims = SessionClaims {
            sub: *user_id,
            sid: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::token("Failed to sign session token", e))?;

        let session = self
            .repository
            .create_session(&NewSession {
                id: claims.sid,
                user_id: *user_id,
                token: token_digest(&token),
                expires_at,
            })
            .await?;

        info!(user_id = %user_id, session_id = %session.id, "session created");

        Ok(IssuedSession { session, token })
    }

    pub async fn verify(&self, token: &str) -> Result<SessionContext, AppError> {
        let claims = self.decode_claims(token)?;

        let session = self
            .repository
            .get_session(&claims.sid, &claims.sub)
            .await?
            .ok_or(AuthError::Unknown)?;

        if session.token != token_digest(token) {
            return Err(AuthError::Unknown.into());
        }
        session.check_valid_at(Utc::now())?;

        Ok(SessionContext {
            user_id: session.user_id,
            session_id: session.id,
        })
    }

    /// Returns `false` when nothing was revoked (unknown or already revoked).
    pub async fn revoke(&self, session_id: &Uuid) -> Result<bool, AppError> {
        let revoked = self.repository.revoke_session(session_id, Utc::now()).await?;
        if revoked {
            info!(session_id = %session_id, "session revoked");
        }
        Ok(revoked)
    }

    fn decode_claims(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<SessionClaims>(token, &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "bearer token rejected");
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::Invalid,
                }
            })
    }
}
