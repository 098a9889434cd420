use crate::domain::error::DomainError;
use crate::domain::user::Identity;
use crate::infrastructure::security::{generate_token, validate_token};
use anyhow::Result;
use tracing::{debug, error, info, instrument, warn};

/// Issues and verifies session tokens carrying the email claim.
pub struct SessionService {
    secret: String,
    ttl_secs: i64,
}

impl SessionService {
    pub fn new(secret: String, ttl_secs: i64) -> Self {
        Self { secret, ttl_secs }
    }

    #[instrument(skip(self), fields(email = %identity.email))]
    pub fn issue_token(&self, identity: &Identity) -> Result<String> {
        if identity.email.trim().is_empty() {
            warn!("Refusing to issue a session without email");
            return Err(DomainError::Validation("Missing email".to_string()).into());
        }

        let token = generate_token(&identity.email, &identity.name, &self.secret, self.ttl_secs)
            .map_err(|e| {
                error!(error = %e, "Failed to generate token");
                DomainError::Internal(format!("Failed to generate token: {}", e))
            })?;

        info!(ttl_secs = self.ttl_secs, "Session token issued");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Identity> {
        let claims = validate_token(token, &self.secret).map_err(|e| {
            debug!(error = %e, "Session token rejected");
            DomainError::Unauthorized("Invalid session".to_string())
        })?;

        if claims.sub.is_empty() {
            return Err(DomainError::Unauthorized("Session without email".to_string()).into());
        }
        Ok(Identity::new(claims.sub, claims.name))
    }
}
