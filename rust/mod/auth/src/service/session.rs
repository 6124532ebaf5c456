use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, info};

use crate::model::{Claims, Credentials, LoginResponse, User, UserSummary};
use crate::service::password::verify_password;
use crate::service::{AuthError, AuthService};

const BAD_CREDENTIALS: &str = "invalid email or password";

impl AuthService {
    /// Check credentials and issue an access token.
    ///
    /// Unknown email and wrong password fail the same way.
    pub fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        let (user, hash) = match self.find_credentials(&credentials.email)? {
            Some(found) => found,
            None => {
                debug!("login for unknown email");
                return Err(AuthError::Unauthorized(BAD_CREDENTIALS.into()));
            }
        };

        if !verify_password(&credentials.password, &hash) {
            debug!(user_id = user.id, "login with wrong password");
            return Err(AuthError::Unauthorized(BAD_CREDENTIALS.into()));
        }

        let token = self.issue_token(&user)?;
        info!(user_id = user.id, "user logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_ttl,
            user: UserSummary {
                id: user.id,
                fullname: user.fullname,
                role: user.role,
            },
        })
    }

    /// Sign an access token for a user.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.config.access_token_ttl);

        let claims = Claims {
            sub: user.id.to_string(),
            name: user.fullname.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("JWT encode failed: {}", e)))
    }

    /// Verify and decode an access token.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AuthError::Unauthorized(format!("invalid token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use luggage_sql::SqliteStore;

    use super::*;
    use crate::model::Role;
    use crate::service::{testkit, AuthConfig};

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_login_issues_verifiable_token() {
        let svc = testkit::service();
        let user = svc.signup(testkit::signup("sam@example.com", Role::Sender)).unwrap();

        let resp = svc.login(&creds("SAM@example.com", "correct horse")).unwrap();
        assert_eq!(resp.token_type, "Bearer");
        assert_eq!(resp.user.id, user.id);
        assert_eq!(resp.user.role, Role::Sender);

        let claims = svc.verify_token(&resp.token).unwrap();
        assert_eq!(claims.user_id(), Some(user.id));
        assert_eq!(claims.role, Role::Sender);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_login_rejects_bad_credentials() {
        let svc = testkit::service();
        svc.signup(testkit::signup("sam@example.com", Role::Sender)).unwrap();

        let wrong_pw = svc.login(&creds("sam@example.com", "nope")).unwrap_err();
        let unknown = svc.login(&creds("ghost@example.com", "correct horse")).unwrap_err();
        assert_eq!(wrong_pw.to_string(), unknown.to_string());
        assert!(matches!(wrong_pw, AuthError::Unauthorized(_)));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let svc = testkit::service();
        let user = svc.signup(testkit::signup("sam@example.com", Role::Sender)).unwrap();

        let other = AuthService::new(
            Arc::new(SqliteStore::open_in_memory().unwrap()),
            AuthConfig {
                jwt_secret: "a-different-secret".into(),
                ..Default::default()
            },
        )
        .unwrap();
        let foreign = other.issue_token(&user).unwrap();
        assert!(matches!(svc.verify_token(&foreign), Err(AuthError::Unauthorized(_))));
        assert!(svc.verify_token("garbage").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let svc = AuthService::new(
            Arc::new(SqliteStore::open_in_memory().unwrap()),
            AuthConfig {
                access_token_ttl: -3600,
                ..Default::default()
            },
        )
        .unwrap();
        let user = svc.signup(testkit::signup("old@example.com", Role::Handler)).unwrap();
        let token = svc.issue_token(&user).unwrap();
        assert!(svc.verify_token(&token).is_err());
    }
}
