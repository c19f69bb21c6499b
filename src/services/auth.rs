use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        auth::Claims,
        user::{AuthResponse, User, UserProfile},
    },
};

pub struct AuthService;

impl AuthService {
    /// Create an account and return a signed access token for it.
    pub async fn register(
        pool: &PgPool,
        username: &str,
        name: &str,
        password: &str,
        jwt_secret: &str,
        ttl_seconds: u64,
    ) -> Result<AuthResponse, ApiError> {
        let username = username.trim().to_lowercase();
        let name = name.trim();
        if username.is_empty() || name.is_empty() {
            return Err(ApiError::InvalidInput("Username and name are required".into()));
        }
        if password.len() < 8 {
            return Err(ApiError::InvalidInput(
                "Password must be at least 8 characters".into(),
            ));
        }

        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(&username)
                .fetch_one(pool)
                .await?;
        if taken {
            return Err(ApiError::InvalidInput("Username is already taken".into()));
        }

        let password_hash =
            bcrypt::hash(password, 12).map_err(|e| ApiError::Internal(e.into()))?;

        let user: User = sqlx::query_as(
            "INSERT INTO users (username, name, password_hash)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(&username)
        .bind(name)
        .bind(&password_hash)
        .fetch_one(pool)
        .await?;

        let token = Self::generate_access_token(&user, jwt_secret, ttl_seconds)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// Validate credentials and return a signed access token.
    pub async fn login(
        pool: &PgPool,
        username: &str,
        password: &str,
        jwt_secret: &str,
        ttl_seconds: u64,
    ) -> Result<AuthResponse, ApiError> {
        let user: User = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username.trim().to_lowercase())
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".into()))?;

        let valid = bcrypt::verify(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }

        let token = Self::generate_access_token(&user, jwt_secret, ttl_seconds)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user: User = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
        Ok(user.into())
    }

    pub fn generate_access_token(
        user: &User,
        secret: &str,
        ttl_seconds: u64,
    ) -> Result<String, ApiError> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now,
            exp: now + ttl_seconds as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::decode_access_token;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            name: "Alice".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let user = test_user();
        let token = AuthService::generate_access_token(&user, "test-secret", 3600).unwrap();
        let decoded = decode_access_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.user_id, user.id);
        assert_eq!(decoded.username, user.username);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let user = test_user();
        let token = AuthService::generate_access_token(&user, "test-secret", 3600).unwrap();
        assert!(decode_access_token(&token, "other-secret").is_err());
    }
}
