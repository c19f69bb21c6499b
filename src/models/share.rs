use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ShareType {
    Link,
    Token,
}

impl std::fmt::Display for ShareType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ShareType::Link => "link",
            ShareType::Token => "token",
        };
        write!(f, "{s}")
    }
}

/// DB row struct — share_type fetched as TEXT.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuShare {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub share_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl MenuShare {
    /// Gate for public redemption: the expiry check runs first and rejects
    /// regardless of token correctness; token-type shares then require an
    /// exact match of the supplied token.
    pub fn check_access(&self, supplied_token: Option<&str>) -> Result<(), ApiError> {
        if let Some(expires_at) = self.expires_at {
            if expires_at < Utc::now() {
                return Err(ApiError::Forbidden("Share link has expired".into()));
            }
        }
        if self.share_type == ShareType::Token.to_string() {
            match (self.token.as_deref(), supplied_token) {
                (Some(expected), Some(supplied)) if expected == supplied => {}
                _ => return Err(ApiError::Forbidden("Invalid share token".into())),
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateShareRequest {
    pub share_type: ShareType,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Share row plus the URL a member can hand out.
#[derive(Debug, Serialize)]
pub struct ShareResponse {
    #[serde(flatten)]
    pub share: MenuShare,
    pub url: String,
}

/// Query params for GET /share/{share_id}.
#[derive(Debug, Deserialize)]
pub struct RedeemShareQuery {
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn share(share_type: ShareType, token: Option<&str>, expires_at: Option<DateTime<Utc>>) -> MenuShare {
        MenuShare {
            id: Uuid::new_v4(),
            menu_id: Uuid::new_v4(),
            share_type: share_type.to_string(),
            token: token.map(String::from),
            expires_at,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_link_share_needs_no_token() {
        let s = share(ShareType::Link, None, None);
        assert!(s.check_access(None).is_ok());
        assert!(s.check_access(Some("anything")).is_ok());
    }

    #[test]
    fn test_token_share_requires_exact_match() {
        let s = share(ShareType::Token, Some("abc123"), None);
        assert!(s.check_access(Some("abc123")).is_ok());
        assert!(matches!(s.check_access(None), Err(ApiError::Forbidden(_))));
        assert!(matches!(s.check_access(Some("abc124")), Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_expired_share_rejects_even_with_correct_token() {
        let past = Utc::now() - Duration::hours(1);
        let s = share(ShareType::Token, Some("abc123"), Some(past));
        assert!(matches!(s.check_access(Some("abc123")), Err(ApiError::Forbidden(_))));

        let expired_link = share(ShareType::Link, None, Some(past));
        assert!(matches!(expired_link.check_access(None), Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_future_expiry_passes() {
        let future = Utc::now() + Duration::days(7);
        let s = share(ShareType::Link, None, Some(future));
        assert!(s.check_access(None).is_ok());
    }
}
