use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        menu::MenuWithItems,
        share::{CreateShareRequest, MenuShare, ShareResponse, ShareType},
    },
    services::{families::FamilyService, menu_items::MenuItemService, menus::MenuService},
};

pub struct ShareService;

impl ShareService {
    fn generate_share_token() -> String {
        rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(48)
            .map(char::from)
            .collect()
    }

    /// Public URL for a share; token shares carry the token as a query param.
    pub fn share_url(base_url: &str, share: &MenuShare) -> String {
        let base = base_url.trim_end_matches('/');
        match &share.token {
            Some(token) => format!("{base}/share/{}?token={token}", share.id),
            None => format!("{base}/share/{}", share.id),
        }
    }

    pub async fn create(
        pool: &PgPool,
        menu_id: Uuid,
        req: &CreateShareRequest,
        user_id: Uuid,
        base_url: &str,
    ) -> Result<ShareResponse, ApiError> {
        let menu = MenuService::load(pool, menu_id).await?;
        FamilyService::assert_member(pool, menu.family_group_id, user_id).await?;

        let token = match req.share_type {
            ShareType::Token => Some(Self::generate_share_token()),
            ShareType::Link => None,
        };

        let share: MenuShare = sqlx::query_as(
            "INSERT INTO menu_shares (menu_id, share_type, token, expires_at, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(menu_id)
        .bind(req.share_type.to_string())
        .bind(&token)
        .bind(req.expires_at)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(ShareResponse {
            url: Self::share_url(base_url, &share),
            share,
        })
    }

    pub async fn list(
        pool: &PgPool,
        menu_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<MenuShare>, ApiError> {
        let menu = MenuService::load(pool, menu_id).await?;
        FamilyService::assert_member(pool, menu.family_group_id, user_id).await?;

        let shares = sqlx::query_as::<_, MenuShare>(
            "SELECT * FROM menu_shares WHERE menu_id = $1 ORDER BY created_at DESC",
        )
        .bind(menu_id)
        .fetch_all(pool)
        .await?;
        Ok(shares)
    }

    /// Only members can manage who has access; the link itself needs no
    /// membership to redeem.
    pub async fn delete(pool: &PgPool, share_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        let share: MenuShare = sqlx::query_as("SELECT * FROM menu_shares WHERE id = $1")
            .bind(share_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Share not found".into()))?;

        let menu = MenuService::load(pool, share.menu_id).await?;
        FamilyService::assert_member(pool, menu.family_group_id, user_id).await?;

        sqlx::query("DELETE FROM menu_shares WHERE id = $1")
            .bind(share_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Public redemption: the share is the authorization, so no membership
    /// check once expiry and token pass.
    pub async fn redeem(
        pool: &PgPool,
        share_id: Uuid,
        token: Option<&str>,
    ) -> Result<MenuWithItems, ApiError> {
        let share: MenuShare = sqlx::query_as("SELECT * FROM menu_shares WHERE id = $1")
            .bind(share_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Share not found".into()))?;

        share.check_access(token)?;

        let menu = MenuService::load(pool, share.menu_id).await?;
        let items = MenuItemService::list_with_recipes(pool, share.menu_id).await?;
        Ok(MenuWithItems { menu, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_share_token_shape() {
        let token = ShareService::generate_share_token();
        assert_eq!(token.len(), 48);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_share_url_building() {
        let mut share = MenuShare {
            id: Uuid::new_v4(),
            menu_id: Uuid::new_v4(),
            share_type: ShareType::Link.to_string(),
            token: None,
            expires_at: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let url = ShareService::share_url("https://mealweek.app/", &share);
        assert_eq!(url, format!("https://mealweek.app/share/{}", share.id));

        share.share_type = ShareType::Token.to_string();
        share.token = Some("tok123".into());
        let url = ShareService::share_url("https://mealweek.app", &share);
        assert_eq!(
            url,
            format!("https://mealweek.app/share/{}?token=tok123", share.id)
        );
    }
}
