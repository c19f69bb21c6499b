use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::menu::{
        CreateMenuRequest, Menu, MenuListQuery, MenuListResponse, MenuStatus, MenuType,
        MenuWithItems, UpdateMenuRequest,
    },
    services::{families::FamilyService, menu_items::MenuItemService},
};

pub(crate) fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ApiError> {
    if start > end {
        return Err(ApiError::InvalidInput(
            "start_date must not be after end_date".into(),
        ));
    }
    Ok(())
}

/// (limit, offset) for a 1-based page query; limit clamped to 1..=100.
pub(crate) fn page_offset(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(20).clamp(1, 100);
    (limit, (page - 1) * limit)
}

pub struct MenuService;

impl MenuService {
    pub async fn create(
        pool: &PgPool,
        req: &CreateMenuRequest,
        user_id: Uuid,
    ) -> Result<Menu, ApiError> {
        FamilyService::assert_member(pool, req.family_group_id, user_id).await?;
        if req.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("Menu name is required".into()));
        }
        validate_date_range(req.start_date, req.end_date)?;

        let menu: Menu = sqlx::query_as(
            "INSERT INTO menus
                (name, description, menu_type, status, start_date, end_date,
                 family_group_id, created_by, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(req.menu_type.unwrap_or(MenuType::Weekly).to_string())
        .bind(req.status.unwrap_or(MenuStatus::Draft).to_string())
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.family_group_id)
        .bind(user_id)
        .bind(req.tags.clone().unwrap_or_default())
        .fetch_one(pool)
        .await?;

        Ok(menu)
    }

    pub async fn load(pool: &PgPool, id: Uuid) -> Result<Menu, ApiError> {
        let menu: Menu = sqlx::query_as("SELECT * FROM menus WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Menu not found".into()))?;
        Ok(menu)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateMenuRequest,
        user_id: Uuid,
    ) -> Result<Menu, ApiError> {
        let menu = Self::load(pool, id).await?;
        FamilyService::assert_member(pool, menu.family_group_id, user_id).await?;
        if menu.created_by != user_id {
            return Err(ApiError::Forbidden(
                "Only the menu creator can update it".into(),
            ));
        }

        // The range after the partial merge must still be ordered
        let start = req.start_date.unwrap_or(menu.start_date);
        let end = req.end_date.unwrap_or(menu.end_date);
        validate_date_range(start, end)?;

        let updated: Menu = sqlx::query_as(
            "UPDATE menus
             SET name        = COALESCE($1, name),
                 description = COALESCE($2, description),
                 menu_type   = COALESCE($3, menu_type),
                 status      = COALESCE($4, status),
                 start_date  = COALESCE($5, start_date),
                 end_date    = COALESCE($6, end_date),
                 tags        = COALESCE($7, tags),
                 updated_at  = NOW()
             WHERE id = $8
             RETURNING *",
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.menu_type.map(|t| t.to_string()))
        .bind(req.status.map(|s| s.to_string()))
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(&req.tags)
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(updated)
    }

    /// Items and shares go with the menu via FK cascade.
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        let menu = Self::load(pool, id).await?;
        FamilyService::assert_member(pool, menu.family_group_id, user_id).await?;
        if menu.created_by != user_id {
            return Err(ApiError::Forbidden(
                "Only the menu creator can delete it".into(),
            ));
        }

        sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn get_with_items(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<MenuWithItems, ApiError> {
        let menu = Self::load(pool, id).await?;
        FamilyService::assert_member(pool, menu.family_group_id, user_id).await?;
        let items = MenuItemService::list_with_recipes(pool, id).await?;
        Ok(MenuWithItems { menu, items })
    }

    pub async fn list(
        pool: &PgPool,
        query: &MenuListQuery,
        user_id: Uuid,
    ) -> Result<MenuListResponse, ApiError> {
        FamilyService::assert_member(pool, query.family_group_id, user_id).await?;

        // The WHERE clause and bind order are built once and shared by the
        // page query and the COUNT query so the two cannot drift apart.
        let mut conditions = vec!["family_group_id = $1".to_string()];
        let mut next = 2;
        if query.status.is_some() {
            conditions.push(format!("status = ${next}"));
            next += 1;
        }
        if query.start_date.is_some() {
            conditions.push(format!("end_date >= ${next}"));
            next += 1;
        }
        if query.end_date.is_some() {
            conditions.push(format!("start_date <= ${next}"));
            next += 1;
        }
        let where_sql = conditions.join(" AND ");
        let (limit, offset) = page_offset(query.page, query.limit);

        let list_sql = format!(
            "SELECT * FROM menus WHERE {where_sql}
             ORDER BY start_date DESC, created_at DESC
             LIMIT ${next} OFFSET ${after}",
            after = next + 1
        );
        let mut list_q = sqlx::query_as::<_, Menu>(&list_sql).bind(query.family_group_id);
        if let Some(status) = query.status {
            list_q = list_q.bind(status.to_string());
        }
        if let Some(start) = query.start_date {
            list_q = list_q.bind(start);
        }
        if let Some(end) = query.end_date {
            list_q = list_q.bind(end);
        }
        let items = list_q.bind(limit).bind(offset).fetch_all(pool).await?;

        let count_sql = format!("SELECT COUNT(*) FROM menus WHERE {where_sql}");
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql).bind(query.family_group_id);
        if let Some(status) = query.status {
            count_q = count_q.bind(status.to_string());
        }
        if let Some(start) = query.start_date {
            count_q = count_q.bind(start);
        }
        if let Some(end) = query.end_date {
            count_q = count_q.bind(end);
        }
        let total = count_q.fetch_one(pool).await?;

        Ok(MenuListResponse { items, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert!(validate_date_range(start, end).is_ok());
        assert!(validate_date_range(start, start).is_ok());
        assert!(matches!(
            validate_date_range(end, start),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_page_offset_defaults() {
        assert_eq!(page_offset(None, None), (20, 0));
    }

    #[test]
    fn test_page_offset_math() {
        assert_eq!(page_offset(Some(1), Some(10)), (10, 0));
        assert_eq!(page_offset(Some(2), Some(10)), (10, 10));
        assert_eq!(page_offset(Some(3), Some(25)), (25, 50));
    }

    #[test]
    fn test_page_offset_clamps() {
        assert_eq!(page_offset(Some(0), Some(10)), (10, 0));
        assert_eq!(page_offset(Some(-5), Some(10)), (10, 0));
        assert_eq!(page_offset(Some(1), Some(1000)), (100, 0));
        assert_eq!(page_offset(Some(1), Some(0)), (1, 0));
    }
}
