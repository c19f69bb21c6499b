use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::family::{CreateFamilyGroupRequest, FamilyGroup, FamilyMemberInfo, MemberRole},
};

pub struct FamilyService;

impl FamilyService {
    /// The system's only authorization primitive: every family-scoped read
    /// or write calls this first. Membership existence is the whole check;
    /// admin vs member is stored but not enforced differently.
    pub async fn assert_member(
        pool: &PgPool,
        family_group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), ApiError> {
        let is_member: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM family_members
             WHERE family_group_id = $1 AND user_id = $2)",
        )
        .bind(family_group_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        if !is_member {
            return Err(ApiError::Forbidden(
                "Not a member of this family group".into(),
            ));
        }
        Ok(())
    }

    /// 8-character uppercase alphanumeric invite code.
    pub fn generate_invite_code() -> String {
        rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(8)
            .map(char::from)
            .collect::<String>()
            .to_uppercase()
    }

    pub async fn create(
        pool: &PgPool,
        req: &CreateFamilyGroupRequest,
        user_id: Uuid,
    ) -> Result<FamilyGroup, ApiError> {
        if req.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("Family group name is required".into()));
        }

        let invite_code = Self::generate_invite_code();
        let group: FamilyGroup = sqlx::query_as(
            "INSERT INTO family_groups (name, invite_code, created_by)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(req.name.trim())
        .bind(&invite_code)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        sqlx::query(
            "INSERT INTO family_members (user_id, family_group_id, role)
             VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(group.id)
        .bind(MemberRole::Admin.to_string())
        .execute(pool)
        .await?;

        Ok(group)
    }

    pub async fn join(
        pool: &PgPool,
        invite_code: &str,
        user_id: Uuid,
    ) -> Result<FamilyGroup, ApiError> {
        let group: FamilyGroup =
            sqlx::query_as("SELECT * FROM family_groups WHERE invite_code = $1")
                .bind(invite_code.trim().to_uppercase())
                .fetch_optional(pool)
                .await?
                .ok_or_else(|| ApiError::NotFound("Invalid invite code".into()))?;

        let result = sqlx::query(
            "INSERT INTO family_members (user_id, family_group_id, role)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, family_group_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(group.id)
        .bind(MemberRole::Member.to_string())
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::InvalidInput(
                "Already a member of this family group".into(),
            ));
        }

        Ok(group)
    }

    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<FamilyGroup>, ApiError> {
        let groups = sqlx::query_as::<_, FamilyGroup>(
            "SELECT g.* FROM family_groups g
             JOIN family_members fm ON fm.family_group_id = g.id
             WHERE fm.user_id = $1
             ORDER BY g.name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(groups)
    }

    pub async fn members(
        pool: &PgPool,
        family_group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<FamilyMemberInfo>, ApiError> {
        Self::assert_member(pool, family_group_id, user_id).await?;

        let members = sqlx::query_as::<_, FamilyMemberInfo>(
            "SELECT u.id AS user_id, u.username, u.name, fm.role, fm.created_at AS joined_at
             FROM family_members fm
             JOIN users u ON u.id = fm.user_id
             WHERE fm.family_group_id = $1
             ORDER BY u.name",
        )
        .bind(family_group_id)
        .fetch_all(pool)
        .await?;
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_code_shape() {
        let code = FamilyService::generate_invite_code();
        assert_eq!(code.len(), 8);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_invite_codes_vary() {
        let a = FamilyService::generate_invite_code();
        let b = FamilyService::generate_invite_code();
        // 36^8 possibilities; a collision here means the generator is broken
        assert_ne!(a, b);
    }
}
