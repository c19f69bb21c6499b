use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    Member,
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for MemberRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(MemberRole::Admin),
            "member" => Ok(MemberRole::Member),
            _ => Err(anyhow::anyhow!("Unknown member role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FamilyGroup {
    pub id: Uuid,
    pub name: String,
    pub invite_code: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join projection for member listings. Role is fetched as TEXT.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FamilyMemberInfo {
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFamilyGroupRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinFamilyGroupRequest {
    pub invite_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_round_trip() {
        for role in [MemberRole::Admin, MemberRole::Member] {
            let parsed: MemberRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("owner".parse::<MemberRole>().is_err());
    }
}
