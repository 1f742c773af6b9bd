use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use utoipa::ToSchema;
use uuid::Uuid;

/// Local mirror of a provider account. `username` and `email` are immutable
/// after creation; `confirmed_at` is set exactly once.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            confirmed_at: row.try_get("confirmed_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_camel_case_with_null_confirmed_at() {
        let user = User {
            id: Uuid::nil(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            confirmed_at: None,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&user).expect("serialize user");
        assert_eq!(value["username"], "alice");
        assert_eq!(value["email"], "a@x.com");
        assert!(value["confirmedAt"].is_null());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("confirmed_at").is_none());
    }
}
