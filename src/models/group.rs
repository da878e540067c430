use serde::{Deserialize, Serialize};

use crate::db::query::{FieldValue, Table};

/// ID가 1인 그룹은 관리자 그룹입니다 (마이그레이션에서 생성).
pub const ADMIN_GROUP_ID: i64 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[sqlx(default)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// 소속 사용자 수. create_user / delete_users가 갱신합니다.
    pub user_count: i64,
    pub is_default: bool,
    pub sort: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Table for Group {
    const TABLE: &'static str = "mnt_group";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "user_count",
        "is_default",
        "sort",
        "created_at",
        "updated_at",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("title", self.title.as_str().into()),
            ("description", self.description.as_str().into()),
            ("user_count", self.user_count.into()),
            ("is_default", self.is_default.into()),
            ("sort", self.sort.into()),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[sqlx(default)]
pub struct UserGroup {
    pub id: i64,
    pub user_id: i64,
    pub group_id: i64,
    pub created_at: String,
}

impl Table for UserGroup {
    const TABLE: &'static str = "mnt_user_group";
    const COLUMNS: &'static [&'static str] = &["id", "user_id", "group_id", "created_at"];
    const HAS_UPDATED_AT: bool = false;

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("user_id", self.user_id.into()),
            ("group_id", self.group_id.into()),
        ]
    }
}
