use serde::{Deserialize, Serialize};
use sqlx::{
    error::BoxDynError,
    sqlite::{SqliteTypeInfo, SqliteValueRef},
    Decode, Sqlite, Type,
};

use crate::db::query::{FieldValue, Table};

/// 사용자 상태 (`status` 컬럼). 정의되지 않은 값은 `Other`로 읽습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Normal,
    Disabled,
    /// 심사 중
    Pending,
    Rejected,
    Ignored,
    Other(i32),
}

impl From<i32> for UserStatus {
    fn from(v: i32) -> Self {
        match v {
            0 => UserStatus::Normal,
            1 => UserStatus::Disabled,
            2 => UserStatus::Pending,
            3 => UserStatus::Rejected,
            4 => UserStatus::Ignored,
            other => UserStatus::Other(other),
        }
    }
}

impl From<UserStatus> for i32 {
    fn from(v: UserStatus) -> Self {
        match v {
            UserStatus::Normal => 0,
            UserStatus::Disabled => 1,
            UserStatus::Pending => 2,
            UserStatus::Rejected => 3,
            UserStatus::Ignored => 4,
            UserStatus::Other(other) => other,
        }
    }
}

impl Type<Sqlite> for UserStatus {
    fn type_info() -> SqliteTypeInfo {
        <i32 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i32 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Sqlite> for UserStatus {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        Ok(<i32 as Decode<Sqlite>>::decode(value)?.into())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[sqlx(default)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// 생성 시에는 평문, DB에는 Argon2id 해시로 저장됩니다.
    #[serde(skip_serializing)]
    pub password: String,
    pub nickname: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub signature: String,
    pub last_login_ip: String,
    pub register_ip: String,
    // 카운터는 다른 쓰기 경로(문서 업로드, 팔로우 등)가 관리합니다.
    pub doc_count: i32,
    pub follow_count: i32,
    pub fans_count: i32,
    pub favorite_count: i32,
    pub comment_count: i32,
    pub status: UserStatus,
    pub avatar: String,
    /// 신분증 번호
    pub identity: String,
    /// 신분증상 실명
    pub realname: String,
    pub login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Table for User {
    const TABLE: &'static str = "mnt_user";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "username",
        "password",
        "nickname",
        "mobile",
        "email",
        "address",
        "signature",
        "last_login_ip",
        "register_ip",
        "doc_count",
        "follow_count",
        "fans_count",
        "favorite_count",
        "comment_count",
        "status",
        "avatar",
        "identity",
        "realname",
        "login_at",
        "created_at",
        "updated_at",
    ];
    // 비밀번호는 update_user_password로만 바뀝니다.
    const UPDATE_EXCLUDED: &'static [&'static str] = &["password"];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("username", self.username.as_str().into()),
            ("password", self.password.as_str().into()),
            ("nickname", self.nickname.as_str().into()),
            ("mobile", self.mobile.as_str().into()),
            ("email", self.email.as_str().into()),
            ("address", self.address.as_str().into()),
            ("signature", self.signature.as_str().into()),
            ("last_login_ip", self.last_login_ip.as_str().into()),
            ("register_ip", self.register_ip.as_str().into()),
            ("doc_count", self.doc_count.into()),
            ("follow_count", self.follow_count.into()),
            ("fans_count", self.fans_count.into()),
            ("favorite_count", self.favorite_count.into()),
            ("comment_count", self.comment_count.into()),
            ("status", i32::from(self.status).into()),
            ("avatar", self.avatar.as_str().into()),
            ("identity", self.identity.as_str().into()),
            ("realname", self.realname.as_str().into()),
            ("login_at", self.login_at.clone().into()),
        ]
    }
}
