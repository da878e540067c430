use serde::{Deserialize, Serialize};
use sqlx::{
    error::BoxDynError,
    sqlite::{SqliteTypeInfo, SqliteValueRef},
    Decode, Sqlite, Type,
};

use crate::db::query::{FieldValue, Table};

/// 첨부파일이 어디에 붙어 있는지 (`type` 컬럼)
///
/// 정의되지 않은 값은 `Other`로 읽습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentType {
    /// 사용자 아바타. `type_id`는 사용자 id
    #[default]
    Avatar,
    /// 문서 파일. `type_id`는 문서 id
    Document,
    /// 글 첨부파일
    Article,
    Other(i32),
}

impl From<i32> for AttachmentType {
    fn from(v: i32) -> Self {
        match v {
            0 => AttachmentType::Avatar,
            1 => AttachmentType::Document,
            2 => AttachmentType::Article,
            other => AttachmentType::Other(other),
        }
    }
}

impl From<AttachmentType> for i32 {
    fn from(v: AttachmentType) -> Self {
        match v {
            AttachmentType::Avatar => 0,
            AttachmentType::Document => 1,
            AttachmentType::Article => 2,
            AttachmentType::Other(other) => other,
        }
    }
}

impl Type<Sqlite> for AttachmentType {
    fn type_info() -> SqliteTypeInfo {
        <i32 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i32 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Sqlite> for AttachmentType {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        Ok(<i32 as Decode<Sqlite>>::decode(value)?.into())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[sqlx(default)]
pub struct Attachment {
    pub id: i64,
    /// 파일 내용의 MD5 (32자)
    pub hash: String,
    pub user_id: i64,
    pub type_id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: AttachmentType,
    pub is_approved: i32,
    pub path: String,
    /// 업로드 당시의 원래 파일 이름
    pub name: String,
    pub size: i64,
    pub width: i64,
    pub height: i64,
    /// 소문자 확장자, 예: ".pdf"
    pub ext: String,
    pub ip: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Table for Attachment {
    const TABLE: &'static str = "mnt_attachment";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "hash",
        "user_id",
        "type_id",
        "type",
        "is_approved",
        "path",
        "name",
        "size",
        "width",
        "height",
        "ext",
        "ip",
        "created_at",
        "updated_at",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("hash", self.hash.as_str().into()),
            ("user_id", self.user_id.into()),
            ("type_id", self.type_id.into()),
            ("type", i32::from(self.kind).into()),
            ("is_approved", self.is_approved.into()),
            ("path", self.path.as_str().into()),
            ("name", self.name.as_str().into()),
            ("size", self.size.into()),
            ("width", self.width.into()),
            ("height", self.height.into()),
            ("ext", self.ext.as_str().into()),
            ("ip", self.ip.as_str().into()),
        ]
    }
}
