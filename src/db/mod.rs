//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 각 하위 모듈:
//! - `query`: 모든 테이블이 공유하는 동적 쿼리 빌더 (필터/정렬/페이지네이션)
//! - `attachments`: 첨부파일 CRUD
//! - `users`: 사용자 CRUD, 비밀번호 변경, 관리자 초기화
//! - `groups`: 사용자 그룹 조회/생성

pub mod attachments;
pub mod groups;
pub mod query;
pub mod users;

pub use attachments::*;
pub use groups::*;
pub use query::{FieldValue, ListOptions, Table};
pub use users::*;

use std::str::FromStr;

use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::config::Config;

/// 설정값으로 SQLite 연결 풀을 생성합니다.
///
/// 데이터베이스 파일이 없으면 새로 만듭니다.
pub async fn connect(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// `./migrations`의 SQL 파일 중 아직 실행되지 않은 것만 순서대로 실행합니다.
pub async fn migrate(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// 마이그레이션이 적용된 인메모리 DB.
///
/// `:memory:` DB는 연결마다 따로 생기므로 연결을 하나로 고정하고 닫히지 않게 합니다.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    migrate(&pool).await.unwrap();
    pool
}
