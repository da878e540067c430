//! # 데이터 모델 모듈
//!
//! 테이블 한 개당 구조체 한 개를 정의합니다.
//! 각 구조체는 `sqlx::FromRow`로 행을 읽고, `db::query::Table`로
//! 테이블 이름/컬럼 허용 목록/바인딩 값을 제공합니다.
//!
//! `#[sqlx(default)]`: 일부 컬럼만 SELECT한 경우 빠진 필드는 `Default` 값으로 채워집니다.

pub mod attachment;
pub mod group;
pub mod user;

pub use attachment::*;
pub use group::*;
pub use user::*;
