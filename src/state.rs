use sqlx::SqlitePool;

use crate::config::JwtConfig;

/// HTTP 계층의 핸들러와 추출기가 공유하는 상태
///
/// `SqlitePool`은 내부적으로 Arc이므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: JwtConfig,
}
