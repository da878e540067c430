//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키 (필수)
//! - `JWT_DURATION_DAYS`: JWT 유효 기간(일), 기본값 365
//! - `ADMIN_USERNAME` / `ADMIN_PASSWORD`: 최초 관리자 계정
//! - `DB_MAX_CONNECTIONS`: 연결 풀 크기, 기본값 5

use std::env;

/// JWT 발급/검증에 필요한 설정
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 서명 비밀키
    pub secret: String,
    /// 토큰 유효 기간 (일 단위)
    pub duration_days: i64,
}

/// 애플리케이션 전체 설정을 담는 구조체
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/moredoc.db")
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    /// 사용자 테이블이 비어 있을 때 생성할 관리자 계정
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET")?,
                duration_days: env::var("JWT_DURATION_DAYS")
                    .unwrap_or_else(|_| "365".to_string())
                    .parse()
                    .unwrap_or(365),
            },
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "123456".to_string()),
        })
    }
}
