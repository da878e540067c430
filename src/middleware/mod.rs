//! # 인증 모듈
//!
//! 사용자 JWT 발급/검증과 HTTP 계층에서 쓰는 Bearer 토큰 추출기입니다.

pub mod auth;
