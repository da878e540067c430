//! # 서비스 모듈
//!
//! DB에 직접 묶이지 않는 도메인 로직입니다.
//! - `password`: Argon2id 비밀번호 해싱/검증

pub mod password;

pub use password::*;
