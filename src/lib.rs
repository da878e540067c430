//! # moredoc 데이터 접근 계층
//!
//! 문서 공유 서비스의 모델, 동적 목록 쿼리, 비밀번호/JWT 헬퍼를 제공합니다.
//! HTTP 라우터는 이 크레이트를 가져다 쓰는 쪽에 있습니다.
//!
//! - `config`: 환경변수 설정
//! - `db`: 테이블별 CRUD와 공통 쿼리 빌더
//! - `error`: `AppError`와 HTTP 응답 변환
//! - `middleware`: JWT 발급/검증, Bearer 토큰 추출기
//! - `models`: 테이블 구조체
//! - `services`: 비밀번호 해싱
//! - `state`: 핸들러가 공유하는 `AppState`

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
