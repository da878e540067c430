//! # moredoc 데이터베이스 초기화 진입점
//!
//! 이 실행 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 사용자가 없으면 관리자 계정 생성

use anyhow::Result;
use moredoc::{config::Config, db};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 moredoc은 debug, sqlx는 warn
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moredoc=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Connecting to {}", config.database_url);

    let pool = db::connect(&config).await?;

    tracing::info!("Running database migrations...");
    db::migrate(&pool).await?;

    match db::init_admin_user(&pool, &config).await? {
        Some(admin) => tracing::info!("Initialized administrator (id {})", admin.id),
        None => tracing::info!("Users already exist, skipping administrator setup"),
    }

    pool.close().await;
    Ok(())
}
