//! # 사용자 데이터베이스 쿼리 모듈
//!
//! `mnt_user` 테이블의 CRUD와 그에 딸린 쓰기 작업입니다.
//!
//! - 생성: 비밀번호 해싱 → (트랜잭션) 사용자 INSERT → 사용자-그룹 INSERT → 그룹 user_count 증가
//! - 삭제: (트랜잭션) 그룹 user_count 감소 → 사용자-그룹 DELETE → 사용자 DELETE
//!
//! 트랜잭션(`pool.begin()`)은 `commit()` 없이 drop되면 자동으로 롤백됩니다.
//! 따라서 중간 단계에서 `?`로 빠져나가면 앞 단계의 변경도 모두 취소됩니다.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::config::Config;
use crate::db::query::{self, push_id_list, ListOptions, NOW_SQL};
use crate::error::AppError;
use crate::models::{User, UserGroup, ADMIN_GROUP_ID};
use crate::services::password::{hash_password, verify_password};

/// 사용자를 생성하고 `group_id` 그룹에 소속시킵니다.
///
/// `user.password`는 평문으로 넘기며, 저장 전에 해시로 바뀝니다.
/// 성공하면 `user.id`에 새 id가 기록됩니다.
///
/// # 에러
/// - `Conflict`: 이미 존재하는 사용자 이름
/// - `BadRequest`: 빈 사용자 이름, 존재하지 않는 그룹
pub async fn create_user(pool: &SqlitePool, user: &mut User, group_id: i64) -> Result<(), AppError> {
    if user.username.trim().is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }
    user.password = hash_password(&user.password)?;

    insert_user_with_group(pool, user, group_id)
        .await
        .inspect_err(|e| tracing::error!("create_user: {}", e))
}

async fn insert_user_with_group(
    pool: &SqlitePool,
    user: &mut User,
    group_id: i64,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    // 1. 사용자
    let user_id = query::insert(&mut *tx, &*user)
        .await
        .map_err(|e| AppError::from_write(e, "Username already exists"))?;

    // 2. 사용자-그룹 관계
    let link = UserGroup {
        user_id,
        group_id,
        ..Default::default()
    };
    query::insert(&mut *tx, &link).await?;

    // 3. 그룹 사용자 수
    let result = sqlx::query(&format!(
        "UPDATE mnt_group SET user_count = user_count + 1, updated_at = {} WHERE id = ?",
        NOW_SQL
    ))
    .bind(group_id)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::BadRequest(format!("Group {} does not exist", group_id)));
    }

    tx.commit().await?;
    user.id = user_id;
    Ok(())
}

/// 비밀번호를 새로 해싱해 저장합니다.
pub async fn update_user_password(
    pool: &SqlitePool,
    id: i64,
    new_password: &str,
) -> Result<(), AppError> {
    let password = hash_password(new_password)?;
    let result = sqlx::query(&format!(
        "UPDATE mnt_user SET password = ?, updated_at = {} WHERE id = ?",
        NOW_SQL
    ))
    .bind(password)
    .bind(id)
    .execute(pool)
    .await
    .inspect_err(|e| tracing::error!("update_user_password: {}", e))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// 사용자를 수정합니다. `password`는 이 함수로 바뀌지 않습니다.
///
/// `fields`가 비어 있으면 제로 값이 아닌 필드만, 아니면 지정한 필드만 기록합니다.
pub async fn update_user<S: AsRef<str>>(
    pool: &SqlitePool,
    user: &User,
    fields: &[S],
) -> Result<(), AppError> {
    query::update(pool, user, fields)
        .await
        .map_err(|e| AppError::from_write(e, "Username already exists"))
        .inspect_err(|e| tracing::error!("update_user: {}", e))?;
    Ok(())
}

pub async fn get_user<S: AsRef<str>>(
    pool: &SqlitePool,
    id: i64,
    fields: &[S],
) -> Result<Option<User>, AppError> {
    let user: Option<User> = query::get_by(pool, "id", id.into(), fields).await?;
    Ok(user)
}

/// 유니크 인덱스(username)로 사용자를 조회합니다.
pub async fn get_user_by_username<S: AsRef<str>>(
    pool: &SqlitePool,
    username: &str,
    fields: &[S],
) -> Result<Option<User>, AppError> {
    let user: Option<User> = query::get_by(pool, "username", username.into(), fields)
        .await
        .inspect_err(|e| tracing::error!("get_user_by_username: {}", e))?;
    Ok(user)
}

pub async fn get_user_list(
    pool: &SqlitePool,
    opt: &ListOptions,
) -> Result<(Vec<User>, i64), AppError> {
    let result = query::list::<User>(pool, opt)
        .await
        .inspect_err(|e| tracing::error!("get_user_list: {}", e))?;
    Ok(result)
}

/// 사용자 이름과 평문 비밀번호로 로그인 자격을 확인합니다.
///
/// 사용자가 없을 때와 비밀번호가 틀릴 때 같은 에러를 돌려줍니다.
pub async fn check_user_password(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

    let user = get_user_by_username(pool, username, &[] as &[&str])
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(password, &user.password)? {
        return Err(invalid());
    }
    Ok(user)
}

/// 사용자를 삭제하고 소속 그룹의 user_count를 줄입니다.
///
/// 문서/댓글 등 다른 테이블의 카운터는 건드리지 않습니다.
pub async fn delete_users(pool: &SqlitePool, ids: &[i64]) -> Result<u64, AppError> {
    if ids.is_empty() {
        return Ok(0);
    }
    remove_users(pool, ids)
        .await
        .inspect_err(|e| tracing::error!("delete_users: {}", e))
}

async fn remove_users(pool: &SqlitePool, ids: &[i64]) -> Result<u64, AppError> {
    let mut tx = pool.begin().await?;

    let mut qb = QueryBuilder::<Sqlite>::new(
        "UPDATE mnt_group SET user_count = MAX(user_count - (\
         SELECT COUNT(*) FROM mnt_user_group ug \
         WHERE ug.group_id = mnt_group.id AND ug.user_id IN ",
    );
    push_id_list(&mut qb, ids);
    qb.push("), 0), updated_at = ")
        .push(NOW_SQL)
        .push(" WHERE id IN (SELECT group_id FROM mnt_user_group WHERE user_id IN ");
    push_id_list(&mut qb, ids);
    qb.push(")");
    qb.build().execute(&mut *tx).await?;

    let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM mnt_user_group WHERE user_id IN ");
    push_id_list(&mut qb, ids);
    qb.build().execute(&mut *tx).await?;

    let deleted = query::delete::<_, User>(&mut *tx, ids).await?;

    tx.commit().await?;
    Ok(deleted)
}

/// 사용자가 한 명도 없으면 설정된 관리자 계정을 관리자 그룹에 만듭니다.
///
/// # 반환값
/// 새로 만든 관리자. 이미 사용자가 있으면 `None`.
pub async fn init_admin_user(pool: &SqlitePool, config: &Config) -> Result<Option<User>, AppError> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM mnt_user LIMIT 1")
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Ok(None);
    }

    let mut user = User {
        username: config.admin_username.clone(),
        password: config.admin_password.clone(),
        ..Default::default()
    };
    create_user(pool, &mut user, ADMIN_GROUP_ID).await?;

    tracing::info!("Created administrator account '{}'", user.username);
    if config.admin_password == "123456" {
        tracing::warn!("Administrator is using the default password, change it after first login");
    }
    Ok(Some(user))
}
