use sqlx::SqlitePool;

use crate::db::query;
use crate::error::AppError;
use crate::models::Group;

pub async fn create_group(pool: &SqlitePool, group: &mut Group) -> Result<(), AppError> {
    let id = query::insert(pool, &*group)
        .await
        .map_err(|e| AppError::from_write(e, "Group title already exists"))
        .inspect_err(|e| tracing::error!("create_group: {}", e))?;
    group.id = id;
    Ok(())
}

pub async fn get_group<S: AsRef<str>>(
    pool: &SqlitePool,
    id: i64,
    fields: &[S],
) -> Result<Option<Group>, AppError> {
    let group: Option<Group> = query::get_by(pool, "id", id.into(), fields).await?;
    Ok(group)
}

/// 사용자가 속한 그룹 id 목록 (오름차순)
pub async fn get_user_group_ids(pool: &SqlitePool, user_id: i64) -> Result<Vec<i64>, AppError> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT group_id FROM mnt_user_group WHERE user_id = ? ORDER BY group_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::models::ADMIN_GROUP_ID;

    #[tokio::test]
    async fn test_admin_group_is_seeded() {
        let pool = test_pool().await;
        let group = get_group(&pool, ADMIN_GROUP_ID, &[] as &[&str])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(group.title, "Administrator");
        assert_eq!(group.user_count, 0);
    }

    #[tokio::test]
    async fn test_create_group_rejects_duplicate_title() {
        let pool = test_pool().await;
        let mut group = Group {
            title: "Members".to_string(),
            is_default: true,
            ..Default::default()
        };
        create_group(&pool, &mut group).await.unwrap();
        assert!(group.id > ADMIN_GROUP_ID);

        let mut dup = Group {
            title: "Members".to_string(),
            ..Default::default()
        };
        let err = create_group(&pool, &mut dup).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
