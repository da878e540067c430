//! # 첨부파일 데이터베이스 쿼리 모듈
//!
//! `mnt_attachment` 테이블의 CRUD 함수입니다.
//! 실제 쿼리 구성은 `db::query`의 제네릭 함수가 담당하고,
//! 여기서는 에러 로깅과 AppError 변환만 합니다.

use sqlx::SqlitePool;

use crate::db::query::{self, ListOptions};
use crate::error::AppError;
use crate::models::Attachment;

/// 첨부파일을 생성하고 새 id를 `attachment.id`에 기록합니다.
pub async fn create_attachment(
    pool: &SqlitePool,
    attachment: &mut Attachment,
) -> Result<(), AppError> {
    let id = query::insert(pool, &*attachment)
        .await
        .inspect_err(|e| tracing::error!("create_attachment: {}", e))?;
    attachment.id = id;
    Ok(())
}

/// 첨부파일을 수정합니다.
///
/// `fields`가 비어 있으면 제로 값이 아닌 필드만, 아니면 지정한 필드만 기록합니다.
/// 허용 목록에 없는 필드 이름은 무시됩니다.
pub async fn update_attachment<S: AsRef<str>>(
    pool: &SqlitePool,
    attachment: &Attachment,
    fields: &[S],
) -> Result<(), AppError> {
    query::update(pool, attachment, fields)
        .await
        .inspect_err(|e| tracing::error!("update_attachment: {}", e))?;
    Ok(())
}

/// id로 첨부파일을 조회합니다. `fields`로 SELECT할 컬럼을 제한할 수 있습니다.
pub async fn get_attachment<S: AsRef<str>>(
    pool: &SqlitePool,
    id: i64,
    fields: &[S],
) -> Result<Option<Attachment>, AppError> {
    let attachment: Option<Attachment> = query::get_by(pool, "id", id.into(), fields).await?;
    Ok(attachment)
}

/// 동적 필터/정렬/페이지네이션으로 첨부파일 목록을 조회합니다.
///
/// # 반환값
/// `(목록, 전체 건수)`. 전체 건수는 `opt.with_count`가 true일 때만 채워집니다.
pub async fn get_attachment_list(
    pool: &SqlitePool,
    opt: &ListOptions,
) -> Result<(Vec<Attachment>, i64), AppError> {
    let result = query::list::<Attachment>(pool, opt)
        .await
        .inspect_err(|e| tracing::error!("get_attachment_list: {}", e))?;
    Ok(result)
}

// TODO: 첨부파일을 참조하는 테이블의 행과 통계 카운터도 함께 정리해야 합니다.
pub async fn delete_attachments(pool: &SqlitePool, ids: &[i64]) -> Result<u64, AppError> {
    let deleted = query::delete::<_, Attachment>(pool, ids)
        .await
        .inspect_err(|e| tracing::error!("delete_attachments: {}", e))?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, FieldValue};
    use crate::models::AttachmentType;

    fn attachment(name: &str, ext: &str, size: i64) -> Attachment {
        Attachment {
            hash: format!("{:0>32}", size),
            user_id: 1,
            type_id: 10,
            kind: AttachmentType::Document,
            is_approved: 1,
            path: format!("uploads/{}", name),
            name: name.to_string(),
            size,
            ext: ext.to_string(),
            ip: "127.0.0.1".to_string(),
            ..Default::default()
        }
    }

    async fn seed(pool: &SqlitePool) -> Vec<i64> {
        let mut ids = Vec::new();
        for (name, ext, size) in [
            ("report.pdf", ".pdf", 100),
            ("slides.pptx", ".pptx", 200),
            ("notes.txt", ".txt", 300),
            ("manual.pdf", ".pdf", 400),
        ] {
            let mut a = attachment(name, ext, size);
            create_attachment(pool, &mut a).await.unwrap();
            ids.push(a.id);
        }
        ids
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let mut a = attachment("report.pdf", ".pdf", 1024);
        create_attachment(&pool, &mut a).await.unwrap();
        assert!(a.id > 0);

        let found = get_attachment(&pool, a.id, &[] as &[&str]).await.unwrap().unwrap();
        assert_eq!(found.name, "report.pdf");
        assert_eq!(found.kind, AttachmentType::Document);
        assert_eq!(found.size, 1024);
        assert!(!found.created_at.is_empty());

        assert!(get_attachment(&pool, 9999, &[] as &[&str]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_selected_fields_only() {
        let pool = test_pool().await;
        let mut a = attachment("report.pdf", ".pdf", 1024);
        create_attachment(&pool, &mut a).await.unwrap();

        let found = get_attachment(&pool, a.id, &["id", "name", "no_such_column"])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, a.id);
        assert_eq!(found.name, "report.pdf");
        assert_eq!(found.size, 0);
        assert_eq!(found.path, "");
    }

    #[tokio::test]
    async fn test_update_without_fields_skips_zero_values() {
        let pool = test_pool().await;
        let mut a = attachment("report.pdf", ".pdf", 1024);
        create_attachment(&pool, &mut a).await.unwrap();

        let patch = Attachment {
            id: a.id,
            name: "renamed.pdf".to_string(),
            ..Default::default()
        };
        update_attachment(&pool, &patch, &[] as &[&str]).await.unwrap();

        let found = get_attachment(&pool, a.id, &[] as &[&str]).await.unwrap().unwrap();
        assert_eq!(found.name, "renamed.pdf");
        assert_eq!(found.size, 1024);
        assert_eq!(found.is_approved, 1);
    }

    #[tokio::test]
    async fn test_update_with_fields_writes_zero_values() {
        let pool = test_pool().await;
        let mut a = attachment("report.pdf", ".pdf", 1024);
        create_attachment(&pool, &mut a).await.unwrap();

        let mut patch = a.clone();
        patch.is_approved = 0;
        patch.name = "ignored.pdf".to_string();
        update_attachment(&pool, &patch, &["is_approved"]).await.unwrap();

        let found = get_attachment(&pool, a.id, &[] as &[&str]).await.unwrap().unwrap();
        assert_eq!(found.is_approved, 0);
        assert_eq!(found.name, "report.pdf");
    }

    #[tokio::test]
    async fn test_list_filters() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;

        let mut opt = ListOptions {
            with_count: true,
            sort: vec!["size asc".to_string()],
            ..Default::default()
        };
        opt.query_range.insert(
            "size".to_string(),
            (Some(FieldValue::Int(150)), Some(FieldValue::Int(400))),
        );
        let (rows, total) = get_attachment_list(&pool, &opt).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(
            rows.iter().map(|a| a.size).collect::<Vec<_>>(),
            vec![200, 300, 400]
        );

        let mut opt = ListOptions { with_count: true, ..Default::default() };
        opt.query_in
            .insert("ext".to_string(), vec![".pdf".into(), ".txt".into()]);
        opt.query_like.insert(
            "name".to_string(),
            vec!["report%".to_string(), "%notes%".to_string()],
        );
        let (rows, total) = get_attachment_list(&pool, &opt).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows.len(), 2);

        let opt = ListOptions {
            ids: vec![ids[0], ids[3]],
            sort: vec!["id".to_string()],
            ..Default::default()
        };
        let (rows, total) = get_attachment_list(&pool, &opt).await.unwrap();
        assert_eq!(total, 0);
        assert_eq!(rows.iter().map(|a| a.id).collect::<Vec<_>>(), vec![ids[3], ids[0]]);
    }

    #[tokio::test]
    async fn test_list_one_sided_ranges_and_multiple_likes() {
        let pool = test_pool().await;
        seed(&pool).await;
        let sizes = |rows: Vec<Attachment>| rows.iter().map(|a| a.size).collect::<Vec<_>>();

        let mut opt = ListOptions {
            with_count: true,
            sort: vec!["size asc".to_string()],
            ..Default::default()
        };
        opt.query_range
            .insert("size".to_string(), (Some(FieldValue::Int(300)), None));
        let (rows, total) = get_attachment_list(&pool, &opt).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(sizes(rows), vec![300, 400]);

        opt.query_range
            .insert("size".to_string(), (None, Some(FieldValue::Int(200))));
        let (rows, total) = get_attachment_list(&pool, &opt).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(sizes(rows), vec![100, 200]);

        // 필드 사이는 AND, 한 필드의 패턴 사이는 OR
        let mut opt = ListOptions {
            with_count: true,
            sort: vec!["size asc".to_string()],
            ..Default::default()
        };
        opt.query_like.insert(
            "name".to_string(),
            vec!["r%".to_string(), "m%".to_string(), "n%".to_string()],
        );
        opt.query_like.insert("ext".to_string(), vec![".pdf".to_string()]);
        let (rows, total) = get_attachment_list(&pool, &opt).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(sizes(rows), vec![100, 400]);
    }

    #[tokio::test]
    async fn test_list_accepts_boolean_values() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;
        let patch = Attachment { id: ids[1], is_approved: 0, ..Default::default() };
        update_attachment(&pool, &patch, &["is_approved"]).await.unwrap();

        let opt: ListOptions = serde_json::from_str(
            r#"{"with_count": true, "query_in": {"is_approved": [false]}}"#,
        )
        .unwrap();
        let (rows, total) = get_attachment_list(&pool, &opt).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].id, ids[1]);
    }

    #[tokio::test]
    async fn test_list_page_far_past_the_end_is_empty() {
        let pool = test_pool().await;
        seed(&pool).await;

        let opt = ListOptions {
            page: i64::MAX,
            size: 10,
            with_count: true,
            ..Default::default()
        };
        let (rows, total) = get_attachment_list(&pool, &opt).await.unwrap();
        assert_eq!(total, 4);
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_type_is_read_back() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO mnt_attachment (type, name) VALUES (3, 'legacy.bin')")
            .execute(&pool)
            .await
            .unwrap();

        let (rows, _) = get_attachment_list(&pool, &ListOptions::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, AttachmentType::Other(3));

        let found = get_attachment(&pool, rows[0].id, &[] as &[&str]).await.unwrap().unwrap();
        assert_eq!(found.kind, AttachmentType::Other(3));
        assert_eq!(found.name, "legacy.bin");

        let mut patch = found.clone();
        patch.name = "renamed.bin".to_string();
        update_attachment(&pool, &patch, &[] as &[&str]).await.unwrap();
        let found = get_attachment(&pool, patch.id, &["type"]).await.unwrap().unwrap();
        assert_eq!(found.kind, AttachmentType::Other(3));
    }

    #[tokio::test]
    async fn test_list_ignores_unknown_fields_and_empty_in_matches_nothing() {
        let pool = test_pool().await;
        seed(&pool).await;

        let mut opt = ListOptions { with_count: true, ..Default::default() };
        opt.query_in
            .insert("size; DROP TABLE mnt_attachment".to_string(), vec![FieldValue::Int(1)]);
        opt.sort = vec!["bogus desc".to_string()];
        let (rows, total) = get_attachment_list(&pool, &opt).await.unwrap();
        assert_eq!(total, 4);
        assert_eq!(rows.len(), 4);

        let mut opt = ListOptions { with_count: true, ..Default::default() };
        opt.query_in.insert("ext".to_string(), Vec::new());
        let (rows, total) = get_attachment_list(&pool, &opt).await.unwrap();
        assert_eq!(total, 0);
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_list_pagination_and_projection() {
        let pool = test_pool().await;
        seed(&pool).await;

        let opt = ListOptions {
            page: 2,
            size: 3,
            with_count: true,
            select_fields: vec!["id".to_string(), "size".to_string()],
            sort: vec!["size desc".to_string()],
            ..Default::default()
        };
        let (rows, total) = get_attachment_list(&pool, &opt).await.unwrap();
        assert_eq!(total, 4);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].size, 100);
        assert_eq!(rows[0].name, "");
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;

        assert_eq!(delete_attachments(&pool, &[]).await.unwrap(), 0);
        assert_eq!(delete_attachments(&pool, &ids[..2]).await.unwrap(), 2);

        let (rows, _) = get_attachment_list(&pool, &ListOptions::default()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(get_attachment(&pool, ids[0], &[] as &[&str]).await.unwrap().is_none());
    }
}
