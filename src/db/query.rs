//! # 동적 쿼리 빌더
//!
//! 모든 테이블이 공유하는 CRUD / 목록 조회 로직입니다.
//! 각 모델은 [`Table`] 트레이트로 테이블 이름, 컬럼 허용 목록(allow-list),
//! 바인딩할 컬럼 값을 알려주기만 하면 됩니다.
//!
//! ## 안전 규칙
//! - SQL 문자열에 직접 들어가는 식별자는 항상 `Table::COLUMNS`의 `&'static str`입니다.
//!   사용자가 넘긴 필드 이름은 [`filter_valid_fields`]를 통과해야만 쓰이며,
//!   허용 목록에 없는 이름은 조용히 무시됩니다.
//! - 값은 항상 `push_bind`로 바인딩합니다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Executor, FromRow, QueryBuilder, Sqlite, SqlitePool};

/// SQLite에서 현재 시각을 RFC3339(밀리초) 문자열로 만드는 식
pub const NOW_SQL: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// 페이지 크기 기본값 / 상한
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 1000;

/// 컬럼에 바인딩할 수 있는 값
///
/// `#[serde(untagged)]`이므로 JSON의 `null`, 불리언, 정수, 실수, 문자열이 그대로 매핑됩니다.
/// 불리언은 SQLite에 0/1 정수로 바인딩됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
}

impl FieldValue {
    /// Go/ORM 방식의 "제로 값" 판정. 필드 지정 없는 UPDATE에서 건너뛸 값입니다.
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Bool(v) => !*v,
            FieldValue::Int(v) => *v == 0,
            FieldValue::Real(v) => *v == 0.0,
            FieldValue::Text(v) => v.is_empty(),
        }
    }

    fn push_to(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            FieldValue::Null => {
                qb.push_bind(None::<i64>);
            }
            FieldValue::Bool(v) => {
                qb.push_bind(i64::from(*v));
            }
            FieldValue::Int(v) => {
                qb.push_bind(*v);
            }
            FieldValue::Real(v) => {
                qb.push_bind(*v);
            }
            FieldValue::Text(v) => {
                qb.push_bind(v.clone());
            }
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Real(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// 테이블 하나에 대응하는 모델
///
/// `values()`는 `id`와 타임스탬프(`created_at`, `updated_at`)를 제외한
/// 모든 컬럼 값을 돌려줍니다. 타임스탬프는 DB 기본값과 [`NOW_SQL`]이 채웁니다.
pub trait Table: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    /// UPDATE에서 절대 쓰지 않는 컬럼 (예: 전용 함수가 따로 있는 password)
    const UPDATE_EXCLUDED: &'static [&'static str] = &[];
    const HAS_UPDATED_AT: bool = true;

    fn id(&self) -> i64;
    fn values(&self) -> Vec<(&'static str, FieldValue)>;
}

/// 목록 조회 옵션
///
/// 모든 엔티티의 `get_*_list`가 이 구조체 하나를 공유합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    pub page: i64,
    pub size: i64,
    /// true이면 페이지네이션 전 전체 건수를 함께 반환
    pub with_count: bool,
    pub ids: Vec<i64>,
    pub select_fields: Vec<String>,
    /// field -> (min, max). None인 쪽은 조건을 만들지 않습니다.
    pub query_range: BTreeMap<String, (Option<FieldValue>, Option<FieldValue>)>,
    /// field -> IN 값 목록
    pub query_in: BTreeMap<String, Vec<FieldValue>>,
    /// field -> LIKE 패턴 목록 (OR 결합). 와일드카드는 호출자가 넣습니다.
    pub query_like: BTreeMap<String, Vec<String>>,
    /// "field", "field asc", "field desc"
    pub sort: Vec<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            with_count: false,
            ids: Vec::new(),
            select_fields: Vec::new(),
            query_range: BTreeMap::new(),
            query_in: BTreeMap::new(),
            query_like: BTreeMap::new(),
            sort: Vec::new(),
        }
    }
}

impl ListOptions {
    /// (LIMIT, OFFSET)
    ///
    /// 아주 큰 `page`는 오버플로 대신 `i64::MAX` 오프셋이 되어 빈 페이지를 돌려줍니다.
    pub fn limit_offset(&self) -> (i64, i64) {
        let page = self.page.max(1);
        let size = if self.size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            self.size.min(MAX_PAGE_SIZE)
        };
        (size, (page - 1).saturating_mul(size))
    }
}

/// 허용 목록에 있는 필드만 남깁니다. 중복은 제거하고 순서는 유지합니다.
pub fn filter_valid_fields<S: AsRef<str>>(
    columns: &'static [&'static str],
    fields: &[S],
) -> Vec<&'static str> {
    let mut valid = Vec::new();
    for field in fields {
        let field = field.as_ref().trim();
        if let Some(column) = columns.iter().find(|c| **c == field) {
            if !valid.contains(column) {
                valid.push(*column);
            }
        }
    }
    valid
}

/// 정렬 항목을 `column ASC|DESC` 목록으로 변환합니다.
///
/// 방향이 없으면 DESC, `asc`/`desc` 이외의 방향이나 허용되지 않은 필드는 버립니다.
pub fn parse_sort<S: AsRef<str>>(columns: &'static [&'static str], sort: &[S]) -> Vec<String> {
    let mut orders = Vec::new();
    for item in sort {
        let mut parts = item.as_ref().split_whitespace();
        let Some(field) = parts.next() else {
            continue;
        };
        let Some(column) = filter_valid_fields(columns, &[field]).pop() else {
            continue;
        };
        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("desc") => "DESC",
            Some("asc") => "ASC",
            Some(_) => continue,
        };
        if parts.next().is_some() {
            continue;
        }
        orders.push(format!("{} {}", column, direction));
    }
    orders
}

fn select_clause<T: Table>(fields: &[&'static str]) -> String {
    if fields.is_empty() {
        T::COLUMNS.join(", ")
    } else {
        fields.join(", ")
    }
}

pub(crate) fn push_id_list(qb: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    qb.push("(");
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push_bind(*id);
    }
    qb.push(")");
}

fn next_clause(qb: &mut QueryBuilder<'_, Sqlite>, has_where: &mut bool) {
    qb.push(if *has_where { " AND " } else { " WHERE " });
    *has_where = true;
}

/// 목록/건수 쿼리에 공통 WHERE 절을 붙입니다.
fn push_conditions<T: Table>(qb: &mut QueryBuilder<'_, Sqlite>, opt: &ListOptions) {
    let mut has_where = false;

    for (field, (min, max)) in &opt.query_range {
        let Some(column) = filter_valid_fields(T::COLUMNS, &[field]).pop() else {
            continue;
        };
        if let Some(min) = min {
            next_clause(qb, &mut has_where);
            qb.push(column).push(" >= ");
            min.push_to(qb);
        }
        if let Some(max) = max {
            next_clause(qb, &mut has_where);
            qb.push(column).push(" <= ");
            max.push_to(qb);
        }
    }

    for (field, values) in &opt.query_in {
        let Some(column) = filter_valid_fields(T::COLUMNS, &[field]).pop() else {
            continue;
        };
        next_clause(qb, &mut has_where);
        if values.is_empty() {
            // 빈 IN 목록은 아무 행도 매칭하지 않습니다.
            qb.push("1 = 0");
            continue;
        }
        qb.push(column).push(" IN (");
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            value.push_to(qb);
        }
        qb.push(")");
    }

    for (field, patterns) in &opt.query_like {
        let Some(column) = filter_valid_fields(T::COLUMNS, &[field]).pop() else {
            continue;
        };
        if patterns.is_empty() {
            continue;
        }
        next_clause(qb, &mut has_where);
        qb.push("(");
        for (i, pattern) in patterns.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(column).push(" LIKE ").push_bind(pattern.clone());
        }
        qb.push(")");
    }

    if !opt.ids.is_empty() {
        next_clause(qb, &mut has_where);
        qb.push("id IN ");
        push_id_list(qb, &opt.ids);
    }
}

/// 새 행을 삽입하고 생성된 id를 반환합니다.
pub async fn insert<'c, E, T>(executor: E, record: &T) -> Result<i64, sqlx::Error>
where
    E: Executor<'c, Database = Sqlite>,
    T: Table,
{
    let values = record.values();
    let mut qb = QueryBuilder::<Sqlite>::new(format!("INSERT INTO {} (", T::TABLE));
    for (i, (column, _)) in values.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(*column);
    }
    qb.push(") VALUES (");
    for (i, (_, value)) in values.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        value.push_to(&mut qb);
    }
    qb.push(")");

    let result = qb.build().execute(executor).await?;
    Ok(result.last_insert_rowid())
}

/// `record.id()` 행을 갱신하고 영향받은 행 수를 반환합니다.
///
/// - `fields`(허용 목록 통과 후)가 비어 있지 않으면: 해당 컬럼만, 제로 값이어도 기록
/// - 비어 있으면: 제로 값이 아닌 컬럼만 기록
pub async fn update<'c, E, T, S>(executor: E, record: &T, fields: &[S]) -> Result<u64, sqlx::Error>
where
    E: Executor<'c, Database = Sqlite>,
    T: Table,
    S: AsRef<str>,
{
    let fields = filter_valid_fields(T::COLUMNS, fields);
    let values: Vec<_> = record
        .values()
        .into_iter()
        .filter(|(column, _)| !T::UPDATE_EXCLUDED.contains(column))
        .filter(|(column, value)| {
            if fields.is_empty() {
                !value.is_zero()
            } else {
                fields.contains(column)
            }
        })
        .collect();

    if values.is_empty() {
        return Ok(0);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", T::TABLE));
    for (i, (column, value)) in values.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(*column).push(" = ");
        value.push_to(&mut qb);
    }
    if T::HAS_UPDATED_AT {
        qb.push(", updated_at = ").push(NOW_SQL);
    }
    qb.push(" WHERE id = ").push_bind(record.id());

    let result = qb.build().execute(executor).await?;
    Ok(result.rows_affected())
}

/// `column = value`인 첫 행을 조회합니다.
///
/// `fields`가 비어 있지 않으면 해당 컬럼만 SELECT하고,
/// 나머지 필드는 모델의 `Default` 값으로 채워집니다.
pub async fn get_by<T, S>(
    pool: &SqlitePool,
    column: &'static str,
    value: FieldValue,
    fields: &[S],
) -> Result<Option<T>, sqlx::Error>
where
    T: Table,
    S: AsRef<str>,
{
    let fields = filter_valid_fields(T::COLUMNS, fields);
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {} FROM {} WHERE {} = ",
        select_clause::<T>(&fields),
        T::TABLE,
        column
    ));
    value.push_to(&mut qb);
    qb.push(" ORDER BY id LIMIT 1");

    qb.build_query_as::<T>().fetch_optional(pool).await
}

/// 동적 필터/정렬/페이지네이션 목록 조회. `(rows, total)`을 반환합니다.
///
/// `total`은 `with_count`가 true일 때만 계산되며, 아니면 0입니다.
pub async fn list<T: Table>(
    pool: &SqlitePool,
    opt: &ListOptions,
) -> Result<(Vec<T>, i64), sqlx::Error> {
    let total = if opt.with_count {
        let mut count = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {}", T::TABLE));
        push_conditions::<T>(&mut count, opt);
        count.build_query_scalar::<i64>().fetch_one(pool).await?
    } else {
        0
    };

    let fields = filter_valid_fields(T::COLUMNS, &opt.select_fields);
    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {} FROM {}",
        select_clause::<T>(&fields),
        T::TABLE
    ));
    push_conditions::<T>(&mut qb, opt);

    let orders = parse_sort(T::COLUMNS, &opt.sort);
    if !orders.is_empty() {
        qb.push(" ORDER BY ").push(orders.join(", "));
    }

    let (limit, offset) = opt.limit_offset();
    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind(offset);

    let rows = qb.build_query_as::<T>().fetch_all(pool).await?;
    Ok((rows, total))
}

/// id 목록에 해당하는 행을 삭제합니다. 빈 목록이면 쿼리 없이 0을 반환합니다.
pub async fn delete<'c, E, T>(executor: E, ids: &[i64]) -> Result<u64, sqlx::Error>
where
    E: Executor<'c, Database = Sqlite>,
    T: Table,
{
    if ids.is_empty() {
        return Ok(0);
    }
    let mut qb = QueryBuilder::<Sqlite>::new(format!("DELETE FROM {} WHERE id IN ", T::TABLE));
    push_id_list(&mut qb, ids);

    let result = qb.build().execute(executor).await?;
    Ok(result.rows_affected())
}
