//! Generic table accessor.
//!
//! Every entity module is a typed instantiation of [`Table`]: the table name,
//! row shape, default ordering and write payloads come from the [`Entity`]
//! impl, so no table name is ever passed around as a runtime string.
//! Each call is a single round trip; errors are handed back untouched.

use std::marker::PhantomData;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};
use sqlx::{sqlite::SqliteRow, types::Json, FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

/// Columns owned by the accessor. Caller payloads never set them.
pub const SERVER_MANAGED: [&str; 3] = ["id", "created_at", "updated_at"];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_row_not_found(&self) -> bool {
        matches!(self, StoreError::Database(sqlx::Error::RowNotFound))
    }
}

pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static {
    const TABLE: &'static str;
    const ORDER_BY: &'static str = "created_at DESC";

    /// Insert payload.
    type Draft: Record + Send + Sync;
    /// Partial update payload; only the fields it yields are written.
    type Patch: Record + Send + Sync;

    fn id(&self) -> Uuid;
}

pub trait Record {
    fn fields(&self) -> Fields;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
}

impl Value {
    fn push_bind(self, builder: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Value::Null => builder.push_bind(Option::<String>::None),
            Value::Text(value) => builder.push_bind(value),
            Value::Integer(value) => builder.push_bind(value),
            Value::Real(value) => builder.push_bind(value),
            Value::Bool(value) => builder.push_bind(value),
            Value::Uuid(value) => builder.push_bind(value),
            Value::Date(value) => builder.push_bind(value),
            Value::Time(value) => builder.push_bind(value),
            Value::Timestamp(value) => builder.push_bind(value),
            Value::Json(value) => builder.push_bind(Json(value)),
        };
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::Json(serde_json::Value::from(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Ordered column/value pairs produced by a [`Record`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Fields(Vec<(&'static str, Value)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.0.push((column, value.into()));
        self
    }

    /// Adds the column only when a value was supplied.
    pub fn with_some<T: Into<Value>>(self, column: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with(column, value),
            None => self,
        }
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.0.iter().map(|(column, _)| *column).collect()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Fields {
    type Item = (&'static str, Value);
    type IntoIter = std::vec::IntoIter<(&'static str, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Gte,
    Lte,
}

impl Op {
    fn sql(self) -> &'static str {
        match self {
            Op::Eq => " = ",
            Op::Gte => " >= ",
            Op::Lte => " <= ",
        }
    }
}

/// Extra conditions composed onto a select before it runs.
#[derive(Debug, Default, Clone)]
pub struct Filter {
    conditions: Vec<(&'static str, Op, Value)>,
    order: Option<(&'static str, bool)>,
    limit: Option<i64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push((column, Op::Eq, value.into()));
        self
    }

    pub fn gte(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push((column, Op::Gte, value.into()));
        self
    }

    pub fn lte(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push((column, Op::Lte, value.into()));
        self
    }

    pub fn order(mut self, column: &'static str, ascending: bool) -> Self {
        self.order = Some((column, ascending));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn push_where(conditions: Vec<(&'static str, Op, Value)>, builder: &mut QueryBuilder<'_, Sqlite>) {
        for (index, (column, op, value)) in conditions.into_iter().enumerate() {
            builder.push(if index == 0 { " WHERE " } else { " AND " });
            builder.push(column).push(op.sql());
            value.push_bind(builder);
        }
    }
}

/// Typed CRUD accessor for one entity table.
pub struct Table<E> {
    pool: SqlitePool,
    entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Table<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            entity: PhantomData,
        }
    }
}

impl<E: Entity> Table<E> {
    pub fn new(pool: &SqlitePool) -> Self {
        Self {
            pool: pool.clone(),
            entity: PhantomData,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<E>, StoreError> {
        self.select(Filter::new()).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        self.select_one(Filter::new().eq("id", id)).await
    }

    pub async fn select(&self, filter: Filter) -> Result<Vec<E>, StoreError> {
        let Filter {
            conditions,
            order,
            limit,
        } = filter;

        let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT * FROM {}", E::TABLE));
        Filter::push_where(conditions, &mut builder);
        match order {
            Some((column, true)) => builder.push(" ORDER BY ").push(column).push(" ASC"),
            Some((column, false)) => builder.push(" ORDER BY ").push(column).push(" DESC"),
            None => builder.push(" ORDER BY ").push(E::ORDER_BY),
        };
        if let Some(limit) = limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        Ok(builder.build_query_as::<E>().fetch_all(&self.pool).await?)
    }

    /// Zero-or-one variant of [`Table::select`].
    pub async fn select_one(&self, filter: Filter) -> Result<Option<E>, StoreError> {
        let mut rows = self.select(filter.limit(1)).await?;
        Ok(rows.pop())
    }

    pub async fn count(&self, filter: Filter) -> Result<i64, StoreError> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {}", E::TABLE));
        Filter::push_where(filter.conditions, &mut builder);
        Ok(builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?)
    }

    /// Inserts one row. Fields left empty in the draft are omitted so the
    /// column defaults apply.
    pub async fn create(&self, draft: &E::Draft) -> Result<E, StoreError> {
        let now = Utc::now();
        let mut columns: Vec<(&'static str, Value)> = vec![("id", Value::Uuid(Uuid::new_v4()))];
        columns.extend(
            draft
                .fields()
                .into_iter()
                .filter(|(column, value)| !SERVER_MANAGED.contains(column) && *value != Value::Null),
        );
        columns.push(("created_at", Value::Timestamp(now)));
        columns.push(("updated_at", Value::Timestamp(now)));

        let names: Vec<&str> = columns.iter().map(|(column, _)| *column).collect();
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            E::TABLE,
            names.join(", ")
        ));
        for (index, (_, value)) in columns.into_iter().enumerate() {
            if index > 0 {
                builder.push(", ");
            }
            value.push_bind(&mut builder);
        }
        builder.push(") RETURNING *");

        Ok(builder.build_query_as::<E>().fetch_one(&self.pool).await?)
    }

    /// Writes the patch and stamps `updated_at`. An unknown id surfaces as
    /// `RowNotFound`.
    pub async fn update(&self, id: Uuid, patch: &E::Patch) -> Result<E, StoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", E::TABLE));
        for (column, value) in patch
            .fields()
            .into_iter()
            .filter(|(column, _)| !SERVER_MANAGED.contains(column))
        {
            builder.push(column).push(" = ");
            value.push_bind(&mut builder);
            builder.push(", ");
        }
        builder.push("updated_at = ").push_bind(Utc::now());
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING *");

        Ok(builder.build_query_as::<E>().fetch_one(&self.pool).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", E::TABLE);
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}

/// Deserializes a present-but-null JSON field as `Some(None)` so patches can
/// clear nullable columns. Use with `#[serde(default, deserialize_with = ...)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
