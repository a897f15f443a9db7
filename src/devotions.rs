//! Data access for the `devotions` table.
//!
//! Every operation is a single statement against the shared connection,
//! except [`Devotions::find_today`] which counts first and then fetches by
//! offset. Ids are bound exactly as they arrive from the request path.

use chrono::{Datelike, Local, NaiveDate};
use libsql::{Connection, Row, Rows, Value as SqlValue};

use crate::error::StoreError;
use crate::model::{Devotion, NewDevotion, ResultSet};

pub type Result<T> = std::result::Result<T, StoreError>;

const INSERT_COLUMNS: &str = "title, focus, verse, insight, realLifeReflection, prayer, action, author";

/// Days elapsed since the day before January 1st, so January 1st is day 1.
pub fn day_of_year(date: NaiveDate) -> i64 {
    date.ordinal() as i64
}

/// 1-based position among devotions ordered by id, cycling once
/// `day_of_year` passes `total`. `total` must be positive.
pub fn today_index(day_of_year: i64, total: i64) -> i64 {
    day_of_year % total + 1
}

pub fn parse_count(value: Option<SqlValue>) -> Result<i64> {
    match value {
        None => Err(StoreError::MissingCount),
        Some(SqlValue::Integer(n)) => Ok(n),
        Some(SqlValue::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| StoreError::MalformedCount(s)),
        Some(other) => Err(StoreError::MalformedCount(format!("{other:?}"))),
    }
}

fn text_value(value: SqlValue) -> Option<String> {
    match value {
        SqlValue::Null => None,
        SqlValue::Text(s) => Some(s),
        SqlValue::Integer(i) => Some(i.to_string()),
        SqlValue::Real(f) => Some(f.to_string()),
        SqlValue::Blob(b) => Some(String::from_utf8_lossy(&b).into_owned()),
    }
}

fn id_value(value: SqlValue) -> Result<i64> {
    match value {
        SqlValue::Integer(i) => Ok(i),
        SqlValue::Text(s) => s.parse().map_err(|_| StoreError::MalformedRow(format!("id {s:?}"))),
        other => Err(StoreError::MalformedRow(format!("id {other:?}"))),
    }
}

/// Maps by column name so `SELECT *` works whatever the column order is.
fn row_to_devotion(row: &Row) -> Result<Devotion> {
    let mut devotion = Devotion::default();

    for idx in 0..row.column_count() {
        let Some(name) = row.column_name(idx) else {
            continue;
        };
        let name = name.to_ascii_lowercase();
        let value = row.get_value(idx)?;

        match name.as_str() {
            "id" => devotion.id = id_value(value)?,
            "title" => devotion.title = text_value(value),
            "focus" => devotion.focus = text_value(value),
            "verse" => devotion.verse = text_value(value),
            "insight" => devotion.insight = text_value(value),
            "reallifereflection" => devotion.real_life_reflection = text_value(value),
            "prayer" => devotion.prayer = text_value(value),
            "action" => devotion.action = text_value(value),
            "author" => devotion.author = text_value(value),
            _ => {}
        }
    }

    Ok(devotion)
}

async fn collect_rows(mut rows: Rows) -> Result<Vec<Devotion>> {
    let mut devotions = vec![];
    while let Some(row) = rows.next().await? {
        devotions.push(row_to_devotion(&row)?);
    }
    Ok(devotions)
}

pub struct Devotions<'a> {
    conn: &'a Connection,
}

impl<'a> Devotions<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    async fn select(&self, query: &str, params: impl libsql::params::IntoParams) -> Result<ResultSet<Devotion>> {
        let rows = self.conn.query(query, params).await?;
        Ok(ResultSet::from_rows(collect_rows(rows).await?))
    }

    pub async fn list_all(&self) -> Result<ResultSet<Devotion>> {
        self.select("SELECT * FROM devotions", ()).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<ResultSet<Devotion>> {
        self.select("SELECT * FROM devotions WHERE id = ?", libsql::params![id])
            .await
    }

    pub async fn create(&self, input: NewDevotion) -> Result<ResultSet<Devotion>> {
        let query = format!(
            "INSERT INTO devotions ({INSERT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        );
        let mut created = self.select(&query, input.into_params()).await?;
        created.rows_affected = created.rows.len() as u64;
        Ok(created)
    }

    /// Plain insert without reading the row back.
    pub async fn insert(&self, input: NewDevotion) -> Result<u64> {
        let query = format!("INSERT INTO devotions ({INSERT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)");
        Ok(self.conn.execute(&query, input.into_params()).await?)
    }

    /// Missing ids are not an error; the result just reports zero affected rows.
    /// The count comes from the statement's own `RETURNING` rows since the
    /// connection is shared between requests.
    pub async fn delete_by_id(&self, id: &str) -> Result<ResultSet<Devotion>> {
        let mut rows = self
            .conn
            .query("DELETE FROM devotions WHERE id = ? RETURNING id", libsql::params![id])
            .await?;
        let mut affected = 0;
        while rows.next().await?.is_some() {
            affected += 1;
        }
        Ok(ResultSet::affected(affected))
    }

    pub async fn count(&self) -> Result<i64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) AS count FROM devotions", ())
            .await?;
        let Some(row) = rows.next().await? else {
            return Err(StoreError::MissingCount);
        };

        let count_idx =
            (0..row.column_count()).find(|idx| row.column_name(*idx).is_some_and(|n| n.eq_ignore_ascii_case("count")));
        let value = match count_idx {
            Some(idx) => Some(row.get_value(idx)?),
            None => None,
        };
        parse_count(value)
    }

    pub async fn find_today(&self) -> Result<Option<ResultSet<Devotion>>> {
        self.find_for_date(Local::now().date_naive()).await
    }

    /// Returns `None` without a second query when the table is empty. The
    /// count and the fetch are separate statements, so concurrent writes can
    /// land in between.
    pub async fn find_for_date(&self, date: NaiveDate) -> Result<Option<ResultSet<Devotion>>> {
        let total = self.count().await?;
        if total <= 0 {
            return Ok(None);
        }

        let day = day_of_year(date);
        let index = today_index(day, total);
        tracing::debug!(day, total, index, "selecting devotion of the day");

        let result = self
            .select(
                "SELECT * FROM devotions ORDER BY id ASC LIMIT 1 OFFSET ?",
                libsql::params![index - 1],
            )
            .await?;
        Ok(Some(result))
    }

    pub async fn find_random(&self) -> Result<ResultSet<Devotion>> {
        self.select("SELECT * FROM devotions ORDER BY RANDOM() LIMIT 1", ())
            .await
    }

    pub async fn update_devotion(&self, _id: &str, _input: NewDevotion) -> Result<ResultSet<Devotion>> {
        Err(StoreError::NotYetSupported("updating a devotion"))
    }

    pub async fn search_devotions(&self, _query: &str) -> Result<ResultSet<Devotion>> {
        Err(StoreError::NotYetSupported("searching devotions"))
    }

    pub async fn list_page(&self, _page: u32, _limit: u32) -> Result<ResultSet<Devotion>> {
        Err(StoreError::NotYetSupported("paginated listing"))
    }
}
