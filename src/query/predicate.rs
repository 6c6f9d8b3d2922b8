//! Composable predicates and their SQL rendering
//!
//! A `CatalogQuery` is a pure value: a predicate tree, an ordering and an
//! optional limit over a closed set of columns. Rendering appends it to a
//! `sqlx::QueryBuilder`, binding every value as a parameter. Column names
//! only ever come from `Column::name`, never from input.

use chrono::{DateTime, Utc};
use sqlx::query_builder::Separated;
use sqlx::{QueryBuilder, Sqlite};

/// A column that predicates and orderings may reference
pub trait Column: Copy + std::fmt::Debug + PartialEq {
    /// SQL name of the column
    fn name(&self) -> &'static str;
}

/// A bound parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    fn push_bind(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Value::Int(v) => qb.push_bind(*v),
            Value::Text(v) => qb.push_bind(v.clone()),
            Value::Timestamp(v) => qb.push_bind(*v),
        };
    }

    fn push_separated(&self, separated: &mut Separated<'_, '_, Sqlite, &'static str>) {
        match self {
            Value::Int(v) => separated.push_bind(*v),
            Value::Text(v) => separated.push_bind(v.clone()),
            Value::Timestamp(v) => separated.push_bind(*v),
        };
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

/// A filter over records with columns `C`
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<C> {
    Eq(C, Value),
    Gt(C, Value),
    Gte(C, Value),
    /// Substring match of the lowercased needle; the column must hold
    /// lowercased text
    Contains(C, String),
    /// Set membership; an empty set matches nothing
    In(C, Vec<Value>),
    IsNull(C),
    /// Conjunction; an empty list matches everything
    And(Vec<Predicate<C>>),
    /// Disjunction; an empty list matches nothing
    Or(Vec<Predicate<C>>),
}

impl<C: Column> Predicate<C> {
    /// Predicate that matches every record
    pub fn all() -> Self {
        Predicate::And(Vec::new())
    }

    /// Conjoin two predicates, flattening nested conjunctions
    pub fn and(self, other: Predicate<C>) -> Self {
        let mut parts = match self {
            Predicate::And(parts) => parts,
            p => vec![p],
        };
        match other {
            Predicate::And(more) => parts.extend(more),
            p => parts.push(p),
        }
        Predicate::And(parts)
    }

    /// Append this predicate as SQL to `qb`
    pub fn push_to(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Predicate::Eq(col, v) => {
                qb.push(col.name()).push(" = ");
                v.push_bind(qb);
            }
            Predicate::Gt(col, v) => {
                qb.push(col.name()).push(" > ");
                v.push_bind(qb);
            }
            Predicate::Gte(col, v) => {
                qb.push(col.name()).push(" >= ");
                v.push_bind(qb);
            }
            Predicate::Contains(col, needle) => {
                qb.push(col.name()).push(" LIKE ");
                qb.push_bind(like_pattern(needle));
                qb.push(" ESCAPE '\\'");
            }
            Predicate::In(_, values) if values.is_empty() => {
                qb.push("1 = 0");
            }
            Predicate::In(col, values) => {
                qb.push(col.name()).push(" IN (");
                let mut separated = qb.separated(", ");
                for v in values {
                    v.push_separated(&mut separated);
                }
                qb.push(")");
            }
            Predicate::IsNull(col) => {
                qb.push(col.name()).push(" IS NULL");
            }
            Predicate::And(parts) => push_group(qb, parts, " AND ", "1 = 1"),
            Predicate::Or(parts) => push_group(qb, parts, " OR ", "1 = 0"),
        }
    }
}

fn push_group<C: Column>(
    qb: &mut QueryBuilder<'_, Sqlite>,
    parts: &[Predicate<C>],
    joiner: &str,
    empty: &str,
) {
    match parts {
        [] => {
            qb.push(empty);
        }
        [only] => only.push_to(qb),
        _ => {
            qb.push("(");
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    qb.push(joiner);
                }
                part.push_to(qb);
            }
            qb.push(")");
        }
    }
}

/// Build a LIKE pattern matching the lowercased `needle` anywhere, with
/// `%`, `_` and `\` taken literally.
fn like_pattern(needle: &str) -> String {
    let needle = needle.to_lowercase();
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderBy<C> {
    pub column: C,
    pub direction: Direction,
}

impl<C> OrderBy<C> {
    pub fn asc(column: C) -> Self {
        Self {
            column,
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: C) -> Self {
        Self {
            column,
            direction: Direction::Desc,
        }
    }
}

/// Predicate plus ordering plus optional limit
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery<C> {
    pub predicate: Predicate<C>,
    pub order: Vec<OrderBy<C>>,
    pub limit: Option<u32>,
}

impl<C: Column> CatalogQuery<C> {
    pub fn new(predicate: Predicate<C>) -> Self {
        Self {
            predicate,
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn order_by(mut self, order: Vec<OrderBy<C>>) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render into a query builder that starts with `select`
    /// (e.g. `SELECT ... FROM laptops`).
    pub fn render(&self, select: &str) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(select);
        qb.push(" WHERE ");
        self.predicate.push_to(&mut qb);

        if !self.order.is_empty() {
            qb.push(" ORDER BY ");
            for (i, order) in self.order.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                qb.push(order.column.name())
                    .push(" ")
                    .push(order.direction.as_sql());
            }
        }

        if let Some(limit) = self.limit {
            qb.push(" LIMIT ");
            qb.push_bind(i64::from(limit));
        }

        qb
    }
}
