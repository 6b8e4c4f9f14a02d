//! Composable search predicates rendered into SQL WHERE clauses.
//!
//! # Responsibility
//! - Express case-insensitive substring containment over text columns.
//! - Compose alternatives with logical OR.
//!
//! # Invariants
//! - Column names are compile-time constants; only needle values are bound.
//! - Rendering is deterministic for a fixed predicate tree.

use rusqlite::types::Value;

/// Filter tree applied by repository list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring containment on one text column.
    Contains {
        column: &'static str,
        needle: String,
    },
    /// Logical OR over alternatives. Empty matches all rows.
    Any(Vec<Predicate>),
}

impl Predicate {
    /// Builds a case-insensitive containment check for one column.
    pub fn contains(column: &'static str, needle: impl Into<String>) -> Self {
        Self::Contains {
            column,
            needle: needle.into(),
        }
    }

    /// Builds a logical OR over the given alternatives.
    pub fn any(predicates: Vec<Predicate>) -> Self {
        Self::Any(predicates)
    }

    /// Appends this predicate as SQL to `sql`, pushing bind values in order.
    ///
    /// Containment renders through `instr(lower(..), lower(?))` so that
    /// `%`/`_` in the needle stay literal characters.
    pub fn append_sql(&self, sql: &mut String, binds: &mut Vec<Value>) {
        match self {
            Self::Contains { column, needle } => {
                sql.push_str("instr(lower(");
                sql.push_str(column);
                sql.push_str("), lower(?)) > 0");
                binds.push(Value::Text(needle.clone()));
            }
            Self::Any(predicates) => {
                if predicates.is_empty() {
                    sql.push_str("1 = 1");
                    return;
                }
                sql.push('(');
                for (index, predicate) in predicates.iter().enumerate() {
                    if index > 0 {
                        sql.push_str(" OR ");
                    }
                    predicate.append_sql(sql, binds);
                }
                sql.push(')');
            }
        }
    }
}

/// Builds a keyword filter matching any of `columns`.
///
/// Returns `None` for an empty keyword or empty column list, meaning no
/// filtering should be applied.
pub fn contains_any(columns: &[&'static str], keyword: &str) -> Option<Predicate> {
    if keyword.is_empty() || columns.is_empty() {
        return None;
    }

    let mut alternatives = columns
        .iter()
        .map(|column| Predicate::contains(*column, keyword))
        .collect::<Vec<_>>();

    if alternatives.len() == 1 {
        return alternatives.pop();
    }
    Some(Predicate::any(alternatives))
}
