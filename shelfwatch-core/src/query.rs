//! Query construction and filtering API for document stores.
//!
//! This module provides query construction with filtering, sorting and a result
//! cap, plus a visitor trait that backends implement to execute filter expressions.
//!
//! # Query Building
//!
//! ```ignore
//! use shelfwatch_core::query::{Query, Filter, SortDirection};
//!
//! let query = Query::builder()
//!     .filter(Filter::and([
//!         Filter::eq("email", "a@x.com"),
//!         Filter::gte("expiry_date", "2024-05-01"),
//!     ]))
//!     .sort("insert_datetime", SortDirection::Asc)
//!     .limit(100)
//!     .build();
//! ```

use bson::Bson;

use crate::error::DocumentStoreError;

/// Sort direction for query results.
#[derive(Debug, Clone, PartialEq)]
pub enum SortDirection {
    /// Ascending order (A to Z, 0 to 9, earliest to latest).
    Asc,
    /// Descending order (Z to A, 9 to 0, latest to earliest).
    Desc,
}

/// Sort specification for query results.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Equal to (exact match).
    Eq,
    /// Greater than or equal to.
    Gte,
}

/// A filter expression for querying documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Field comparison expression.
    Field {
        /// The field name to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }
}

/// A structured query for retrieving and filtering documents.
///
/// Use [`QueryBuilder`] for ergonomic construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Optional filter expression to match documents.
    pub filter: Option<Expr>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
    /// Sort specification for results.
    pub sort: Option<Sort>,
}

impl Query {
    /// Creates a new query matching every document, with no limit.
    pub fn new() -> Self {
        Query {
            filter: None,
            limit: None,
            sort: None,
        }
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

/// Helper struct for constructing filter expressions.
pub struct Filter;

impl Filter {
    /// Matches documents where the field equals the specified value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Eq, value.into())
    }

    /// Matches documents where the field is greater than or equal to the specified value.
    pub fn gte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Gte, value.into())
    }

    /// Combines multiple expressions such that all must match for a document to be included.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    /// Conjunction of the given expressions, or `None` when there are none.
    ///
    /// A single expression is returned as-is rather than wrapped in an AND.
    pub fn all(exprs: impl IntoIterator<Item = Expr>) -> Option<Expr> {
        let mut exprs = exprs.into_iter().collect::<Vec<_>>();

        match exprs.len() {
            0 => None,
            1 => exprs.pop(),
            _ => Some(Expr::And(exprs)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Sets the filter expression for this query.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Sets an optional filter expression; `None` matches every document.
    pub fn maybe_filter(mut self, filter: Option<Expr>) -> Self {
        self.query.filter = filter;
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Sets the sort specification for the query results.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sort = Some(Sort { field: field.into(), direction });
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_of_nothing_is_no_filter() {
        assert_eq!(Filter::all(Vec::new()), None);
    }

    #[test]
    fn test_all_of_one_is_unwrapped() {
        let expr = Filter::eq("email", "a@x.com");
        assert_eq!(Filter::all([expr.clone()]), Some(expr));
    }

    #[test]
    fn test_all_of_many_is_conjunction() {
        let combined = Filter::all([
            Filter::eq("email", "a@x.com"),
            Filter::gte("quantity", 2_i64),
        ]);

        match combined {
            Some(Expr::And(list)) => assert_eq!(list.len(), 2),
            other => panic!("expected conjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_sets_sort_and_limit() {
        let query = Query::builder()
            .sort("insert_datetime", SortDirection::Asc)
            .limit(100)
            .build();

        assert_eq!(query.limit, Some(100));
        assert_eq!(
            query.sort,
            Some(Sort { field: "insert_datetime".to_string(), direction: SortDirection::Asc })
        );
        assert!(query.filter.is_none());
    }
}
