//! Query translation from the shelfwatch filter AST to MongoDB query syntax.

use bson::{Document, Bson, doc};

use shelfwatch_core::{
    query::{QueryVisitor, Expr, FieldOp},
    error::DocumentStoreError,
};


/// Translates filter expressions into MongoDB query documents.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value.clone() },
                FieldOp::Gte => doc! { "$gte": value.clone() },
            }
        })
    }
}
