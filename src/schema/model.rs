//! The schema value handed to the executor.

use std::fmt;

use crate::schema::{
    meta::{Field, ObjectType, Type},
    schema::schema_field,
};

/// An executable schema: a single query root object.
///
/// The root object is always named `root`. A synthetic `__schema` field is
/// appended to it at construction, so every schema answers introspection
/// queries with no further setup. Schemas are immutable once built and are
/// shared freely between requests.
pub struct Schema<Ctx: 'static> {
    query: Type<Ctx>,
}

impl<Ctx: 'static> Schema<Ctx> {
    /// Builds a schema from the fields of its query root.
    pub fn new(fields: Vec<Field<Ctx>>) -> Self {
        let query = Type::object("root", move |root| {
            let mut fields = fields;
            fields.push(schema_field(root.clone()));
            fields
        });
        Self { query }
    }

    /// The query root type.
    pub fn query(&self) -> &Type<Ctx> {
        &self.query
    }

    pub(crate) fn query_object(&self) -> &ObjectType<Ctx> {
        match &self.query {
            Type::Object(object) => &**object,
            _ => unreachable!("query root is always an object"),
        }
    }
}

impl<Ctx: 'static> fmt::Debug for Schema<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema").field("query", &self.query).finish()
    }
}
