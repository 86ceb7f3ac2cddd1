//! Larch is a GraphQL server library whose schemas are ordinary values
//! built at runtime.
//!
//! A schema pairs output types with resolvers; the executor validates and
//! coerces query arguments, drives resolvers asynchronously, and assembles a
//! JSON response that preserves selection order. Every schema answers
//! introspection queries out of the box, because the introspection types are
//! themselves expressed with this crate's own type constructors.
//!
//! Parsing is left to the host: any frontend that produces the [`ast`] types
//! can drive [`execute`]. The host also owns the runtime — [`execute`]
//! returns an ordinary future, and [`execute_sync`] blocks on it for
//! synchronous callers.
//!
//! # Example
//!
//! ```rust
//! use larch::{ast, execute_sync, Field, Schema, Type, Variables};
//!
//! let schema = Schema::new(vec![Field::new(
//!     "hello",
//!     Type::string(),
//!     |_ctx: &(), _parent, _args| Ok("world".into()),
//! )]);
//!
//! let document = vec![ast::Definition::Operation(ast::Operation {
//!     operation_type: ast::OperationType::Query,
//!     selection_set: vec![ast::Selection::Field(ast::Field {
//!         alias: None,
//!         name: "hello".into(),
//!         arguments: vec![],
//!         selection_set: vec![],
//!     })],
//! })];
//!
//! let response = execute_sync(&schema, &(), &Variables::new(), &document);
//! assert_eq!(
//!     serde_json::to_string(&response).unwrap(),
//!     r#"{"data":{"hello":"world"}}"#,
//! );
//! ```

pub mod ast;
pub mod executor;
pub mod schema;


use derive_more::{Display, From};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as Json;

#[doc(inline)]
pub use futures::future::BoxFuture;

pub use crate::{
    ast::{ConstValue, Document, FromConstValue, OwnedDocument},
    executor::{Arguments, ExecutionResult, FieldError, FieldResult, Variables},
    schema::{
        input::{Argument, InputType},
        meta::{EnumValue, Field, FieldValue, Type, TypeKind},
        model::Schema,
    },
};

/// An error that prevented query execution.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
pub enum GraphQLError {
    #[display("No operation found")]
    NoOperationFound,
    #[display("Mutation is not implemented")]
    MutationNotImplemented,
    #[display("Subscription is not implemented")]
    SubscriptionNotImplemented,
    #[display("{}", _0.message())]
    Field(FieldError),
}

impl std::error::Error for GraphQLError {}

/// The result of executing a query document.
///
/// Serializes to the standard response envelope: `{"data": ...}` on
/// success, `{"errors": [{"message": ...}]}` on failure — exactly one of
/// the two.
#[derive(Clone, Debug, PartialEq)]
pub struct Response(Result<Json, GraphQLError>);

impl Response {
    /// Was the request successful?
    pub fn is_ok(&self) -> bool {
        self.0.is_ok()
    }

    /// Unwraps the response into the resolved data or the execution error.
    pub fn into_result(self) -> Result<Json, GraphQLError> {
        self.0
    }
}

#[derive(serde::Serialize)]
struct ErrorMessage {
    message: String,
}

impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match &self.0 {
            Ok(data) => map.serialize_entry("data", data)?,
            Err(error) => map.serialize_entry(
                "errors",
                &[ErrorMessage {
                    message: error.to_string(),
                }],
            )?,
        }
        map.end()
    }
}

/// Executes the first operation of `document` against `schema`.
///
/// Resolvers run in the returned future; the caller decides where it is
/// polled. Variable errors, argument coercion errors, and resolver errors
/// all surface through the response envelope rather than as a Rust error.
pub async fn execute<Ctx: Send + Sync + 'static>(
    schema: &Schema<Ctx>,
    ctx: &Ctx,
    variables: &Variables,
    document: &Document,
) -> Response {
    let result = executor::execute_document(schema, ctx, variables, document).await;
    if let Err(error) = &result {
        log::debug!("query execution failed: {error}");
    }
    Response(result)
}

/// Executes a query document, blocking the current thread on the resolvers.
pub fn execute_sync<Ctx: Send + Sync + 'static>(
    schema: &Schema<Ctx>,
    ctx: &Ctx,
    variables: &Variables,
    document: &Document,
) -> Response {
    futures::executor::block_on(execute(schema, ctx, variables, document))
}
