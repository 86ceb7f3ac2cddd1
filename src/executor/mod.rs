//! Resolve a query document to values.
//!
//! The executor walks an operation's selection set against the schema:
//! fragments are flattened in source order, each field's arguments are
//! coerced, its resolver is driven to completion, and the resolved source
//! value is presented through the field's output type into JSON. Sibling
//! fields (and list elements) resolve concurrently; the response object
//! still lists keys in selection order, and the first error aborts the
//! assembly.

mod arguments;

use std::{collections::HashMap, fmt::Display};

use fnv::FnvHashMap;
use futures::future::{try_join_all, BoxFuture, FutureExt as _};
use serde_json::Value as Json;

use crate::{
    ast::{self, ConstValue},
    schema::{
        meta::{FieldValue, ObjectType, Type},
        model::Schema,
    },
    GraphQLError,
};

pub use self::arguments::Arguments;
pub(crate) use self::arguments::coerce_arguments;

/// The map of variables used for substitution during query execution.
pub type Variables = HashMap<String, ConstValue>;

/// Error produced while resolving a single field.
///
/// Field errors are plain human-readable messages. They convert from any
/// [`Display`] type, which makes error chaining with the `?` operator a
/// breeze.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldError {
    message: String,
}

impl<T: Display> From<T> for FieldError {
    fn from(error: T) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

impl FieldError {
    /// The message of this error, as it will appear in the response
    /// envelope.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The result of resolving the value of a field of type `T`.
pub type FieldResult<T> = Result<T, FieldError>;

/// The result of resolving an unspecified field.
pub type ExecutionResult = FieldResult<Json>;

/// Per-request execution state: the fragment map, the variable map, and the
/// user context. Never mutated after construction.
pub(crate) struct ExecutionContext<'a, Ctx> {
    pub(crate) ctx: &'a Ctx,
    pub(crate) fragments: &'a FnvHashMap<&'a str, &'a ast::Fragment>,
    pub(crate) variables: &'a Variables,
}

impl<Ctx> Clone for ExecutionContext<'_, Ctx> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Ctx> Copy for ExecutionContext<'_, Ctx> {}

/// Executes the first operation of `document` against `schema`.
pub(crate) async fn execute_document<Ctx: Send + Sync + 'static>(
    schema: &Schema<Ctx>,
    ctx: &Ctx,
    variables: &Variables,
    document: &ast::Document,
) -> Result<Json, GraphQLError> {
    let fragments: FnvHashMap<&str, &ast::Fragment> = document
        .iter()
        .filter_map(|definition| match definition {
            ast::Definition::Fragment(fragment) => Some((fragment.name.as_str(), fragment)),
            ast::Definition::Operation(_) => None,
        })
        .collect();

    let operation = get_operation(document)?;
    log::debug!("executing {} operation", operation.operation_type);

    match operation.operation_type {
        ast::OperationType::Query => {
            let exec = ExecutionContext {
                ctx,
                fragments: &fragments,
                variables,
            };
            resolve_fields(
                exec,
                schema.query_object(),
                FieldValue::Null,
                &operation.selection_set,
            )
            .await
            .map_err(GraphQLError::from)
        }
        ast::OperationType::Mutation => Err(GraphQLError::MutationNotImplemented),
        ast::OperationType::Subscription => Err(GraphQLError::SubscriptionNotImplemented),
    }
}

/// Selects the operation to execute: the first one in the document.
pub(crate) fn get_operation(document: &ast::Document) -> Result<&ast::Operation, GraphQLError> {
    document
        .iter()
        .find_map(|definition| match definition {
            ast::Definition::Operation(operation) => Some(operation),
            ast::Definition::Fragment(_) => None,
        })
        .ok_or(GraphQLError::NoOperationFound)
}

/// Flattens a selection set into its fields, in source order.
///
/// A fragment spread contributes its selections only when the fragment
/// exists and its type condition names the current object; an inline
/// fragment contributes when its condition is absent or matches. Duplicate
/// response keys are emitted as encountered; the object assembler keeps the
/// last write.
fn collect_fields<'a, Ctx>(
    exec: &ExecutionContext<'a, Ctx>,
    object: &ObjectType<Ctx>,
    selection_set: &'a [ast::Selection],
    out: &mut Vec<&'a ast::Field>,
) {
    for selection in selection_set {
        match selection {
            ast::Selection::Field(field) => out.push(field),
            ast::Selection::FragmentSpread(spread) => {
                if let Some(fragment) = exec.fragments.get(spread.name.as_str()) {
                    if fragment.type_condition == object.name().as_str() {
                        collect_fields(exec, object, &fragment.selection_set, out);
                    }
                }
            }
            ast::Selection::InlineFragment(inline) => {
                let applies = inline
                    .type_condition
                    .as_deref()
                    .map_or(true, |condition| condition == object.name().as_str());
                if applies {
                    collect_fields(exec, object, &inline.selection_set, out);
                }
            }
        }
    }
}

/// Resolves a flattened selection set against an object type, producing the
/// response object.
async fn resolve_fields<'a, Ctx: Send + Sync + 'static>(
    exec: ExecutionContext<'a, Ctx>,
    object: &'a ObjectType<Ctx>,
    source: FieldValue,
    selection_set: &'a [ast::Selection],
) -> ExecutionResult {
    let mut fields = Vec::new();
    collect_fields(&exec, object, selection_set, &mut fields);

    let pairs = try_join_all(
        fields
            .into_iter()
            .map(|field| resolve_field(exec, object, source.clone(), field)),
    )
    .await?;

    Ok(Json::Object(pairs.into_iter().collect()))
}

/// Resolves a single field: coerce arguments, drive the resolver, present
/// the result through the field's output type.
///
/// A field name the object does not declare yields `null` under its
/// response key without raising an error.
async fn resolve_field<'a, Ctx: Send + Sync + 'static>(
    exec: ExecutionContext<'a, Ctx>,
    object: &'a ObjectType<Ctx>,
    source: FieldValue,
    query_field: &'a ast::Field,
) -> FieldResult<(String, Json)> {
    let response_key = query_field.response_key().to_owned();

    let Some(field) = object.field_by_name(&query_field.name) else {
        return Ok((response_key, Json::Null));
    };

    let args = coerce_arguments(&field.arguments, &query_field.arguments, exec.variables)?;
    let resolved = (field.resolver)(exec.ctx, &source, args).await?;
    let value = present(exec, resolved, query_field, &field.ty).await?;

    Ok((response_key, value))
}

/// Presents a resolved source value through an output type.
///
/// `NonNull` re-enters presentation on its inner type without nulling out;
/// everything else maps an absent source to `null`. List elements present
/// concurrently, joined in order.
fn present<'a, Ctx: Send + Sync + 'static>(
    exec: ExecutionContext<'a, Ctx>,
    source: FieldValue,
    query_field: &'a ast::Field,
    ty: &'a Type<Ctx>,
) -> BoxFuture<'a, ExecutionResult> {
    async move {
        match ty {
            Type::NonNull(inner) => present(exec, source, query_field, &**inner).await,
            _ if source.is_null() => Ok(Json::Null),
            Type::Scalar(scalar) => (scalar.coerce)(&source),
            Type::Enum(en) => Ok(match source.as_json().and_then(Json::as_str) {
                Some(label) if en.has_value(label) => Json::String(label.to_owned()),
                _ => Json::Null,
            }),
            Type::List(inner) => match source {
                FieldValue::List(items) => {
                    let values = try_join_all(
                        items
                            .into_iter()
                            .map(|item| present(exec, item, query_field, &**inner)),
                    )
                    .await?;
                    Ok(Json::Array(values))
                }
                _ => Ok(Json::Null),
            },
            Type::Object(object) => {
                resolve_fields(exec, &**object, source, &query_field.selection_set).await
            }
        }
    }
    .boxed()
}
