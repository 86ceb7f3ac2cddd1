use futures::FutureExt as _;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::{
    ast, execute, execute_sync, Arguments, BoxFuture, EnumValue, Field, FieldResult, FieldValue,
    Schema, Type, Variables,
};

fn hello_schema() -> Schema<()> {
    Schema::new(vec![Field::new(
        "hello",
        Type::string(),
        |_ctx: &(), _parent, _args| Ok("world".into()),
    )])
}

#[test]
fn resolves_a_scalar_field() {
    let document = query(vec![sel(field("hello"))]);
    let response = execute_sync(&hello_schema(), &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"hello":"world"}}"#);
}

#[test]
fn alias_binds_the_response_key() {
    let document = query(vec![sel(aliased("greeting", "hello"))]);
    let response = execute_sync(&hello_schema(), &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"greeting":"world"}}"#);
}

#[test]
fn duplicate_selections_collapse_to_one_key() {
    let document = query(vec![sel(field("hello")), sel(field("hello"))]);
    let response = execute_sync(&hello_schema(), &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"hello":"world"}}"#);
}

#[test]
fn unknown_fields_resolve_to_null() {
    let document = query(vec![sel(field("nope"))]);
    let response = execute_sync(&hello_schema(), &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"nope":null}}"#);
}

#[test]
fn resolvers_read_the_context() {
    struct Database {
        greeting: String,
    }

    let schema = Schema::new(vec![Field::new(
        "greeting",
        Type::non_null(Type::string()),
        |db: &Database, _parent, _args| Ok(db.greeting.as_str().into()),
    )]);
    let db = Database {
        greeting: "hi there".into(),
    };

    let document = query(vec![sel(field("greeting"))]);
    let response = execute_sync(&schema, &db, &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"greeting":"hi there"}}"#);
}

struct User {
    id: String,
    name: String,
}

fn user_type() -> Type<()> {
    Type::object("User", |_user| {
        vec![
            Field::new(
                "id",
                Type::non_null(Type::id()),
                |_ctx, parent, _args| {
                    Ok(parent.downcast_ref::<User>().map(|user| user.id.as_str()).into())
                },
            ),
            Field::new(
                "name",
                Type::non_null(Type::string()),
                |_ctx, parent, _args| {
                    Ok(parent
                        .downcast_ref::<User>()
                        .map(|user| user.name.as_str())
                        .into())
                },
            ),
        ]
    })
}

fn user_schema() -> Schema<()> {
    Schema::new(vec![Field::new(
        "me",
        Type::non_null(user_type()),
        |_ctx: &(), _parent, _args| {
            Ok(FieldValue::item(User {
                id: "7".into(),
                name: "A".into(),
            }))
        },
    )])
}

#[test]
fn resolves_nested_objects_with_aliases() {
    let document = query(vec![sel(with_selections(
        aliased("x", "me"),
        vec![sel(aliased("i", "id")), sel(aliased("n", "name"))],
    ))]);
    let response = execute_sync(&user_schema(), &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"x":{"i":"7","n":"A"}}}"#);
}

#[test]
fn presents_lists_of_non_null_ints() {
    let schema = Schema::new(vec![Field::new(
        "xs",
        Type::non_null(Type::list(Type::non_null(Type::int()))),
        |_ctx: &(), _parent, _args| Ok(vec![1i64, 2, 3].into()),
    )]);

    let document = query(vec![sel(field("xs"))]);
    let response = execute_sync(&schema, &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"xs":[1,2,3]}}"#);
}

#[test]
fn presents_null_elements_inside_nullable_lists() {
    let schema = Schema::new(vec![Field::new(
        "xs",
        Type::list(Type::int()),
        |_ctx: &(), _parent, _args| {
            Ok(FieldValue::list([
                1i64.into(),
                FieldValue::Null,
                3i64.into(),
            ]))
        },
    )]);

    let document = query(vec![sel(field("xs"))]);
    let response = execute_sync(&schema, &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"xs":[1,null,3]}}"#);
}

#[test]
fn nullable_scalars_present_null() {
    let schema = Schema::new(vec![Field::new(
        "maybe",
        Type::string(),
        |_ctx: &(), _parent, _args| Ok(FieldValue::Null),
    )]);

    let document = query(vec![sel(field("maybe"))]);
    let response = execute_sync(&schema, &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"maybe":null}}"#);
}

#[test]
fn absent_sources_under_non_null_present_as_null() {
    // The executor re-enters presentation through the non-null wrapper
    // without erroring; the inner type maps the absent source to null.
    let schema = Schema::new(vec![Field::new(
        "strict",
        Type::non_null(Type::string()),
        |_ctx: &(), _parent, _args| Ok(FieldValue::Null),
    )]);

    let document = query(vec![sel(field("strict"))]);
    let response = execute_sync(&schema, &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"strict":null}}"#);
}

fn direction_schema() -> Schema<()> {
    let direction = Type::enumeration(
        "Direction",
        [EnumValue::new("NORTH"), EnumValue::new("SOUTH")],
    );
    Schema::new(vec![
        Field::new("heading", direction.clone(), |_ctx: &(), _parent, _args| {
            Ok("NORTH".into())
        }),
        Field::new("drift", direction, |_ctx: &(), _parent, _args| Ok("UP".into())),
    ])
}

#[test]
fn enums_present_their_label() {
    let document = query(vec![sel(field("heading"))]);
    let response = execute_sync(&direction_schema(), &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"heading":"NORTH"}}"#);
}

#[test]
fn undeclared_enum_labels_present_as_null() {
    let document = query(vec![sel(field("drift"))]);
    let response = execute_sync(&direction_schema(), &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"drift":null}}"#);
}

#[test]
fn resolver_errors_surface_in_the_envelope() {
    let schema = Schema::new(vec![Field::new(
        "boom",
        Type::string(),
        |_ctx: &(), _parent, _args| Err("kaboom".into()),
    )]);

    let document = query(vec![sel(field("boom"))]);
    let response = execute_sync(&schema, &(), &Variables::new(), &document);
    assert!(!response.is_ok());
    assert_eq!(response_text(&response), r#"{"errors":[{"message":"kaboom"}]}"#);
}

#[test]
fn mutations_are_refused() {
    let document = vec![operation(ast::OperationType::Mutation, vec![sel(field("foo"))])];
    let response = execute_sync(&hello_schema(), &(), &Variables::new(), &document);
    assert_eq!(
        response_text(&response),
        r#"{"errors":[{"message":"Mutation is not implemented"}]}"#,
    );
}

#[test]
fn subscriptions_are_refused() {
    let document = vec![operation(
        ast::OperationType::Subscription,
        vec![sel(field("foo"))],
    )];
    let response = execute_sync(&hello_schema(), &(), &Variables::new(), &document);
    assert_eq!(
        response_text(&response),
        r#"{"errors":[{"message":"Subscription is not implemented"}]}"#,
    );
}

#[test]
fn documents_without_operations_are_rejected() {
    let document = vec![fragment("f", "root", vec![sel(field("hello"))])];
    let response = execute_sync(&hello_schema(), &(), &Variables::new(), &document);
    assert_eq!(
        response_text(&response),
        r#"{"errors":[{"message":"No operation found"}]}"#,
    );
}

#[test]
fn only_the_first_operation_executes() {
    let document = vec![
        operation(ast::OperationType::Query, vec![sel(field("hello"))]),
        operation(ast::OperationType::Mutation, vec![sel(field("foo"))]),
    ];
    let response = execute_sync(&hello_schema(), &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"hello":"world"}}"#);
}

#[test]
fn fragment_spreads_expand_in_place() {
    let spread = query(vec![
        sel(field("hello")),
        ast::Selection::FragmentSpread(ast::FragmentSpread { name: "rest".into() }),
    ])
    .into_iter()
    .chain([fragment("rest", "root", vec![sel(aliased("again", "hello"))])])
    .collect::<Vec<_>>();
    let inlined = query(vec![sel(field("hello")), sel(aliased("again", "hello"))]);

    let schema = hello_schema();
    let spread_response = execute_sync(&schema, &(), &Variables::new(), &spread);
    let inlined_response = execute_sync(&schema, &(), &Variables::new(), &inlined);

    assert_eq!(response_json(&spread_response), response_json(&inlined_response));
    assert_eq!(
        response_text(&spread_response),
        r#"{"data":{"hello":"world","again":"world"}}"#,
    );
}

#[test]
fn mismatched_fragment_conditions_contribute_nothing() {
    let document = query(vec![
        sel(field("hello")),
        ast::Selection::FragmentSpread(ast::FragmentSpread { name: "rest".into() }),
    ])
    .into_iter()
    .chain([fragment("rest", "User", vec![sel(aliased("again", "hello"))])])
    .collect::<Vec<_>>();

    let response = execute_sync(&hello_schema(), &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"hello":"world"}}"#);
}

#[test]
fn undefined_fragments_contribute_nothing() {
    let document = query(vec![
        sel(field("hello")),
        ast::Selection::FragmentSpread(ast::FragmentSpread { name: "ghost".into() }),
    ]);

    let response = execute_sync(&hello_schema(), &(), &Variables::new(), &document);
    assert_eq!(response_text(&response), r#"{"data":{"hello":"world"}}"#);
}

#[test]
fn inline_fragments_apply_by_type_condition() {
    let document = query(vec![
        ast::Selection::InlineFragment(ast::InlineFragment {
            type_condition: None,
            selection_set: vec![sel(field("hello"))],
        }),
        ast::Selection::InlineFragment(ast::InlineFragment {
            type_condition: Some("root".into()),
            selection_set: vec![sel(aliased("again", "hello"))],
        }),
        ast::Selection::InlineFragment(ast::InlineFragment {
            type_condition: Some("User".into()),
            selection_set: vec![sel(aliased("skipped", "hello"))],
        }),
    ]);

    let response = execute_sync(&hello_schema(), &(), &Variables::new(), &document);
    assert_eq!(
        response_text(&response),
        r#"{"data":{"hello":"world","again":"world"}}"#,
    );
}

fn resolve_shout<'a>(
    _ctx: &'a (),
    parent: &'a FieldValue,
    _args: Arguments,
) -> BoxFuture<'a, FieldResult<FieldValue>> {
    async move {
        let base = parent
            .downcast_ref::<String>()
            .map(String::as_str)
            .unwrap_or("hey");
        Ok(base.to_uppercase().into())
    }
    .boxed()
}

#[tokio::test]
async fn drives_async_resolvers() {
    let schema = Schema::new(vec![Field::new_async(
        "shout",
        Type::non_null(Type::string()),
        resolve_shout,
    )]);

    let document = query(vec![sel(field("shout"))]);
    let response = execute(&schema, &(), &Variables::new(), &document).await;
    assert_eq!(response_text(&response), r#"{"data":{"shout":"HEY"}}"#);
}

#[tokio::test]
async fn sibling_fields_preserve_selection_order() {
    let schema = Schema::new(vec![
        Field::new("a", Type::string(), |_ctx: &(), _parent, _args| Ok("1".into())),
        Field::new("b", Type::string(), |_ctx: &(), _parent, _args| Ok("2".into())),
        Field::new("c", Type::string(), |_ctx: &(), _parent, _args| Ok("3".into())),
    ]);

    let document = query(vec![sel(field("c")), sel(field("a")), sel(field("b"))]);
    let response = execute(&schema, &(), &Variables::new(), &document).await;
    assert_eq!(
        response_text(&response),
        r#"{"data":{"c":"3","a":"1","b":"2"}}"#,
    );
}

#[test]
fn responses_compare_as_json_values() {
    let document = query(vec![sel(field("hello"))]);
    let response = execute_sync(&hello_schema(), &(), &Variables::new(), &document);
    assert_eq!(response_json(&response), json!({"data": {"hello": "world"}}));
    assert!(response.is_ok());
}
