//! The introspection meta-schema.
//!
//! Every schema's query root is augmented with a synthetic `__schema` field
//! whose result is described by the `__Schema`, `__Type`, `__Field`,
//! `__InputValue`, `__EnumValue`, `__Directive`, and `__TypeKind` types.
//! These are ordinary objects and enums built with this crate's own
//! constructors; their sources are type-erased wrappers so that output and
//! input types can both be projected as `__Type`.

use arcstr::ArcStr;
use fnv::FnvHashSet;

use crate::{
    ast::ConstValue,
    schema::{
        input::{Argument, InputType},
        meta::{EnumValue, Field, FieldValue, Type, TypeKind},
    },
};

/// Source value of the `__schema` field.
pub(crate) struct SchemaRecord<Ctx: 'static> {
    pub(crate) query: Type<Ctx>,
}

/// Source value of `__Type`: either side of the type algebra.
pub(crate) enum AnyType<Ctx: 'static> {
    Output(Type<Ctx>),
    Input(InputType),
}

impl<Ctx: 'static> Clone for AnyType<Ctx> {
    fn clone(&self) -> Self {
        match self {
            Self::Output(ty) => Self::Output(ty.clone()),
            Self::Input(ty) => Self::Input(ty.clone()),
        }
    }
}

impl<Ctx: 'static> AnyType<Ctx> {
    fn kind(&self) -> TypeKind {
        match self {
            Self::Output(ty) => ty.kind(),
            Self::Input(ty) => ty.kind(),
        }
    }

    fn name(&self) -> Option<ArcStr> {
        match self {
            Self::Output(ty) => ty.name().cloned(),
            Self::Input(ty) => ty.name().cloned(),
        }
    }

    fn of_type(&self) -> Option<AnyType<Ctx>> {
        match self {
            Self::Output(Type::List(inner) | Type::NonNull(inner)) => {
                Some(Self::Output((**inner).clone()))
            }
            Self::Input(InputType::List(inner) | InputType::NonNull(inner)) => {
                Some(Self::Input((**inner).clone()))
            }
            _ => None,
        }
    }

    /// Fields projected as `__Field`: an output object's fields, or an input
    /// object's members.
    fn fields(&self) -> Option<Vec<AnyField<Ctx>>> {
        match self {
            Self::Output(Type::Object(object)) => Some(
                object
                    .fields()
                    .iter()
                    .filter(|field| !field.name().starts_with("__"))
                    .cloned()
                    .map(AnyField::Output)
                    .collect(),
            ),
            Self::Input(InputType::Object(object)) => Some(
                object.fields.iter().cloned().map(AnyField::Input).collect(),
            ),
            _ => None,
        }
    }

    fn input_fields(&self) -> Option<Vec<Argument>> {
        match self {
            Self::Input(InputType::Object(object)) => Some(object.fields.clone()),
            _ => None,
        }
    }

    fn enum_values(&self) -> Option<Vec<EnumValue>> {
        match self {
            Self::Output(Type::Enum(en)) => Some(en.values.clone()),
            Self::Input(InputType::Enum(en)) => Some(en.values.clone()),
            _ => None,
        }
    }

    fn is_object(&self) -> bool {
        matches!(self, Self::Output(Type::Object(_)))
    }
}

/// Source value of `__Field`: an output field, or an input-object member.
pub(crate) enum AnyField<Ctx: 'static> {
    Output(Field<Ctx>),
    Input(Argument),
}

impl<Ctx: 'static> AnyField<Ctx> {
    fn name(&self) -> ArcStr {
        match self {
            Self::Output(field) => field.name.clone(),
            Self::Input(argument) => argument.name.clone(),
        }
    }

    fn description(&self) -> Option<ArcStr> {
        match self {
            Self::Output(field) => field.description.clone(),
            Self::Input(argument) => argument.description.clone(),
        }
    }

    fn arguments(&self) -> Vec<Argument> {
        match self {
            Self::Output(field) => field.arguments.clone(),
            Self::Input(_) => Vec::new(),
        }
    }

    fn ty(&self) -> AnyType<Ctx> {
        match self {
            Self::Output(field) => AnyType::Output(field.ty.clone()),
            Self::Input(argument) => AnyType::Input(argument.ty.clone()),
        }
    }
}

/// Builds the synthetic `__schema` field for a schema whose query root is
/// `query`. The field's resolver hands the root back to the meta-schema.
pub(crate) fn schema_field<Ctx: 'static>(query: Type<Ctx>) -> Field<Ctx> {
    Field::new(
        "__schema",
        Type::non_null(meta_schema()),
        move |_ctx, _parent, _args| {
            Ok(FieldValue::item(SchemaRecord {
                query: query.clone(),
            }))
        },
    )
}

/// Depth-first enumeration of every named type reachable from `root`,
/// visiting each name once. Objects contribute their fields' output types
/// and their arguments' input types; wrappers are traversed but not listed.
fn type_list<Ctx: 'static>(root: &Type<Ctx>) -> Vec<AnyType<Ctx>> {
    let mut types = Vec::new();
    let mut visited = FnvHashSet::default();
    collect_output(root, &mut types, &mut visited);
    types
}

fn collect_output<Ctx: 'static>(
    ty: &Type<Ctx>,
    types: &mut Vec<AnyType<Ctx>>,
    visited: &mut FnvHashSet<ArcStr>,
) {
    match ty {
        Type::List(inner) | Type::NonNull(inner) => collect_output(&**inner, types, visited),
        Type::Scalar(scalar) => {
            if visited.insert(scalar.name().clone()) {
                types.push(AnyType::Output(ty.clone()));
            }
        }
        Type::Enum(en) => {
            if visited.insert(en.name().clone()) {
                types.push(AnyType::Output(ty.clone()));
            }
        }
        Type::Object(object) => {
            if !visited.insert(object.name().clone()) {
                return;
            }
            types.push(AnyType::Output(ty.clone()));
            for field in object.fields() {
                collect_output(&field.ty, types, visited);
                for argument in &field.arguments {
                    collect_input(&argument.ty, types, visited);
                }
            }
        }
    }
}

fn collect_input<Ctx: 'static>(
    ty: &InputType,
    types: &mut Vec<AnyType<Ctx>>,
    visited: &mut FnvHashSet<ArcStr>,
) {
    match ty {
        InputType::List(inner) | InputType::NonNull(inner) => {
            collect_input(&**inner, types, visited)
        }
        InputType::Scalar(scalar) => {
            if visited.insert(scalar.name.clone()) {
                types.push(AnyType::Input(ty.clone()));
            }
        }
        InputType::Enum(en) => {
            if visited.insert(en.name.clone()) {
                types.push(AnyType::Input(ty.clone()));
            }
        }
        InputType::Object(object) => {
            if !visited.insert(object.name.clone()) {
                return;
            }
            types.push(AnyType::Input(ty.clone()));
            for field in &object.fields {
                collect_input(&field.ty, types, visited);
            }
        }
    }
}

/// Builds the `__Schema` object type together with the rest of the
/// meta-schema. The meta types are mutually recursive, so they start out as
/// shells and receive their field initializers afterwards.
fn meta_schema<Ctx: 'static>() -> Type<Ctx> {
    let type_kind = Type::enumeration(
        "__TypeKind",
        [
            EnumValue::new("SCALAR"),
            EnumValue::new("OBJECT"),
            EnumValue::new("INTERFACE"),
            EnumValue::new("UNION"),
            EnumValue::new("ENUM"),
            EnumValue::new("INPUT_OBJECT"),
            EnumValue::new("LIST"),
            EnumValue::new("NON_NULL"),
        ],
    );

    let type_type = Type::object_shell("__Type");
    let field_type = Type::object_shell("__Field");
    let input_value_type = Type::object_shell("__InputValue");
    let enum_value_type = Type::object_shell("__EnumValue");
    let directive_type = Type::object_shell("__Directive");
    let schema_type = Type::object_shell("__Schema");

    install_type_type(
        &type_type,
        type_kind,
        field_type.clone(),
        input_value_type.clone(),
        enum_value_type.clone(),
    );
    install_field_type(&field_type, type_type.clone(), input_value_type.clone());
    install_input_value_type(&input_value_type, type_type.clone());
    install_enum_value_type(&enum_value_type);
    install_directive_type(&directive_type, input_value_type);
    install_schema_type(&schema_type, type_type, directive_type);

    schema_type
}

fn include_deprecated_argument() -> Argument {
    Argument::with_default(
        "includeDeprecated",
        InputType::boolean(),
        ConstValue::Boolean(false),
    )
}

fn install_schema_type<Ctx: 'static>(
    schema_type: &Type<Ctx>,
    type_type: Type<Ctx>,
    directive_type: Type<Ctx>,
) {
    schema_type.install_fields(move || {
        vec![
            Field::new(
                "types",
                Type::non_null(Type::list(Type::non_null(type_type.clone()))),
                |_ctx, parent, _args| {
                    Ok(match parent.downcast_ref::<SchemaRecord<Ctx>>() {
                        Some(record) => FieldValue::list(
                            type_list(&record.query).into_iter().map(FieldValue::item),
                        ),
                        None => FieldValue::Null,
                    })
                },
            ),
            Field::new(
                "queryType",
                Type::non_null(type_type.clone()),
                |_ctx, parent, _args| {
                    Ok(match parent.downcast_ref::<SchemaRecord<Ctx>>() {
                        Some(record) => {
                            FieldValue::item(AnyType::Output(record.query.clone()))
                        }
                        None => FieldValue::Null,
                    })
                },
            ),
            Field::new("mutationType", type_type.clone(), |_ctx, _parent, _args| {
                Ok(FieldValue::Null)
            }),
            Field::new(
                "subscriptionType",
                type_type.clone(),
                |_ctx, _parent, _args| Ok(FieldValue::Null),
            ),
            Field::new(
                "directives",
                Type::non_null(Type::list(Type::non_null(directive_type.clone()))),
                |_ctx, _parent, _args| Ok(FieldValue::list(Vec::new())),
            ),
        ]
    });
}

fn install_type_type<Ctx: 'static>(
    type_type: &Type<Ctx>,
    type_kind: Type<Ctx>,
    field_type: Type<Ctx>,
    input_value_type: Type<Ctx>,
    enum_value_type: Type<Ctx>,
) {
    let of_type = type_type.clone();
    type_type.install_fields(move || {
        vec![
            Field::new(
                "kind",
                Type::non_null(type_kind.clone()),
                |_ctx, parent, _args| {
                    Ok(match parent.downcast_ref::<AnyType<Ctx>>() {
                        Some(ty) => FieldValue::from(ty.kind().as_str()),
                        None => FieldValue::Null,
                    })
                },
            ),
            Field::new("name", Type::string(), |_ctx, parent, _args| {
                Ok(parent
                    .downcast_ref::<AnyType<Ctx>>()
                    .and_then(AnyType::name)
                    .map(|name| FieldValue::from(name.as_str()))
                    .unwrap_or(FieldValue::Null))
            }),
            Field::new("description", Type::string(), |_ctx, _parent, _args| {
                Ok(FieldValue::Null)
            }),
            Field::new(
                "fields",
                Type::list(Type::non_null(field_type.clone())),
                |_ctx, parent, _args| {
                    Ok(parent
                        .downcast_ref::<AnyType<Ctx>>()
                        .and_then(AnyType::fields)
                        .map(|fields| {
                            FieldValue::list(fields.into_iter().map(FieldValue::item))
                        })
                        .unwrap_or(FieldValue::Null))
                },
            )
            .argument(include_deprecated_argument()),
            Field::new(
                "interfaces",
                Type::list(Type::non_null(of_type.clone())),
                |_ctx, parent, _args| {
                    Ok(match parent.downcast_ref::<AnyType<Ctx>>() {
                        Some(ty) if ty.is_object() => FieldValue::list(Vec::new()),
                        _ => FieldValue::Null,
                    })
                },
            ),
            Field::new(
                "possibleTypes",
                Type::list(Type::non_null(of_type.clone())),
                |_ctx, _parent, _args| Ok(FieldValue::Null),
            ),
            Field::new(
                "enumValues",
                Type::list(Type::non_null(enum_value_type.clone())),
                |_ctx, parent, _args| {
                    Ok(parent
                        .downcast_ref::<AnyType<Ctx>>()
                        .and_then(AnyType::enum_values)
                        .map(|values| {
                            FieldValue::list(values.into_iter().map(FieldValue::item))
                        })
                        .unwrap_or(FieldValue::Null))
                },
            )
            .argument(include_deprecated_argument()),
            Field::new(
                "inputFields",
                Type::list(Type::non_null(input_value_type.clone())),
                |_ctx, parent, _args| {
                    Ok(parent
                        .downcast_ref::<AnyType<Ctx>>()
                        .and_then(AnyType::input_fields)
                        .map(|fields| {
                            FieldValue::list(fields.into_iter().map(FieldValue::item))
                        })
                        .unwrap_or(FieldValue::Null))
                },
            ),
            Field::new("ofType", of_type.clone(), |_ctx, parent, _args| {
                Ok(parent
                    .downcast_ref::<AnyType<Ctx>>()
                    .and_then(AnyType::of_type)
                    .map(FieldValue::item)
                    .unwrap_or(FieldValue::Null))
            }),
        ]
    });
}

fn install_field_type<Ctx: 'static>(
    field_type: &Type<Ctx>,
    type_type: Type<Ctx>,
    input_value_type: Type<Ctx>,
) {
    field_type.install_fields(move || {
        vec![
            Field::new(
                "name",
                Type::non_null(Type::string()),
                |_ctx, parent, _args| {
                    Ok(match parent.downcast_ref::<AnyField<Ctx>>() {
                        Some(field) => FieldValue::from(field.name().as_str()),
                        None => FieldValue::Null,
                    })
                },
            ),
            Field::new("description", Type::string(), |_ctx, parent, _args| {
                Ok(parent
                    .downcast_ref::<AnyField<Ctx>>()
                    .and_then(AnyField::description)
                    .map(|description| FieldValue::from(description.as_str()))
                    .unwrap_or(FieldValue::Null))
            }),
            Field::new(
                "args",
                Type::non_null(Type::list(Type::non_null(input_value_type.clone()))),
                |_ctx, parent, _args| {
                    Ok(match parent.downcast_ref::<AnyField<Ctx>>() {
                        Some(field) => FieldValue::list(
                            field.arguments().into_iter().map(FieldValue::item),
                        ),
                        None => FieldValue::Null,
                    })
                },
            ),
            Field::new(
                "type",
                Type::non_null(type_type.clone()),
                |_ctx, parent, _args| {
                    Ok(match parent.downcast_ref::<AnyField<Ctx>>() {
                        Some(field) => FieldValue::item(field.ty()),
                        None => FieldValue::Null,
                    })
                },
            ),
            Field::new(
                "isDeprecated",
                Type::non_null(Type::boolean()),
                |_ctx, _parent, _args| Ok(FieldValue::from(false)),
            ),
            Field::new(
                "deprecationReason",
                Type::string(),
                |_ctx, _parent, _args| Ok(FieldValue::Null),
            ),
        ]
    });
}

fn install_input_value_type<Ctx: 'static>(input_value_type: &Type<Ctx>, type_type: Type<Ctx>) {
    input_value_type.install_fields(move || {
        vec![
            Field::new(
                "name",
                Type::non_null(Type::string()),
                |_ctx, parent, _args| {
                    Ok(match parent.downcast_ref::<Argument>() {
                        Some(argument) => FieldValue::from(argument.name.as_str()),
                        None => FieldValue::Null,
                    })
                },
            ),
            Field::new("description", Type::string(), |_ctx, parent, _args| {
                Ok(parent
                    .downcast_ref::<Argument>()
                    .and_then(|argument| argument.description.clone())
                    .map(|description| FieldValue::from(description.as_str()))
                    .unwrap_or(FieldValue::Null))
            }),
            Field::new(
                "type",
                Type::non_null(type_type.clone()),
                |_ctx, parent, _args| {
                    Ok(match parent.downcast_ref::<Argument>() {
                        Some(argument) => {
                            FieldValue::item(AnyType::<Ctx>::Input(argument.ty.clone()))
                        }
                        None => FieldValue::Null,
                    })
                },
            ),
            Field::new("defaultValue", Type::string(), |_ctx, parent, _args| {
                Ok(parent
                    .downcast_ref::<Argument>()
                    .and_then(|argument| argument.default.as_ref())
                    .map(|default| FieldValue::from(default.to_string()))
                    .unwrap_or(FieldValue::Null))
            }),
        ]
    });
}

fn install_enum_value_type<Ctx: 'static>(enum_value_type: &Type<Ctx>) {
    enum_value_type.install_fields(|| {
        vec![
            Field::new(
                "name",
                Type::non_null(Type::string()),
                |_ctx, parent, _args| {
                    Ok(match parent.downcast_ref::<EnumValue>() {
                        Some(value) => FieldValue::from(value.name().as_str()),
                        None => FieldValue::Null,
                    })
                },
            ),
            Field::new("description", Type::string(), |_ctx, parent, _args| {
                Ok(parent
                    .downcast_ref::<EnumValue>()
                    .and_then(|value| value.description.clone())
                    .map(|description| FieldValue::from(description.as_str()))
                    .unwrap_or(FieldValue::Null))
            }),
            Field::new(
                "isDeprecated",
                Type::non_null(Type::boolean()),
                |_ctx, _parent, _args| Ok(FieldValue::from(false)),
            ),
            Field::new(
                "deprecationReason",
                Type::string(),
                |_ctx, _parent, _args| Ok(FieldValue::Null),
            ),
        ]
    });
}

// No directives are definable, so `__Schema.directives` always resolves to
// an empty list and these resolvers never see a source value.
fn install_directive_type<Ctx: 'static>(directive_type: &Type<Ctx>, input_value_type: Type<Ctx>) {
    directive_type.install_fields(move || {
        vec![
            Field::new(
                "name",
                Type::non_null(Type::string()),
                |_ctx, _parent, _args| Ok(FieldValue::Null),
            ),
            Field::new("description", Type::string(), |_ctx, _parent, _args| {
                Ok(FieldValue::Null)
            }),
            Field::new(
                "locations",
                Type::non_null(Type::list(Type::non_null(Type::string()))),
                |_ctx, _parent, _args| Ok(FieldValue::Null),
            ),
            Field::new(
                "args",
                Type::non_null(Type::list(Type::non_null(input_value_type.clone()))),
                |_ctx, _parent, _args| Ok(FieldValue::Null),
            ),
        ]
    });
}
