//! Output types, fields, and resolvers used to describe a GraphQL schema.
//!
//! A schema is an ordinary value built at runtime from the constructors on
//! [`Type`] and [`Field`]. Types are cheaply clonable handles; object field
//! lists are evaluated lazily so that a type can refer to itself (or to a
//! type that refers back to it).

use std::{
    any::Any,
    fmt,
    sync::{Arc, Mutex, OnceLock},
};

use arcstr::ArcStr;
use futures::future::{self, BoxFuture, FutureExt as _};
use serde_json::Value as Json;

use crate::{
    executor::{Arguments, FieldResult},
    schema::input::Argument,
};

/// GraphQL type kind: the meta type of a type, as reported by introspection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TypeKind {
    /// Scalar types: the leaf nodes of GraphQL queries.
    Scalar,

    /// Object types: named bags of fields, resolved against a source value.
    Object,

    /// Interface types. Declared for introspection compatibility; this
    /// library does not define any.
    Interface,

    /// Union types. Declared for introspection compatibility; this library
    /// does not define any.
    Union,

    /// Enum types: leaf values restricted to a fixed set of labels.
    Enum,

    /// Input objects: complex values provided in queries _into_ the system.
    InputObject,

    /// List types, wrapping any other type.
    List,

    /// Non-`null` types. In GraphQL, nullable is the default; wrapping a type
    /// removes the implicit nullability.
    NonNull,
}

impl TypeKind {
    /// The spelling of this kind in the `__TypeKind` introspection enum.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::InputObject => "INPUT_OBJECT",
            Self::List => "LIST",
            Self::NonNull => "NON_NULL",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value flowing out of a resolver, before presentation through the field's
/// output type.
///
/// Resolver sources are type-erased: leaf values (scalars, enum labels) carry
/// their JSON form directly, while object sources are opaque items that field
/// resolvers recover with [`FieldValue::downcast_ref`].
#[derive(Clone)]
pub enum FieldValue {
    /// An absent value; presents as JSON `null`.
    Null,
    /// A leaf value, already in its serialized form.
    Value(Json),
    /// An opaque source value for an object type.
    Item(Arc<dyn Any + Send + Sync>),
    /// A sequence of values for a list type.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Constructs a `null` value.
    pub fn null() -> Self {
        Self::Null
    }

    /// Wraps a source value for an object type.
    pub fn item<T: Any + Send + Sync>(value: T) -> Self {
        Self::Item(Arc::new(value))
    }

    /// Constructs a list value.
    pub fn list<I: IntoIterator<Item = FieldValue>>(values: I) -> Self {
        Self::List(values.into_iter().collect())
    }

    /// Does this value present as `null`?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Value(Json::Null))
    }

    /// Views the leaf value, if this is one.
    pub fn as_json(&self) -> Option<&Json> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Recovers a typed view of an object source value.
    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            Self::Item(item) => item.downcast_ref(),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Item(_) => f.write_str("Item(..)"),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

impl From<Json> for FieldValue {
    fn from(value: Json) -> Self {
        Self::Value(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Value(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl<T> From<Option<T>> for FieldValue
where
    FieldValue: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

impl<T> From<Vec<T>> for FieldValue
where
    FieldValue: From<T>,
{
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Shortcut for an output scalar coercion function.
pub type ScalarCoerceFn = Arc<dyn Fn(&FieldValue) -> FieldResult<Json> + Send + Sync>;

/// Scalar type metadata: a name plus the coercion applied to resolved source
/// values.
#[derive(Clone)]
pub struct ScalarType {
    pub(crate) name: ArcStr,
    pub(crate) coerce: ScalarCoerceFn,
}

impl ScalarType {
    /// The name of this scalar.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }
}

/// A single value of an enum type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumValue {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
}

impl EnumValue {
    /// Declares an enum value with the given label.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Attaches a description, surfaced through introspection.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The label of this value.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }
}

/// Enum type metadata.
///
/// Resolvers for enum-typed fields yield the value's label; a label not
/// declared here presents as `null`.
#[derive(Clone, Debug)]
pub struct EnumType {
    pub(crate) name: ArcStr,
    pub(crate) values: Vec<EnumValue>,
}

impl EnumType {
    /// The name of this enum.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    pub(crate) fn has_value(&self, label: &str) -> bool {
        self.values.iter().any(|value| value.name.as_str() == label)
    }
}

type FieldsInit<Ctx> = Box<dyn FnOnce() -> Vec<Field<Ctx>> + Send>;

/// Object type metadata: a name and a lazily evaluated field list.
///
/// The field list is forced at most once. Initializers must not force the
/// fields of the object they are initializing; they may freely capture and
/// store its [`Type`] handle, which is what makes cyclic schemas possible.
pub struct ObjectType<Ctx: 'static> {
    name: ArcStr,
    fields: OnceLock<Vec<Field<Ctx>>>,
    init: Mutex<Option<FieldsInit<Ctx>>>,
}

impl<Ctx: 'static> ObjectType<Ctx> {
    fn shell(name: ArcStr) -> Self {
        Self {
            name,
            fields: OnceLock::new(),
            init: Mutex::new(None),
        }
    }

    fn install(&self, init: FieldsInit<Ctx>) {
        *self.init.lock().expect("field initializer lock poisoned") = Some(init);
    }

    /// The name of this object type.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The fields of this object, forcing the initializer on first access.
    pub fn fields(&self) -> &[Field<Ctx>] {
        self.fields.get_or_init(|| {
            let init = self
                .init
                .lock()
                .expect("field initializer lock poisoned")
                .take()
                .expect("object type has no field initializer");
            init()
        })
    }

    /// Looks up a field by name. The first declaration wins.
    pub fn field_by_name(&self, name: &str) -> Option<&Field<Ctx>> {
        self.fields().iter().find(|field| field.name.as_str() == name)
    }
}

impl<Ctx: 'static> fmt::Debug for ObjectType<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// An output type: the shape of a field's resolved value.
///
/// Every type is nullable unless wrapped in [`Type::NonNull`]. Handles are
/// reference counted, so cloning a [`Type`] is cheap and shares the
/// underlying definition.
pub enum Type<Ctx: 'static> {
    /// A leaf type coercing source values into JSON.
    Scalar(Arc<ScalarType>),
    /// A leaf type restricted to a fixed set of labels.
    Enum(Arc<EnumType>),
    /// A named bag of fields.
    Object(Arc<ObjectType<Ctx>>),
    /// A list of the inner type.
    List(Arc<Type<Ctx>>),
    /// The inner type with its implicit nullability removed.
    NonNull(Arc<Type<Ctx>>),
}

impl<Ctx: 'static> Clone for Type<Ctx> {
    fn clone(&self) -> Self {
        match self {
            Self::Scalar(t) => Self::Scalar(t.clone()),
            Self::Enum(t) => Self::Enum(t.clone()),
            Self::Object(t) => Self::Object(t.clone()),
            Self::List(t) => Self::List(t.clone()),
            Self::NonNull(t) => Self::NonNull(t.clone()),
        }
    }
}

impl<Ctx: 'static> fmt::Display for Type<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(t) => f.write_str(&t.name),
            Self::Enum(t) => f.write_str(&t.name),
            Self::Object(t) => f.write_str(t.name()),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl<Ctx: 'static> fmt::Debug for Type<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({self})")
    }
}

impl<Ctx: 'static> Type<Ctx> {
    /// Constructs an object type.
    ///
    /// The field initializer receives the type under construction, so fields
    /// may refer back to it:
    ///
    /// ```
    /// use larch::{Field, Type};
    ///
    /// let user: Type<()> = Type::object("User", |user| {
    ///     vec![
    ///         Field::new("id", Type::non_null(Type::id()), |_, _, _| Ok("1".into())),
    ///         Field::new("friend", user.clone(), |_, _, _| Ok(larch::FieldValue::Null)),
    ///     ]
    /// });
    /// ```
    pub fn object<F>(name: impl Into<ArcStr>, fields: F) -> Self
    where
        F: FnOnce(&Type<Ctx>) -> Vec<Field<Ctx>> + Send + 'static,
    {
        let ty = Self::object_shell(name);
        let handle = ty.clone();
        ty.install_fields(move || fields(&handle));
        ty
    }

    /// Constructs an object type with no field initializer installed yet.
    /// Used together with [`Type::install_fields`] for mutually recursive
    /// type families.
    pub(crate) fn object_shell(name: impl Into<ArcStr>) -> Self {
        Self::Object(Arc::new(ObjectType::shell(name.into())))
    }

    /// Installs the field initializer of an object shell.
    pub(crate) fn install_fields<F>(&self, init: F)
    where
        F: FnOnce() -> Vec<Field<Ctx>> + Send + 'static,
    {
        match self {
            Self::Object(object) => object.install(Box::new(init)),
            _ => panic!("cannot install fields on a non-object type"),
        }
    }

    /// Constructs a custom scalar type from a coercion function.
    pub fn scalar<F>(name: impl Into<ArcStr>, coerce: F) -> Self
    where
        F: Fn(&FieldValue) -> FieldResult<Json> + Send + Sync + 'static,
    {
        Self::Scalar(Arc::new(ScalarType {
            name: name.into(),
            coerce: Arc::new(coerce),
        }))
    }

    /// Constructs an enum type from its values.
    pub fn enumeration(
        name: impl Into<ArcStr>,
        values: impl IntoIterator<Item = EnumValue>,
    ) -> Self {
        Self::Enum(Arc::new(EnumType {
            name: name.into(),
            values: values.into_iter().collect(),
        }))
    }

    /// Wraps a type into a list.
    pub fn list(of: Type<Ctx>) -> Self {
        Self::List(Arc::new(of))
    }

    /// Removes the implicit nullability of a type.
    pub fn non_null(of: Type<Ctx>) -> Self {
        Self::NonNull(Arc::new(of))
    }

    /// The built-in `Int` scalar.
    pub fn int() -> Self {
        Self::scalar("Int", |value| match value.as_json() {
            Some(Json::Number(n)) if n.is_i64() || n.is_u64() => Ok(Json::Number(n.clone())),
            _ => Err("Invalid int".into()),
        })
    }

    /// The built-in `Float` scalar.
    pub fn float() -> Self {
        Self::scalar("Float", |value| match value.as_json() {
            Some(Json::Number(n)) => Ok(Json::Number(n.clone())),
            _ => Err("Invalid float".into()),
        })
    }

    /// The built-in `String` scalar.
    pub fn string() -> Self {
        Self::scalar("String", |value| match value.as_json() {
            Some(Json::String(s)) => Ok(Json::String(s.clone())),
            _ => Err("Invalid string".into()),
        })
    }

    /// The built-in `Boolean` scalar.
    pub fn boolean() -> Self {
        Self::scalar("Boolean", |value| match value.as_json() {
            Some(Json::Bool(b)) => Ok(Json::Bool(*b)),
            _ => Err("Invalid boolean".into()),
        })
    }

    /// The built-in `ID` scalar. Integer sources serialize as strings.
    pub fn id() -> Self {
        Self::scalar("ID", |value| match value.as_json() {
            Some(Json::String(s)) => Ok(Json::String(s.clone())),
            Some(Json::Number(n)) if n.is_i64() || n.is_u64() => {
                Ok(Json::String(n.to_string()))
            }
            _ => Err("Invalid ID".into()),
        })
    }

    /// The name of this type, if it is a named (non-wrapper) type.
    pub fn name(&self) -> Option<&ArcStr> {
        match self {
            Self::Scalar(t) => Some(&t.name),
            Self::Enum(t) => Some(&t.name),
            Self::Object(t) => Some(t.name()),
            Self::List(_) | Self::NonNull(_) => None,
        }
    }

    pub(crate) fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Enum(_) => TypeKind::Enum,
            Self::Object(_) => TypeKind::Object,
            Self::List(_) => TypeKind::List,
            Self::NonNull(_) => TypeKind::NonNull,
        }
    }
}

/// Shortcut for a type-erased field resolver.
pub type DynResolver<Ctx> = Arc<
    dyn for<'a> Fn(
            &'a Ctx,
            &'a FieldValue,
            Arguments,
        ) -> BoxFuture<'a, FieldResult<FieldValue>>
        + Send
        + Sync,
>;

/// A field of an object type: a name, an output type, declared arguments,
/// and the resolver producing its value.
pub struct Field<Ctx: 'static> {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
    pub(crate) ty: Type<Ctx>,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) resolver: DynResolver<Ctx>,
}

impl<Ctx: 'static> Field<Ctx> {
    /// Declares a field with a synchronous resolver.
    ///
    /// The resolver receives the user context, the parent object's source
    /// value, and the coerced arguments. Its result is lifted into the
    /// executor's future immediately.
    pub fn new<F>(name: impl Into<ArcStr>, ty: Type<Ctx>, resolver: F) -> Self
    where
        F: Fn(&Ctx, &FieldValue, Arguments) -> FieldResult<FieldValue> + Send + Sync + 'static,
    {
        let lifted: DynResolver<Ctx> = Arc::new(move |ctx, parent, args| {
            future::ready(resolver(ctx, parent, args)).boxed()
        });
        Self {
            name: name.into(),
            description: None,
            ty,
            arguments: Vec::new(),
            resolver: lifted,
        }
    }

    /// Declares a field whose resolver is itself asynchronous.
    ///
    /// The returned future borrows the context and parent source for its
    /// lifetime, so resolvers are usually written as
    /// `|ctx, parent, args| async move { .. }.boxed()`.
    pub fn new_async<F>(name: impl Into<ArcStr>, ty: Type<Ctx>, resolver: F) -> Self
    where
        F: for<'a> Fn(&'a Ctx, &'a FieldValue, Arguments) -> BoxFuture<'a, FieldResult<FieldValue>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            ty,
            arguments: Vec::new(),
            resolver: Arc::new(resolver),
        }
    }

    /// Declares an argument on this field.
    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Attaches a description, surfaced through introspection.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The name of this field.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The output type of this field.
    pub fn ty(&self) -> &Type<Ctx> {
        &self.ty
    }

    /// The declared arguments of this field.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }
}

impl<Ctx: 'static> Clone for Field<Ctx> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            ty: self.ty.clone(),
            arguments: self.arguments.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

impl<Ctx: 'static> fmt::Debug for Field<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("type", &self.ty)
            .finish_non_exhaustive()
    }
}
