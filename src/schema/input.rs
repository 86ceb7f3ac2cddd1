//! Input types and argument declarations.
//!
//! Arguments are declared alongside fields and coerced by the executor before
//! the resolver runs. Input types mirror the output algebra — scalars, enums,
//! objects, lists, and non-`null` wrappers — but describe values flowing
//! _into_ the system.

use std::{fmt, sync::Arc};

use arcstr::ArcStr;

use crate::{
    ast::ConstValue,
    executor::FieldResult,
    schema::meta::{EnumValue, TypeKind},
};

/// Shortcut for an input scalar coercion function.
pub type InputCoerceFn = Arc<dyn Fn(&ConstValue) -> FieldResult<ConstValue> + Send + Sync>;

/// Input scalar metadata: a name plus the coercion applied to parsed values.
#[derive(Clone)]
pub struct InputScalar {
    pub(crate) name: ArcStr,
    pub(crate) coerce: InputCoerceFn,
}

/// Input enum metadata. Parsed enum (or string) literals must match one of
/// the declared labels.
#[derive(Clone, Debug)]
pub struct InputEnum {
    pub(crate) name: ArcStr,
    pub(crate) values: Vec<EnumValue>,
}

impl InputEnum {
    pub(crate) fn has_value(&self, label: &str) -> bool {
        self.values.iter().any(|value| value.name.as_str() == label)
    }
}

/// Input object metadata: a named set of input fields, each an [`Argument`].
#[derive(Clone)]
pub struct InputObjectType {
    pub(crate) name: ArcStr,
    pub(crate) fields: Vec<Argument>,
}

/// An input type: the permitted shape of an argument value.
///
/// Every input type admits `null` unless wrapped in [`InputType::NonNull`].
#[derive(Clone)]
pub enum InputType {
    /// A leaf type validated by a coercion function.
    Scalar(InputScalar),
    /// A leaf type restricted to a fixed set of labels.
    Enum(InputEnum),
    /// A named set of input fields.
    Object(InputObjectType),
    /// A list of the inner type. A single non-list value coerces to a
    /// singleton list.
    List(Box<InputType>),
    /// The inner type with its implicit nullability removed.
    NonNull(Box<InputType>),
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(t) => f.write_str(&t.name),
            Self::Enum(t) => f.write_str(&t.name),
            Self::Object(t) => f.write_str(&t.name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl fmt::Debug for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputType({self})")
    }
}

impl InputType {
    /// Constructs a custom input scalar from a coercion function.
    pub fn scalar<F>(name: impl Into<ArcStr>, coerce: F) -> Self
    where
        F: Fn(&ConstValue) -> FieldResult<ConstValue> + Send + Sync + 'static,
    {
        Self::Scalar(InputScalar {
            name: name.into(),
            coerce: Arc::new(coerce),
        })
    }

    /// Constructs an input enum from its values.
    pub fn enumeration(
        name: impl Into<ArcStr>,
        values: impl IntoIterator<Item = EnumValue>,
    ) -> Self {
        Self::Enum(InputEnum {
            name: name.into(),
            values: values.into_iter().collect(),
        })
    }

    /// Constructs an input object from its fields.
    pub fn object(name: impl Into<ArcStr>, fields: Vec<Argument>) -> Self {
        Self::Object(InputObjectType {
            name: name.into(),
            fields,
        })
    }

    /// Wraps an input type into a list.
    pub fn list(of: InputType) -> Self {
        Self::List(Box::new(of))
    }

    /// Removes the implicit nullability of an input type.
    pub fn non_null(of: InputType) -> Self {
        Self::NonNull(Box::new(of))
    }

    /// The built-in `Int` input scalar.
    pub fn int() -> Self {
        Self::scalar("Int", |value| match value {
            ConstValue::Int(i) => Ok(ConstValue::Int(*i)),
            _ => Err("Invalid int".into()),
        })
    }

    /// The built-in `Float` input scalar. Integer literals promote.
    pub fn float() -> Self {
        Self::scalar("Float", |value| match value {
            ConstValue::Float(f) => Ok(ConstValue::Float(*f)),
            ConstValue::Int(i) => Ok(ConstValue::Float(*i as f64)),
            _ => Err("Invalid float".into()),
        })
    }

    /// The built-in `String` input scalar.
    pub fn string() -> Self {
        Self::scalar("String", |value| match value {
            ConstValue::String(s) => Ok(ConstValue::String(s.clone())),
            _ => Err("Invalid string".into()),
        })
    }

    /// The built-in `Boolean` input scalar.
    pub fn boolean() -> Self {
        Self::scalar("Boolean", |value| match value {
            ConstValue::Boolean(b) => Ok(ConstValue::Boolean(*b)),
            _ => Err("Invalid boolean".into()),
        })
    }

    /// The built-in `ID` input scalar. Integer literals coerce to strings.
    pub fn id() -> Self {
        Self::scalar("ID", |value| match value {
            ConstValue::String(s) => Ok(ConstValue::String(s.clone())),
            ConstValue::Int(i) => Ok(ConstValue::String(i.to_string())),
            _ => Err("Invalid ID".into()),
        })
    }

    /// The name of this input type, if it is a named (non-wrapper) type.
    pub fn name(&self) -> Option<&ArcStr> {
        match self {
            Self::Scalar(t) => Some(&t.name),
            Self::Enum(t) => Some(&t.name),
            Self::Object(t) => Some(&t.name),
            Self::List(_) | Self::NonNull(_) => None,
        }
    }

    pub(crate) fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Enum(_) => TypeKind::Enum,
            Self::Object(_) => TypeKind::InputObject,
            Self::List(_) => TypeKind::List,
            Self::NonNull(_) => TypeKind::NonNull,
        }
    }
}

/// A declared argument of a field (or an input field of an input object).
#[derive(Clone, Debug)]
pub struct Argument {
    pub(crate) name: ArcStr,
    pub(crate) description: Option<ArcStr>,
    pub(crate) ty: InputType,
    pub(crate) default: Option<ConstValue>,
}

impl Argument {
    /// Declares an argument of the given input type.
    pub fn new(name: impl Into<ArcStr>, ty: InputType) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            default: None,
        }
    }

    /// Declares an argument with a default, used when the argument is absent
    /// or supplied as `null`.
    pub fn with_default(name: impl Into<ArcStr>, ty: InputType, default: ConstValue) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            default: Some(default),
        }
    }

    /// Attaches a description, surfaced through introspection.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The name of this argument.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The input type of this argument.
    pub fn ty(&self) -> &InputType {
        &self.ty
    }
}
