//! Abstract syntax tree for parsed query documents.
//!
//! The parser itself lives outside this crate; any frontend that produces the
//! types below can drive the executor. Lists and objects keep their source
//! order, and values are plain data with no position information attached.

use std::fmt;

use itertools::Itertools as _;

use crate::executor::{FieldError, FieldResult, Variables};

/// A value as it appears in a query document.
///
/// Unlike [`ConstValue`], this may still contain variable references. Variable
/// substitution happens during argument coercion via [`Value::into_const`].
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    Variable(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

/// A fully resolved value: [`Value`] with every variable substituted away.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<ConstValue>),
    Object(Vec<(String, ConstValue)>),
}

impl Value {
    /// Resolves all variables of this [`Value`] to their actual `values`,
    /// yielding a [`ConstValue`].
    ///
    /// Referencing a variable that is not present in `values` is an error.
    pub fn into_const(self, values: &Variables) -> FieldResult<ConstValue> {
        Ok(match self {
            Self::Null => ConstValue::Null,
            Self::Int(i) => ConstValue::Int(i),
            Self::Float(f) => ConstValue::Float(f),
            Self::String(s) => ConstValue::String(s),
            Self::Boolean(b) => ConstValue::Boolean(b),
            Self::Enum(e) => ConstValue::Enum(e),
            Self::Variable(name) => match values.get(&name) {
                Some(value) => value.clone(),
                None => return Err(FieldError::from(format!("Missing variable `{name}`"))),
            },
            Self::List(items) => ConstValue::List(
                items
                    .into_iter()
                    .map(|item| item.into_const(values))
                    .collect::<FieldResult<_>>()?,
            ),
            Self::Object(fields) => ConstValue::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| Ok((name, value.into_const(values)?)))
                    .collect::<FieldResult<_>>()?,
            ),
        })
    }

    /// Does the value represent a variable?
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }
}

impl ConstValue {
    /// Does the value represent a `null`?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Shorthand form of invoking [`FromConstValue::from_const_value()`].
    pub fn convert<T: FromConstValue>(&self) -> Option<T> {
        T::from_const_value(self)
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Enum(e) => write!(f, "{e}"),
            Self::List(items) => write!(f, "[{}]", items.iter().format(", ")),
            Self::Object(fields) => write!(
                f,
                "{{{}}}",
                fields
                    .iter()
                    .format_with(", ", |(name, value), g| g(&format_args!("{name}: {value}"))),
            ),
        }
    }
}

/// Conversion of an unstructured [`ConstValue`] into a Rust data type.
///
/// Used to pull coerced argument values out of the executor at the resolver
/// boundary. A shape mismatch yields [`None`].
pub trait FromConstValue: Sized {
    /// Performs the conversion.
    fn from_const_value(value: &ConstValue) -> Option<Self>;
}

impl FromConstValue for ConstValue {
    fn from_const_value(value: &ConstValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromConstValue for i64 {
    fn from_const_value(value: &ConstValue) -> Option<Self> {
        match value {
            ConstValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromConstValue for i32 {
    fn from_const_value(value: &ConstValue) -> Option<Self> {
        match value {
            ConstValue::Int(i) => Self::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl FromConstValue for f64 {
    fn from_const_value(value: &ConstValue) -> Option<Self> {
        match value {
            ConstValue::Int(i) => Some(*i as f64),
            ConstValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl FromConstValue for bool {
    fn from_const_value(value: &ConstValue) -> Option<Self> {
        match value {
            ConstValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromConstValue for String {
    fn from_const_value(value: &ConstValue) -> Option<Self> {
        match value {
            // Enum values surface as their label.
            ConstValue::String(s) | ConstValue::Enum(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl<T: FromConstValue> FromConstValue for Option<T> {
    fn from_const_value(value: &ConstValue) -> Option<Self> {
        match value {
            ConstValue::Null => Some(None),
            other => T::from_const_value(other).map(Some),
        }
    }
}

impl<T: FromConstValue> FromConstValue for Vec<T> {
    fn from_const_value(value: &ConstValue) -> Option<Self> {
        match value {
            ConstValue::List(items) => items.iter().map(T::from_const_value).collect(),
            _ => None,
        }
    }
}

/// A single field selection, possibly aliased and carrying arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// Alias under which the field's value should appear in the response.
    pub alias: Option<String>,
    /// Name of the schema field to resolve.
    pub name: String,
    /// Arguments in source order.
    pub arguments: Vec<(String, Value)>,
    /// Sub-selections for object-valued fields; empty for leaves.
    pub selection_set: Vec<Selection>,
}

impl Field {
    /// The name under which this field's value appears in the response:
    /// the alias if present, the field name otherwise.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// A named fragment spread (`...name`).
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentSpread {
    /// Name of the fragment to splice in.
    pub name: String,
}

/// An inline fragment (`... on Type { ... }`).
#[derive(Clone, Debug, PartialEq)]
pub struct InlineFragment {
    /// Type the fragment applies to; `None` means it always applies.
    pub type_condition: Option<String>,
    /// Selections spliced in when the condition matches.
    pub selection_set: Vec<Selection>,
}

/// Entry in a selection set: a field, a fragment spread, or an inline
/// fragment.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

/// The three GraphQL operation types.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        })
    }
}

/// A single operation of a query document.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    /// Whether this is a query, mutation, or subscription.
    pub operation_type: OperationType,
    /// The top-level selections against the root object.
    pub selection_set: Vec<Selection>,
}

/// A named fragment definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    /// Name the fragment is spread by.
    pub name: String,
    /// Name of the object type the fragment applies to.
    pub type_condition: String,
    /// Selections spliced in when the condition matches.
    pub selection_set: Vec<Selection>,
}

/// Top-level entry of a query document.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    Operation(Operation),
    Fragment(Fragment),
}

/// A parsed query document.
pub type Document = [Definition];

/// An owned [`Document`].
pub type OwnedDocument = Vec<Definition>;
