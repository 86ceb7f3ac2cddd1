//! Argument coercion: from parsed key/value pairs and variables to the
//! typed values a resolver expects.

use indexmap::IndexMap;

use crate::{
    ast::{self, ConstValue, FromConstValue},
    executor::{FieldResult, Variables},
    schema::input::{Argument, InputType},
};

/// Coerced argument container handed to resolvers.
///
/// Every declared argument is present, in declaration order; absent nullable
/// arguments appear as `null` unless they declare a default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments {
    values: IndexMap<String, ConstValue>,
}

impl Arguments {
    /// Gets an argument and converts it into the desired type.
    ///
    /// Returns [`Some`] if the argument is present _and_ the conversion
    /// succeeds.
    pub fn get<T: FromConstValue>(&self, name: &str) -> Option<T> {
        self.values.get(name).and_then(T::from_const_value)
    }

    /// Gets the raw coerced value of an argument.
    pub fn get_value(&self, name: &str) -> Option<&ConstValue> {
        self.values.get(name)
    }
}

/// Walks the declared argument list in order, substituting variables,
/// evaluating each supplied value against its input type, and applying
/// declared defaults to absent values.
pub(crate) fn coerce_arguments(
    declared: &[Argument],
    provided: &[(String, ast::Value)],
    variables: &Variables,
) -> FieldResult<Arguments> {
    let mut values = IndexMap::with_capacity(declared.len());
    for argument in declared {
        let supplied = provided
            .iter()
            .find(|(name, _)| name.as_str() == argument.name.as_str())
            .map(|(_, value)| value.clone().into_const(variables))
            .transpose()?;
        let coerced = eval_arg(&argument.ty, supplied)?;
        values.insert(
            argument.name.to_string(),
            apply_default(coerced, argument.default.as_ref()),
        );
    }
    Ok(Arguments { values })
}

fn apply_default(coerced: Option<ConstValue>, default: Option<&ConstValue>) -> ConstValue {
    match (coerced, default) {
        (Some(value), _) => value,
        (None, Some(default)) => default.clone(),
        (None, None) => ConstValue::Null,
    }
}

/// Evaluates a single supplied value against an input type.
///
/// `Ok(None)` means "legitimately absent": the value was missing or `null`
/// and the type permits that.
fn eval_arg(ty: &InputType, value: Option<ConstValue>) -> FieldResult<Option<ConstValue>> {
    if let InputType::NonNull(inner) = ty {
        return match value {
            None | Some(ConstValue::Null) => Err("Missing required argument".into()),
            Some(value) => match eval_arg(inner, Some(value))? {
                Some(value) => Ok(Some(value)),
                None => Err("Missing required argument".into()),
            },
        };
    }

    let value = match value {
        None | Some(ConstValue::Null) => return Ok(None),
        Some(value) => value,
    };

    match ty {
        InputType::Scalar(scalar) => (scalar.coerce)(&value).map(Some),
        InputType::Enum(en) => match value {
            ConstValue::Enum(label) | ConstValue::String(label) => {
                if en.has_value(&label) {
                    Ok(Some(ConstValue::Enum(label)))
                } else {
                    Err("Invalid enum value".into())
                }
            }
            _ => Err("Expected enum".into()),
        },
        InputType::Object(object) => match value {
            ConstValue::Object(props) => {
                let mut fields = Vec::with_capacity(object.fields.len());
                for field in &object.fields {
                    let supplied = props
                        .iter()
                        .find(|(name, _)| name.as_str() == field.name.as_str())
                        .map(|(_, value)| value.clone());
                    let coerced = eval_arg(&field.ty, supplied)?;
                    fields.push((
                        field.name.to_string(),
                        apply_default(coerced, field.default.as_ref()),
                    ));
                }
                Ok(Some(ConstValue::Object(fields)))
            }
            _ => Err("Expected object".into()),
        },
        InputType::List(inner) => match value {
            ConstValue::List(items) => {
                let coerced = items
                    .into_iter()
                    .map(|item| {
                        eval_arg(inner, Some(item)).map(|value| value.unwrap_or(ConstValue::Null))
                    })
                    .collect::<FieldResult<Vec<_>>>()?;
                Ok(Some(ConstValue::List(coerced)))
            }
            // A single value where a list is expected coerces to a
            // singleton list.
            single => {
                let coerced = eval_arg(inner, Some(single))?.unwrap_or(ConstValue::Null);
                Ok(Some(ConstValue::List(vec![coerced])))
            }
        },
        InputType::NonNull(_) => unreachable!("handled above"),
    }
}
