use crate::core::{DaoError, DataType, Result, Value};

/// Conversion between a Rust field type and the engine's [`Value`].
///
/// `KIND` is the declared kind reported in the field descriptor. `Option<T>` maps `None` to
/// `Value::Null`, carries the kind of `T` and is the only `NULLABLE` field type.
pub trait FieldType: Sized {
    const KIND: DataType;

    const NULLABLE: bool = false;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: DataType, value: &Value) -> DaoError {
    DaoError::InputError(format!(
        "Expected {} value, got {}",
        expected,
        value.type_name()
    ))
}

macro_rules! integer_field_type {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldType for $ty {
                const KIND: DataType = DataType::Integer;

                fn to_value(&self) -> Value {
                    Value::Integer(*self as i64)
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Integer(i) => <$ty>::try_from(i).map_err(|_| {
                            DaoError::InputError(format!(
                                "Integer {} out of range for {}",
                                i,
                                stringify!($ty)
                            ))
                        }),
                        other => Err(mismatch(DataType::Integer, &other)),
                    }
                }
            }
        )*
    };
}

integer_field_type!(i8, i16, i32, i64, isize, u8, u16, u32);

impl FieldType for f64 {
    const KIND: DataType = DataType::Float;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Integer(i) => Ok(i as f64),
            other => Err(mismatch(DataType::Float, &other)),
        }
    }
}

impl FieldType for f32 {
    const KIND: DataType = DataType::Float;

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl FieldType for bool {
    const KIND: DataType = DataType::Boolean;

    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(mismatch(DataType::Boolean, &other)),
        }
    }
}

impl FieldType for String {
    const KIND: DataType = DataType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch(DataType::Text, &other)),
        }
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const KIND: DataType = T::KIND;

    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
