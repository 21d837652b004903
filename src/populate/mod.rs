//! Interactive construction of model instances, one prompted line per field.

pub mod source;

pub use source::{ConsoleSource, LineSource, ScriptedSource};

use crate::core::{DaoError, DataType, Result, Value};
use crate::model::{EntityMetadata, FieldDescriptor, Model};
use tracing::debug;

/// Parses one line of user input into a value of `kind`.
///
/// Numbers and booleans ignore surrounding whitespace; booleans accept `true`/`false` in any
/// case. Text is taken verbatim. Empty input is never NULL here; see [`coerce_field`].
pub fn coerce(input: &str, kind: DataType) -> Result<Value> {
    let trimmed = input.trim();
    let invalid = || DaoError::InputError(format!("'{}' is not a valid {}", input, kind));

    match kind {
        DataType::Integer => trimmed.parse::<i64>().map(Value::Integer).map_err(|_| invalid()),
        DataType::Float => trimmed.parse::<f64>().map(Value::Float).map_err(|_| invalid()),
        DataType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(invalid()),
        },
        DataType::Text => Ok(Value::Text(input.to_string())),
    }
}

/// Like [`coerce`], but a blank line sets a nullable field to `Value::Null`.
pub fn coerce_field(input: &str, field: &FieldDescriptor) -> Result<Value> {
    if field.nullable && input.trim().is_empty() {
        return Ok(Value::Null);
    }
    coerce(input, field.kind)
}

pub fn prompt_for(field: &FieldDescriptor) -> String {
    format!("Enter value for {} ({}): ", field.name, field.kind)
}

/// Fills model instances from a [`LineSource`].
pub struct Populator<'a, L: LineSource + ?Sized> {
    source: &'a mut L,
}

impl<'a, L: LineSource + ?Sized> Populator<'a, L> {
    pub fn new(source: &'a mut L) -> Self {
        Self { source }
    }

    /// Default instance with every field read from input, in declaration order.
    pub fn populate_all<M: Model>(&mut self) -> Result<M> {
        let indices: Vec<usize> = (0..M::fields().len()).collect();
        self.populate::<M>(&indices)
    }

    /// Default instance with only the primary-key fields read from input.
    pub fn populate_keys_only<M: Model>(&mut self) -> Result<M> {
        let indices = EntityMetadata::of::<M>().primary_key_indices()?;
        self.populate::<M>(&indices)
    }

    fn populate<M: Model>(&mut self, indices: &[usize]) -> Result<M> {
        let mut instance = M::default();
        let fields = M::fields();

        for &idx in indices {
            let field = fields.get(idx).ok_or_else(|| {
                DaoError::InputError(format!("{} has no field at index {}", M::model_name(), idx))
            })?;

            let Some(line) = self.source.read_line(&prompt_for(field))? else {
                return Err(DaoError::InputError(format!(
                    "Input ended before a value for '{}' was read",
                    field.name
                )));
            };

            let value = coerce_field(&line, field).map_err(|err| with_field(err, field.name))?;
            debug!(model = M::model_name(), field = field.name, value = %value, "field populated");
            instance
                .set(idx, value)
                .map_err(|err| with_field(err, field.name))?;
        }

        Ok(instance)
    }
}

fn with_field(err: DaoError, field: &str) -> DaoError {
    match err {
        DaoError::InputError(msg) => DaoError::InputError(format!("{}: {}", field, msg)),
        other => other,
    }
}
