use super::{FieldDescriptor, Model, PrimaryKeySet};
use crate::core::{DaoError, Result, Value};

/// Resolved metadata of one entity type: table name plus ordered field descriptors.
///
/// Resolution itself never fails. A type without primary-key fields is only rejected when key
/// metadata is actually needed ([`EntityMetadata::primary_keys`] and everything built on it).
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMetadata {
    table: String,
    fields: Vec<FieldDescriptor>,
}

impl EntityMetadata {
    pub fn new(table: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            table: table.into(),
            fields,
        }
    }

    pub fn of<M: Model>() -> Self {
        Self::new(M::table_name(), M::fields().to_vec())
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Indices of the primary-key fields, in declaration order.
    pub fn primary_key_indices(&self) -> Result<Vec<usize>> {
        let indices: Vec<usize> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.primary_key)
            .map(|(idx, _)| idx)
            .collect();

        if indices.is_empty() {
            return Err(DaoError::ConfigurationError(format!(
                "Model '{}' does not have fields marked as primary key",
                self.table
            )));
        }

        Ok(indices)
    }

    pub fn primary_keys(&self) -> Result<Vec<&FieldDescriptor>> {
        Ok(self
            .primary_key_indices()?
            .into_iter()
            .map(|idx| &self.fields[idx])
            .collect())
    }

    /// Fields not marked as primary key, in declaration order.
    pub fn value_fields(&self) -> Vec<&FieldDescriptor> {
        self.fields.iter().filter(|field| !field.primary_key).collect()
    }

    /// Reads the primary key set out of a full value row (one value per field).
    pub fn primary_key_set(&self, values: &[Value]) -> Result<PrimaryKeySet> {
        self.check_arity(values)?;
        let mut keys = PrimaryKeySet::new();
        for idx in self.primary_key_indices()? {
            keys.insert(self.fields[idx].name, values[idx].clone());
        }
        Ok(keys)
    }

    pub(crate) fn check_arity(&self, values: &[Value]) -> Result<()> {
        if values.len() != self.fields.len() {
            return Err(DaoError::ConfigurationError(format!(
                "Model '{}' declares {} fields but {} values were supplied",
                self.table,
                self.fields.len(),
                values.len()
            )));
        }
        Ok(())
    }
}

pub fn resolve<M: Model>() -> EntityMetadata {
    EntityMetadata::of::<M>()
}

pub fn primary_key_set<M: Model>(instance: &M) -> Result<PrimaryKeySet> {
    resolve::<M>().primary_key_set(&instance.values())
}

/// Two instances denote the same row iff their primary key sets are equal.
pub fn same_row<M: Model>(a: &M, b: &M) -> Result<bool> {
    Ok(primary_key_set(a)? == primary_key_set(b)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;

    fn routes() -> EntityMetadata {
        EntityMetadata::new(
            "routes",
            vec![
                FieldDescriptor::new("register", DataType::Text, true),
                FieldDescriptor::new("num_driver", DataType::Integer, true),
                FieldDescriptor::new("id_place", DataType::Integer, true),
                FieldDescriptor::new("day_week", DataType::Text, false),
            ],
        )
    }

    #[test]
    fn test_partition_keeps_declaration_order() {
        let meta = routes();
        let keys: Vec<_> = meta.primary_keys().unwrap().iter().map(|f| f.name).collect();
        assert_eq!(keys, vec!["register", "num_driver", "id_place"]);
        let values: Vec<_> = meta.value_fields().iter().map(|f| f.name).collect();
        assert_eq!(values, vec!["day_week"]);
    }

    #[test]
    fn test_primary_key_set_reads_current_values() {
        let meta = routes();
        let row = vec![
            Value::from("B-1"),
            Value::Integer(7),
            Value::Integer(3),
            Value::from("monday"),
        ];
        let keys = meta.primary_key_set(&row).unwrap();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys.get("num_driver"), Some(&Value::Integer(7)));
        assert_eq!(keys.get("day_week"), None);
    }

    #[test]
    fn test_missing_primary_key_is_lazy() {
        let meta = EntityMetadata::new(
            "log",
            vec![FieldDescriptor::new("line", DataType::Text, false)],
        );
        assert_eq!(meta.field_count(), 1);
        assert!(matches!(
            meta.primary_keys(),
            Err(DaoError::ConfigurationError(_))
        ));
        assert!(matches!(
            meta.primary_key_set(&[Value::from("x")]),
            Err(DaoError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_arity_mismatch_is_rejected() {
        assert!(matches!(
            routes().primary_key_set(&[Value::Null]),
            Err(DaoError::ConfigurationError(_))
        ));
    }
}
