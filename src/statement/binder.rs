use super::StatementKind;
use crate::core::{Result, Value};
use crate::model::{EntityMetadata, Model};

/// Ordered bind values for `kind`, given one value per declared field.
///
/// Values pass through untouched: no coercion and no null checks happen here.
pub fn bind_order(kind: StatementKind, meta: &EntityMetadata, values: &[Value]) -> Result<Vec<Value>> {
    meta.check_arity(values)?;

    let params = match kind {
        StatementKind::Insert => values.to_vec(),
        StatementKind::Update => {
            let mut params = values.to_vec();
            params.extend(key_values(meta, values)?);
            params
        }
        StatementKind::Delete | StatementKind::SelectByKey => key_values(meta, values)?,
        StatementKind::DeleteAll | StatementKind::SelectAll => Vec::new(),
    };

    Ok(params)
}

pub fn bind_model<M: Model>(kind: StatementKind, instance: &M) -> Result<Vec<Value>> {
    bind_order(kind, &EntityMetadata::of::<M>(), &instance.values())
}

fn key_values(meta: &EntityMetadata, values: &[Value]) -> Result<Vec<Value>> {
    Ok(meta
        .primary_key_indices()?
        .into_iter()
        .map(|idx| values[idx].clone())
        .collect())
}
