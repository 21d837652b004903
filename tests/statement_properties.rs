//! Property tests for statement synthesis and bind order over arbitrary entity metadata.

use modeldao::statement::{self, StatementKind};
use modeldao::{DaoError, DataType, EntityMetadata, FieldDescriptor, Value};
use proptest::prelude::*;

const NAMES: [&str; 8] = [
    "register", "licence", "numDriver", "name", "surname", "idPlace", "city", "dayWeek",
];

fn arb_kind() -> impl Strategy<Value = DataType> {
    prop_oneof![
        Just(DataType::Integer),
        Just(DataType::Float),
        Just(DataType::Boolean),
        Just(DataType::Text),
    ]
}

fn arb_metadata() -> impl Strategy<Value = EntityMetadata> {
    prop::collection::vec((arb_kind(), any::<bool>()), 1..=NAMES.len()).prop_map(|specs| {
        let fields = specs
            .into_iter()
            .zip(NAMES)
            .map(|((kind, primary_key), name)| FieldDescriptor::new(name, kind, primary_key))
            .collect();
        EntityMetadata::new("entity", fields)
    })
}

/// Metadata with at least one key field and one value field.
fn arb_keyed_metadata() -> impl Strategy<Value = EntityMetadata> {
    arb_metadata().prop_filter("needs key and value fields", |meta| {
        meta.primary_key_indices().is_ok() && !meta.value_fields().is_empty()
    })
}

/// One distinct value per field, so positions can be traced through the bind order.
fn row_for(meta: &EntityMetadata) -> Vec<Value> {
    (0..meta.field_count())
        .map(|idx| Value::Integer(idx as i64 * 10))
        .collect()
}

fn key_values(meta: &EntityMetadata, row: &[Value]) -> Vec<Value> {
    meta.primary_key_indices()
        .unwrap()
        .into_iter()
        .map(|idx| row[idx].clone())
        .collect()
}

fn where_terms(sql: &str) -> Vec<String> {
    sql.split(" WHERE ")
        .nth(1)
        .map(|clause| clause.split(" AND ").map(str::to_string).collect())
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn insert_columns_placeholders_and_binds_line_up(meta in arb_keyed_metadata()) {
        let stmt = statement::build_insert(&meta).unwrap();
        let sql = stmt.sql();

        let open = sql.find('(').unwrap();
        let close = sql.find(')').unwrap();
        let columns: Vec<&str> = sql[open + 1..close].split(',').collect();
        let marks = sql.matches('?').count();

        prop_assert_eq!(columns.len(), meta.field_count());
        prop_assert_eq!(marks, meta.field_count());

        let row = row_for(&meta);
        let binds = statement::bind_order(StatementKind::Insert, &meta, &row).unwrap();
        prop_assert_eq!(binds, row);
    }

    #[test]
    fn update_sets_every_field_and_repeats_keys(meta in arb_keyed_metadata()) {
        let stmt = statement::build_update(&meta).unwrap();
        let sql = stmt.sql();
        let keys = meta.primary_key_indices().unwrap().len();

        let set_clause = sql
            .split(" SET ")
            .nth(1)
            .and_then(|rest| rest.split(" WHERE ").next())
            .unwrap();
        prop_assert_eq!(set_clause.split(", ").count(), meta.field_count());
        prop_assert_eq!(where_terms(sql).len(), keys);

        let row = row_for(&meta);
        let binds = statement::bind_order(StatementKind::Update, &meta, &row).unwrap();
        prop_assert_eq!(binds.len(), meta.field_count() + keys);
        prop_assert_eq!(&binds[..meta.field_count()], &row[..]);
        prop_assert_eq!(binds[meta.field_count()..].to_vec(), key_values(&meta, &row));
    }

    #[test]
    fn key_filters_have_one_term_per_key(meta in arb_keyed_metadata()) {
        let row = row_for(&meta);
        let keys = key_values(&meta, &row);

        for kind in [StatementKind::Delete, StatementKind::SelectByKey] {
            let stmt = statement::build(kind, &meta).unwrap();
            let sql = stmt.sql();
            let terms = where_terms(sql);

            prop_assert_eq!(terms.len(), keys.len());
            prop_assert!(terms.iter().all(|term| term.ends_with(" = ?")));
            prop_assert!(!sql.trim_end().ends_with("AND"));
            prop_assert_eq!(statement::bind_order(kind, &meta, &row).unwrap(), keys.clone());
        }
    }

    #[test]
    fn delete_all_is_unconditional(meta in arb_metadata()) {
        let stmt = statement::build(StatementKind::DeleteAll, &meta).unwrap();
        prop_assert!(!stmt.sql().contains("WHERE"));
        prop_assert_eq!(stmt.sql(), "DELETE FROM entity");
        prop_assert!(statement::bind_order(StatementKind::DeleteAll, &meta, &row_for(&meta)).unwrap().is_empty());
    }

    #[test]
    fn missing_keys_fail_only_key_dependent_kinds(
        kinds in prop::collection::vec(arb_kind(), 1..=NAMES.len())
    ) {
        let fields = kinds
            .into_iter()
            .zip(NAMES)
            .map(|(kind, name)| FieldDescriptor::new(name, kind, false))
            .collect();
        let meta = EntityMetadata::new("entity", fields);
        let row = row_for(&meta);

        prop_assert!(statement::build_insert(&meta).is_ok());
        prop_assert!(statement::build(StatementKind::DeleteAll, &meta).is_ok());
        for kind in [StatementKind::Update, StatementKind::Delete, StatementKind::SelectByKey] {
            prop_assert!(matches!(statement::build(kind, &meta), Err(DaoError::ConfigurationError(_))));
        }
        prop_assert!(matches!(meta.primary_key_set(&row), Err(DaoError::ConfigurationError(_))));
    }

    #[test]
    fn building_and_binding_are_pure(meta in arb_keyed_metadata()) {
        let row = row_for(&meta);
        for kind in [
            StatementKind::Insert,
            StatementKind::Update,
            StatementKind::Delete,
            StatementKind::DeleteAll,
            StatementKind::SelectByKey,
            StatementKind::SelectAll,
        ] {
            prop_assert_eq!(statement::build(kind, &meta).unwrap(), statement::build(kind, &meta).unwrap());
            prop_assert_eq!(
                statement::bind_order(kind, &meta, &row).unwrap(),
                statement::bind_order(kind, &meta, &row).unwrap()
            );
        }
    }
}
