// Diesel schema for the versioned state table.
// Tabla: state_records (namespace = tabla lógica del store)
diesel::table! {
    state_records (namespace, id, state_type) {
        namespace -> Text,
        id -> Text,
        state_type -> Text,
        version -> BigInt,
        payload -> Text,
        metadata -> Text,
        updated_at_ts -> BigInt,
    }
}
