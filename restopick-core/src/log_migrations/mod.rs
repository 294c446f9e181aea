//! Schema of logs.duckdb, as ordered SQL scripts baked in with `include_str!`

/// `(name, sql)` pairs, applied in order and recorded in `sys_migrations`.
///
/// `000` creates the bookkeeping table itself and must stay first.
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_initial_schema.sql", include_str!("001_initial_schema.sql")),
];
