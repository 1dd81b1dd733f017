use sqlx::PgPool;

/// Every `id` column is a bigint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint");
    }
}

/// Every table has timestamptz `created_at`/`updated_at` and an updated_at trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_tables_have_timestamps_and_trigger(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        for col in ["created_at", "updated_at"] {
            let data_type: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public' AND table_name = $1 AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();
            assert_eq!(
                data_type.map(|r| r.0).as_deref(),
                Some("timestamp with time zone"),
                "{table}.{col} should be timestamptz"
            );
        }

        let trigger: Option<(String,)> = sqlx::query_as(
            "SELECT trigger_name
             FROM information_schema.triggers
             WHERE event_object_table = $1 AND trigger_name = $2",
        )
        .bind(table)
        .bind(format!("trg_{table}_updated_at"))
        .fetch_optional(&pool)
        .await
        .unwrap();
        assert!(trigger.is_some(), "{table} is missing its updated_at trigger");
    }
}

/// Unique constraints follow the `uq_` prefix so the API can map them to 409.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_constraints_are_prefixed(pool: PgPool) {
    let names: Vec<(String,)> = sqlx::query_as(
        "SELECT constraint_name
         FROM information_schema.table_constraints
         WHERE table_schema = 'public' AND constraint_type = 'UNIQUE'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!names.is_empty());
    for (name,) in &names {
        assert!(name.starts_with("uq_"), "unique constraint {name} lacks uq_ prefix");
    }
}
