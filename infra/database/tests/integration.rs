use trailhub_database::*;

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .init()
        .await
        .expect("connect to mem://");

    // Health should be OK for mem://
    db.health().await.expect("health check");
    assert_eq!(db.namespace(), "test_ns");
    assert_eq!(db.database(), "test_db");
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn malformed_namespace_fails_validation() {
    let err = Database::builder()
        .url("mem://")
        .session("bad ns;", "core")
        .init()
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn schema_scripts_are_applied() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .schema("DEFINE TABLE IF NOT EXISTS smoke SCHEMALESS;")
        .init()
        .await
        .expect("connect with schema");

    db.query("CREATE smoke SET marker = true")
        .await
        .expect("insert into bootstrapped table")
        .check()
        .expect("statement should succeed");
}

#[tokio::test]
async fn broken_schema_script_is_rejected() {
    let err = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .schema("DEFINE GIBBERISH;")
        .init()
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Schema { .. } | DatabaseError::Surreal { .. }));
}
