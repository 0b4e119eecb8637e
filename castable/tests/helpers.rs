use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

const CREATE_TEST_MODEL: &str = "CREATE TABLE test_model (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    field_1 TEXT NULL,
    field_2 REAL NULL,
    field_3 TEXT NULL,
    field_4 TEXT NULL,
    field_5 TEXT NULL,
    field_6 TEXT NULL
)";

#[cfg(test)]
#[allow(dead_code)]
pub async fn setup_test_db() -> DatabaseConnection {
    let _ = env_logger::builder().is_test(true).try_init();

    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.execute_unprepared(CREATE_TEST_MODEL).await.unwrap();
    db
}
