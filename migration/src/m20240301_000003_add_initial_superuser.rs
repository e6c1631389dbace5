use chrono::Utc;
use entity_api::RESERVED_USER_ID;
use password_auth::generate_hash;
use sea_orm_migration::sea_orm::{DbBackend, Statement, Value};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const SUPERUSER_EMAIL: &str = "admin@casework.example";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let now = Utc::now();

        // The superuser takes the reserved id so user listings can skip it.
        db.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO casework.users (
                id, email, password, is_active, is_superuser, created_at, updated_at
            ) VALUES ($1, $2, $3, TRUE, TRUE, $4, $5)
            "#,
            vec![
                Value::Int(Some(RESERVED_USER_ID)),
                Value::String(Some(Box::new(SUPERUSER_EMAIL.to_owned()))),
                Value::String(Some(Box::new(generate_hash("password")))),
                Value::ChronoDateTimeUtc(Some(Box::new(now))),
                Value::ChronoDateTimeUtc(Some(Box::new(now))),
            ],
        ))
        .await?;

        db.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO casework.profiles (user_id, full_name, change_password, created_at, updated_at)
            VALUES ($1, 'Administrator', TRUE, $2, $3)
            "#,
            vec![
                Value::Int(Some(RESERVED_USER_ID)),
                Value::ChronoDateTimeUtc(Some(Box::new(now))),
                Value::ChronoDateTimeUtc(Some(Box::new(now))),
            ],
        ))
        .await?;

        // An explicit id does not advance the serial sequence
        db.execute_unprepared(
            "SELECT setval(pg_get_serial_sequence('casework.users', 'id'), \
             (SELECT MAX(id) FROM casework.users));",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "DELETE FROM casework.users WHERE id = $1",
                vec![Value::Int(Some(RESERVED_USER_ID))],
            ))
            .await?;

        Ok(())
    }
}
