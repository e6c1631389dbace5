use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Raw SQL keeps this migration stable when the entities change later on.
const CREATE_TYPES: &str = r#"
    CREATE TYPE casework.role AS ENUM ('admin', 'editor', 'viewer');
    CREATE TYPE casework.action_type AS ENUM (
        'open', 'add_note', 'reassign', 'label', 'unlabel', 'close', 'reopen'
    );
"#;

const CREATE_TENANCY_TABLES: &str = r#"
    CREATE TABLE casework.organizations (
        id SERIAL PRIMARY KEY,
        name VARCHAR NOT NULL,
        slug VARCHAR NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );

    CREATE TABLE casework.users (
        id SERIAL PRIMARY KEY,
        email VARCHAR(256) NOT NULL UNIQUE,
        password VARCHAR NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );

    CREATE TABLE casework.profiles (
        id SERIAL PRIMARY KEY,
        user_id INTEGER NOT NULL UNIQUE
            REFERENCES casework.users(id) ON DELETE CASCADE ON UPDATE CASCADE,
        full_name VARCHAR(128) NOT NULL,
        change_password BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );

    CREATE TABLE casework.user_roles (
        id SERIAL PRIMARY KEY,
        role casework.role NOT NULL,
        organization_id INTEGER NOT NULL
            REFERENCES casework.organizations(id) ON DELETE CASCADE ON UPDATE CASCADE,
        user_id INTEGER NOT NULL
            REFERENCES casework.users(id) ON DELETE CASCADE ON UPDATE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );

    CREATE UNIQUE INDEX user_roles_user_org_role_unique
        ON casework.user_roles(user_id, organization_id, role);
"#;

const CREATE_CASEWORK_TABLES: &str = r#"
    CREATE TABLE casework.labels (
        id SERIAL PRIMARY KEY,
        organization_id INTEGER NOT NULL
            REFERENCES casework.organizations(id) ON DELETE CASCADE,
        name VARCHAR NOT NULL,
        description TEXT,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );

    CREATE TABLE casework.partners (
        id SERIAL PRIMARY KEY,
        organization_id INTEGER NOT NULL
            REFERENCES casework.organizations(id) ON DELETE CASCADE,
        name VARCHAR NOT NULL,
        description TEXT,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );

    CREATE TABLE casework.cases (
        id SERIAL PRIMARY KEY,
        organization_id INTEGER NOT NULL
            REFERENCES casework.organizations(id) ON DELETE CASCADE,
        assignee_id INTEGER REFERENCES casework.users(id) ON DELETE SET NULL,
        summary TEXT NOT NULL,
        opened_on TIMESTAMPTZ NOT NULL DEFAULT now(),
        closed_on TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );

    CREATE TABLE casework.cases_labels (
        id SERIAL PRIMARY KEY,
        case_id INTEGER NOT NULL REFERENCES casework.cases(id) ON DELETE CASCADE,
        label_id INTEGER NOT NULL REFERENCES casework.labels(id) ON DELETE CASCADE,
        UNIQUE (case_id, label_id)
    );

    CREATE TABLE casework.actions (
        id SERIAL PRIMARY KEY,
        case_id INTEGER NOT NULL REFERENCES casework.cases(id) ON DELETE CASCADE,
        organization_id INTEGER REFERENCES casework.organizations(id) ON DELETE CASCADE,
        action casework.action_type NOT NULL,
        created_by_id INTEGER NOT NULL REFERENCES casework.users(id),
        created_on TIMESTAMPTZ NOT NULL DEFAULT now(),
        assignee_id INTEGER REFERENCES casework.users(id) ON DELETE SET NULL,
        label_id INTEGER REFERENCES casework.labels(id) ON DELETE SET NULL,
        note TEXT
    );

    CREATE INDEX actions_organization_created_on_idx
        ON casework.actions(organization_id, created_on, id);
    CREATE INDEX cases_organization_opened_on_idx
        ON casework.cases(organization_id, opened_on DESC);
"#;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(CREATE_TYPES).await?;
        db.execute_unprepared(CREATE_TENANCY_TABLES).await?;
        db.execute_unprepared(CREATE_CASEWORK_TABLES).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TABLE IF EXISTS casework.actions;
                DROP TABLE IF EXISTS casework.cases_labels;
                DROP TABLE IF EXISTS casework.cases;
                DROP TABLE IF EXISTS casework.partners;
                DROP TABLE IF EXISTS casework.labels;
                DROP TABLE IF EXISTS casework.user_roles;
                DROP TABLE IF EXISTS casework.profiles;
                DROP TABLE IF EXISTS casework.users;
                DROP TABLE IF EXISTS casework.organizations;
                DROP TYPE IF EXISTS casework.action_type;
                DROP TYPE IF EXISTS casework.role;
                "#,
            )
            .await?;

        Ok(())
    }
}
