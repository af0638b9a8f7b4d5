//! Identity property: diffing a schema against itself is always empty.

#[path = "support/schema_fixtures.rs"]
mod schema_fixtures;

use ddlsync_core::Mode;
use schema_fixtures::plan;

const MYSQL_SCHEMA: &str = "CREATE TABLE users (
        id bigint unsigned NOT NULL AUTO_INCREMENT,
        email varchar(255) NOT NULL,
        created_at timestamp NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (id),
        UNIQUE KEY uq_email (email)
    );
    CREATE TABLE posts (
        id bigint unsigned NOT NULL AUTO_INCREMENT,
        user_id bigint unsigned NOT NULL,
        title varchar(200) NOT NULL,
        PRIMARY KEY (id),
        INDEX idx_user (user_id),
        CONSTRAINT fk_posts_user FOREIGN KEY (user_id) REFERENCES users (id)
    );
    CREATE VIEW recent_posts AS SELECT id, title FROM posts;";

const POSTGRES_SCHEMA: &str = "CREATE TYPE status AS ENUM ('draft', 'published');
    CREATE TABLE authors (
        id bigint GENERATED ALWAYS AS IDENTITY,
        name varchar(100) NOT NULL,
        joined timestamp with time zone DEFAULT now()
    );
    CREATE INDEX idx_authors_name ON authors (name);
    CREATE VIEW author_names AS SELECT name FROM authors;";

const MSSQL_SCHEMA: &str = "CREATE TABLE [dbo].[accounts] (
        [id] int IDENTITY(1,1) NOT NULL,
        [balance] int NOT NULL CONSTRAINT DF_accounts_balance DEFAULT 0,
        CONSTRAINT PK_accounts PRIMARY KEY CLUSTERED ([id])
    );
    CREATE INDEX idx_balance ON [dbo].[accounts] ([balance]);";

#[test]
fn mysql_self_diff_is_empty() {
    assert!(plan(Mode::Mysql, MYSQL_SCHEMA, MYSQL_SCHEMA).is_empty());
}

#[test]
fn postgres_self_diff_is_empty() {
    assert!(plan(Mode::Postgres, POSTGRES_SCHEMA, POSTGRES_SCHEMA).is_empty());
}

#[test]
fn mssql_self_diff_is_empty() {
    assert!(plan(Mode::Mssql, MSSQL_SCHEMA, MSSQL_SCHEMA).is_empty());
}

#[test]
fn empty_schemas_diff_to_nothing() {
    for mode in Mode::ALL {
        assert!(plan(mode, "", "").is_empty());
    }
}
