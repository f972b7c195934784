use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS analysis_history (
        id               UUID PRIMARY KEY,
        job_title        TEXT,
        company_name     TEXT,
        resume_text      TEXT NOT NULL,
        job_description  TEXT NOT NULL,
        overall_score    DOUBLE PRECISION NOT NULL,
        skills_score     DOUBLE PRECISION NOT NULL DEFAULT 0,
        experience_score DOUBLE PRECISION NOT NULL DEFAULT 0,
        education_score  DOUBLE PRECISION NOT NULL DEFAULT 0,
        matched_skills   TEXT[] NOT NULL DEFAULT '{}',
        missing_skills   TEXT[] NOT NULL DEFAULT '{}',
        suggestions      TEXT[] NOT NULL DEFAULT '{}',
        ats_tips         TEXT[] NOT NULL DEFAULT '{}',
        summary          TEXT NOT NULL DEFAULT '',
        created_at       TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS analysis_history_created_at_idx ON analysis_history (created_at DESC)",
];

/// Creates the history table if it does not exist yet. Safe to run on every start.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}
