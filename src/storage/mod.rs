use anyhow::{Context as _, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};
use uuid::Uuid;

/// Default timeout for individual SQLite queries.
/// Prevents hung queries from blocking the service indefinitely.
const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Execute a future with the standard query timeout.
async fn with_timeout<T>(fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "database query timed out after {}s",
            QUERY_TIMEOUT.as_secs()
        )),
    }
}

// ─── Row types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nationality: Option<String>,
    pub current_country: Option<String>,
    /// ISO date `YYYY-MM-DD`. NULL when the user has not provided it.
    pub birth_date: Option<String>,
    pub email_verified: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthTokenRow {
    pub token: String,
    pub user_id: String,
    /// `session` | `verify` | `reset`
    pub purpose: String,
    pub created_at: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: String,
    pub user_id: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationRow {
    pub id: String,
    pub profile_id: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub institution: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRow {
    pub id: String,
    pub profile_id: String,
    pub job_title: String,
    pub company: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageRow {
    pub id: String,
    pub profile_id: String,
    /// Language code, e.g. `FRENCH`, `ENGLISH`, `GERMAN`.
    pub language: String,
    /// CEFR level: `A1`..`C2`.
    pub level: String,
    pub has_certificate: bool,
    pub certificate_name: Option<String>,
    pub certificate_score: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRow {
    pub id: String,
    pub user_id: String,
    /// `IN_PROGRESS` | `COMPLETED`
    pub status: String,
    pub ai_analysis: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRow {
    pub id: String,
    pub analysis_id: String,
    pub country: String,
    pub visa_type: String,
    /// Integer score, clamped to [0, 100] before insert.
    pub score: i64,
    pub reasoning: Option<String>,
    /// JSON array of requirement strings.
    pub requirements: String,
    pub estimated_duration: Option<String>,
    pub estimated_cost: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRow {
    pub id: String,
    pub user_id: String,
    pub country: String,
    pub visa_type: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStepRow {
    pub id: String,
    pub case_id: String,
    pub step_number: i64,
    pub title: String,
    pub description: Option<String>,
    /// `NOT_STARTED` | `IN_PROGRESS` | `PENDING_VALIDATION` | `COMPLETED` | `BLOCKED`
    pub status: String,
    pub requires_proof: bool,
    /// `SCREENSHOT` | `DOCUMENT` | `CERTIFICATE`, NULL when no proof is needed.
    pub proof_type: Option<String>,
    pub proof_url: Option<String>,
    pub proof_notes: Option<String>,
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemplateRow {
    pub id: String,
    pub country: String,
    pub visa_type: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemplateStepRow {
    pub id: String,
    pub template_id: String,
    pub step_number: i64,
    pub title: String,
    pub description: Option<String>,
    pub requires_proof: bool,
    pub proof_type: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    pub id: String,
    pub user_id: String,
    pub file_name: String,
    pub doc_type: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub created_at: String,
}

/// Fields of a case step the state machine is allowed to change in one
/// transition. `None` leaves the column untouched; `completed_at` and the
/// proof columns use explicit set/clear semantics so a reopen can null them.
#[derive(Debug, Clone, Default)]
pub struct CaseStepUpdate {
    pub status: Option<String>,
    pub proof_url: Option<Option<String>>,
    pub proof_notes: Option<Option<String>>,
    pub completed_at: Option<Option<String>>,
}

// ─── Storage ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        Self::new_with_slow_query(data_dir, 0).await
    }

    /// Create storage with slow-query logging enabled.
    ///
    /// `slow_query_ms` is the threshold in milliseconds — queries exceeding it
    /// are logged at WARN level. Set to 0 to disable slow-query logging.
    pub async fn new_with_slow_query(data_dir: &Path, slow_query_ms: u64) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("visad.db");
        let mut opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        if slow_query_ms > 0 {
            use sqlx::ConnectOptions as _;
            opts = opts.log_slow_statements(
                log::LevelFilter::Warn,
                std::time::Duration::from_millis(slow_query_ms),
            );
        }

        let pool = SqlitePool::connect_with(opts).await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Return a clone of the connection pool (cheap — Arc-backed).
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        // Idempotent bootstrap. SQLite has no CREATE-or-ALTER, so the schema
        // is expressed as CREATE TABLE IF NOT EXISTS statements executed on
        // every start.
        let stmts = [
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                salt TEXT NOT NULL,
                first_name TEXT,
                last_name TEXT,
                nationality TEXT,
                current_country TEXT,
                birth_date TEXT,
                email_verified INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS auth_tokens (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                purpose TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL UNIQUE,
                phone TEXT,
                address TEXT,
                bio TEXT
            )",
            "CREATE TABLE IF NOT EXISTS education (
                id TEXT PRIMARY KEY,
                profile_id TEXT NOT NULL,
                degree TEXT NOT NULL,
                field_of_study TEXT,
                institution TEXT,
                country TEXT,
                start_date TEXT,
                end_date TEXT
            )",
            "CREATE TABLE IF NOT EXISTS work_experience (
                id TEXT PRIMARY KEY,
                profile_id TEXT NOT NULL,
                job_title TEXT NOT NULL,
                company TEXT,
                country TEXT,
                start_date TEXT,
                end_date TEXT
            )",
            "CREATE TABLE IF NOT EXISTS languages (
                id TEXT PRIMARY KEY,
                profile_id TEXT NOT NULL,
                language TEXT NOT NULL,
                level TEXT NOT NULL,
                has_certificate INTEGER NOT NULL DEFAULT 0,
                certificate_name TEXT,
                certificate_score TEXT
            )",
            "CREATE TABLE IF NOT EXISTS analyses (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                status TEXT NOT NULL,
                ai_analysis TEXT,
                created_at TEXT NOT NULL,
                completed_at TEXT
            )",
            "CREATE TABLE IF NOT EXISTS recommendations (
                id TEXT PRIMARY KEY,
                analysis_id TEXT NOT NULL,
                country TEXT NOT NULL,
                visa_type TEXT NOT NULL,
                score INTEGER NOT NULL,
                reasoning TEXT,
                requirements TEXT NOT NULL DEFAULT '[]',
                estimated_duration TEXT,
                estimated_cost TEXT
            )",
            "CREATE TABLE IF NOT EXISTS cases (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                country TEXT NOT NULL,
                visa_type TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'PENDING',
                created_at TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS case_steps (
                id TEXT PRIMARY KEY,
                case_id TEXT NOT NULL,
                step_number INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'NOT_STARTED',
                requires_proof INTEGER NOT NULL DEFAULT 0,
                proof_type TEXT,
                proof_url TEXT,
                proof_notes TEXT,
                completed_at TEXT
            )",
            "CREATE TABLE IF NOT EXISTS procedure_templates (
                id TEXT PRIMARY KEY,
                country TEXT NOT NULL,
                visa_type TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1
            )",
            "CREATE TABLE IF NOT EXISTS template_steps (
                id TEXT PRIMARY KEY,
                template_id TEXT NOT NULL,
                step_number INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                requires_proof INTEGER NOT NULL DEFAULT 0,
                proof_type TEXT
            )",
            "CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                file_name TEXT NOT NULL,
                doc_type TEXT,
                description TEXT,
                url TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_case_steps_case ON case_steps(case_id, step_number)",
            "CREATE INDEX IF NOT EXISTS idx_recommendations_analysis ON recommendations(analysis_id)",
            "CREATE INDEX IF NOT EXISTS idx_auth_tokens_user ON auth_tokens(user_id, purpose)",
        ];
        for stmt in stmts {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .context("Failed to run database bootstrap")?;
        }
        Ok(())
    }

    // ─── Users ───────────────────────────────────────────────────────────────

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        salt: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<UserRow> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, salt, first_name, last_name, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(email)
        .bind(password_hash)
        .bind(salt)
        .bind(first_name)
        .bind(last_name)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        self.get_user(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user not found after insert"))
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<UserRow>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn set_email_verified(&self, user_id: &str) -> Result<()> {
        sqlx::query("UPDATE users SET email_verified = 1 WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn update_password(
        &self,
        user_id: &str,
        password_hash: &str,
        salt: &str,
    ) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = ?, salt = ? WHERE id = ?")
            .bind(password_hash)
            .bind(salt)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_user_identity(
        &self,
        user_id: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        nationality: Option<&str>,
        current_country: Option<&str>,
        birth_date: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE users SET
                first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name),
                nationality = COALESCE(?, nationality),
                current_country = COALESCE(?, current_country),
                birth_date = COALESCE(?, birth_date)
             WHERE id = ?",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(nationality)
        .bind(current_country)
        .bind(birth_date)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ─── Auth tokens ─────────────────────────────────────────────────────────

    pub async fn insert_token(
        &self,
        token: &str,
        user_id: &str,
        purpose: &str,
        expires_at: &str,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO auth_tokens (token, user_id, purpose, created_at, expires_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(token)
        .bind(user_id)
        .bind(purpose)
        .bind(&now)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Look up a live token. Expired tokens are treated as absent.
    pub async fn get_token(&self, token: &str, purpose: &str) -> Result<Option<AuthTokenRow>> {
        let now = Utc::now().to_rfc3339();
        Ok(sqlx::query_as(
            "SELECT * FROM auth_tokens WHERE token = ? AND purpose = ? AND expires_at > ?",
        )
        .bind(token)
        .bind(purpose)
        .bind(&now)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub async fn delete_token(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM auth_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete_tokens_for(&self, user_id: &str, purpose: &str) -> Result<()> {
        sqlx::query("DELETE FROM auth_tokens WHERE user_id = ? AND purpose = ?")
            .bind(user_id)
            .bind(purpose)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ─── Profiles ────────────────────────────────────────────────────────────

    pub async fn get_profile_by_user(&self, user_id: &str) -> Result<Option<ProfileRow>> {
        Ok(sqlx::query_as("SELECT * FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn get_or_create_profile(&self, user_id: &str) -> Result<ProfileRow> {
        if let Some(profile) = self.get_profile_by_user(user_id).await? {
            return Ok(profile);
        }
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO profiles (id, user_id) VALUES (?, ?)")
            .bind(&id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        self.get_profile_by_user(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("profile not found after insert"))
    }

    pub async fn update_profile(
        &self,
        profile_id: &str,
        phone: Option<&str>,
        address: Option<&str>,
        bio: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE profiles SET
                phone = COALESCE(?, phone),
                address = COALESCE(?, address),
                bio = COALESCE(?, bio)
             WHERE id = ?",
        )
        .bind(phone)
        .bind(address)
        .bind(bio)
        .bind(profile_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ─── Education ───────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub async fn add_education(
        &self,
        profile_id: &str,
        degree: &str,
        field_of_study: Option<&str>,
        institution: Option<&str>,
        country: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<EducationRow> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO education (id, profile_id, degree, field_of_study, institution, country, start_date, end_date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(profile_id)
        .bind(degree)
        .bind(field_of_study)
        .bind(institution)
        .bind(country)
        .bind(start_date)
        .bind(end_date)
        .execute(&self.pool)
        .await?;
        Ok(sqlx::query_as("SELECT * FROM education WHERE id = ?")
            .bind(&id)
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn list_education(&self, profile_id: &str) -> Result<Vec<EducationRow>> {
        with_timeout(async {
            Ok(sqlx::query_as(
                "SELECT * FROM education WHERE profile_id = ? ORDER BY start_date DESC",
            )
            .bind(profile_id)
            .fetch_all(&self.pool)
            .await?)
        })
        .await
    }

    /// Delete an education entry. Scoped by profile so a caller can never
    /// remove another user's row. Returns whether a row was deleted.
    pub async fn delete_education(&self, id: &str, profile_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM education WHERE id = ? AND profile_id = ?")
            .bind(id)
            .bind(profile_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Work experience ─────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub async fn add_work(
        &self,
        profile_id: &str,
        job_title: &str,
        company: Option<&str>,
        country: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<WorkRow> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO work_experience (id, profile_id, job_title, company, country, start_date, end_date)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(profile_id)
        .bind(job_title)
        .bind(company)
        .bind(country)
        .bind(start_date)
        .bind(end_date)
        .execute(&self.pool)
        .await?;
        Ok(sqlx::query_as("SELECT * FROM work_experience WHERE id = ?")
            .bind(&id)
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn list_work(&self, profile_id: &str) -> Result<Vec<WorkRow>> {
        with_timeout(async {
            Ok(sqlx::query_as(
                "SELECT * FROM work_experience WHERE profile_id = ? ORDER BY start_date DESC",
            )
            .bind(profile_id)
            .fetch_all(&self.pool)
            .await?)
        })
        .await
    }

    pub async fn delete_work(&self, id: &str, profile_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM work_experience WHERE id = ? AND profile_id = ?")
            .bind(id)
            .bind(profile_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Languages ───────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub async fn add_language(
        &self,
        profile_id: &str,
        language: &str,
        level: &str,
        has_certificate: bool,
        certificate_name: Option<&str>,
        certificate_score: Option<&str>,
    ) -> Result<LanguageRow> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO languages (id, profile_id, language, level, has_certificate, certificate_name, certificate_score)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(profile_id)
        .bind(language)
        .bind(level)
        .bind(has_certificate)
        .bind(certificate_name)
        .bind(certificate_score)
        .execute(&self.pool)
        .await?;
        Ok(sqlx::query_as("SELECT * FROM languages WHERE id = ?")
            .bind(&id)
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn list_languages(&self, profile_id: &str) -> Result<Vec<LanguageRow>> {
        Ok(
            sqlx::query_as("SELECT * FROM languages WHERE profile_id = ?")
                .bind(profile_id)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    pub async fn delete_language(&self, id: &str, profile_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM languages WHERE id = ? AND profile_id = ?")
            .bind(id)
            .bind(profile_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Analyses ────────────────────────────────────────────────────────────

    pub async fn create_analysis(&self, user_id: &str) -> Result<AnalysisRow> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO analyses (id, user_id, status, created_at) VALUES (?, ?, 'IN_PROGRESS', ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        self.get_analysis(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("analysis not found after insert"))
    }

    pub async fn get_analysis(&self, id: &str) -> Result<Option<AnalysisRow>> {
        Ok(sqlx::query_as("SELECT * FROM analyses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Terminal write: IN_PROGRESS → COMPLETED with the summary text.
    pub async fn complete_analysis(&self, id: &str, ai_analysis: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE analyses SET status = 'COMPLETED', ai_analysis = ?, completed_at = ? WHERE id = ?",
        )
        .bind(ai_analysis)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_analyses(&self, user_id: &str) -> Result<Vec<AnalysisRow>> {
        with_timeout(async {
            Ok(sqlx::query_as(
                "SELECT * FROM analyses WHERE user_id = ? ORDER BY created_at DESC",
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
        })
        .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_recommendation(
        &self,
        analysis_id: &str,
        country: &str,
        visa_type: &str,
        score: i64,
        reasoning: Option<&str>,
        requirements_json: &str,
        estimated_duration: Option<&str>,
        estimated_cost: Option<&str>,
    ) -> Result<()> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO recommendations
                (id, analysis_id, country, visa_type, score, reasoning, requirements, estimated_duration, estimated_cost)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(analysis_id)
        .bind(country)
        .bind(visa_type)
        .bind(score)
        .bind(reasoning)
        .bind(requirements_json)
        .bind(estimated_duration)
        .bind(estimated_cost)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Recommendations for display: always score-descending, independent of
    /// creation order.
    pub async fn list_recommendations(&self, analysis_id: &str) -> Result<Vec<RecommendationRow>> {
        Ok(sqlx::query_as(
            "SELECT * FROM recommendations WHERE analysis_id = ? ORDER BY score DESC",
        )
        .bind(analysis_id)
        .fetch_all(&self.pool)
        .await?)
    }

    // ─── Cases ───────────────────────────────────────────────────────────────

    pub async fn create_case(
        &self,
        user_id: &str,
        country: &str,
        visa_type: &str,
        description: Option<&str>,
    ) -> Result<CaseRow> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO cases (id, user_id, country, visa_type, description, status, created_at)
             VALUES (?, ?, ?, ?, ?, 'PENDING', ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(country)
        .bind(visa_type)
        .bind(description)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        sqlx::query_as("SELECT * FROM cases WHERE id = ?")
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| anyhow::anyhow!("case not found after insert"))
    }

    /// Fetch a case scoped to its owner. A foreign case id yields `None`,
    /// indistinguishable from a missing row.
    pub async fn get_case(&self, id: &str, user_id: &str) -> Result<Option<CaseRow>> {
        Ok(
            sqlx::query_as("SELECT * FROM cases WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    pub async fn list_cases(&self, user_id: &str) -> Result<Vec<CaseRow>> {
        with_timeout(async {
            Ok(
                sqlx::query_as("SELECT * FROM cases WHERE user_id = ? ORDER BY created_at DESC")
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?,
            )
        })
        .await
    }

    pub async fn update_case_status(&self, id: &str, status: &str) -> Result<()> {
        sqlx::query("UPDATE cases SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ─── Case steps ──────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_case_step(
        &self,
        case_id: &str,
        step_number: i64,
        title: &str,
        description: Option<&str>,
        requires_proof: bool,
        proof_type: Option<&str>,
    ) -> Result<()> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO case_steps (id, case_id, step_number, title, description, status, requires_proof, proof_type)
             VALUES (?, ?, ?, ?, ?, 'NOT_STARTED', ?, ?)",
        )
        .bind(&id)
        .bind(case_id)
        .bind(step_number)
        .bind(title)
        .bind(description)
        .bind(requires_proof)
        .bind(proof_type)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list_case_steps(&self, case_id: &str) -> Result<Vec<CaseStepRow>> {
        Ok(sqlx::query_as(
            "SELECT * FROM case_steps WHERE case_id = ? ORDER BY step_number ASC",
        )
        .bind(case_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn get_case_step(&self, step_id: &str, case_id: &str) -> Result<Option<CaseStepRow>> {
        Ok(
            sqlx::query_as("SELECT * FROM case_steps WHERE id = ? AND case_id = ?")
                .bind(step_id)
                .bind(case_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Apply a state-machine transition result to a step row.
    pub async fn update_case_step(&self, step_id: &str, update: &CaseStepUpdate) -> Result<()> {
        // Each optional field compiles to "keep current value" when None.
        sqlx::query(
            "UPDATE case_steps SET
                status = COALESCE(?, status),
                proof_url = CASE WHEN ? THEN ? ELSE proof_url END,
                proof_notes = CASE WHEN ? THEN ? ELSE proof_notes END,
                completed_at = CASE WHEN ? THEN ? ELSE completed_at END
             WHERE id = ?",
        )
        .bind(update.status.as_deref())
        .bind(update.proof_url.is_some())
        .bind(update.proof_url.clone().flatten())
        .bind(update.proof_notes.is_some())
        .bind(update.proof_notes.clone().flatten())
        .bind(update.completed_at.is_some())
        .bind(update.completed_at.clone().flatten())
        .bind(step_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ─── Procedure templates ─────────────────────────────────────────────────

    pub async fn find_active_template(
        &self,
        country: &str,
        visa_type: &str,
    ) -> Result<Option<TemplateRow>> {
        Ok(sqlx::query_as(
            "SELECT * FROM procedure_templates WHERE country = ? AND visa_type = ? AND is_active = 1",
        )
        .bind(country)
        .bind(visa_type)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub async fn list_template_steps(&self, template_id: &str) -> Result<Vec<TemplateStepRow>> {
        Ok(sqlx::query_as(
            "SELECT * FROM template_steps WHERE template_id = ? ORDER BY step_number ASC",
        )
        .bind(template_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Administrator seeding surface — used by ops tooling and tests.
    pub async fn create_template(&self, country: &str, visa_type: &str) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO procedure_templates (id, country, visa_type, is_active) VALUES (?, ?, ?, 1)",
        )
        .bind(&id)
        .bind(country)
        .bind(visa_type)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn add_template_step(
        &self,
        template_id: &str,
        step_number: i64,
        title: &str,
        description: Option<&str>,
        requires_proof: bool,
        proof_type: Option<&str>,
    ) -> Result<()> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO template_steps (id, template_id, step_number, title, description, requires_proof, proof_type)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(template_id)
        .bind(step_number)
        .bind(title)
        .bind(description)
        .bind(requires_proof)
        .bind(proof_type)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ─── Documents ───────────────────────────────────────────────────────────

    pub async fn insert_document(
        &self,
        user_id: &str,
        file_name: &str,
        doc_type: Option<&str>,
        description: Option<&str>,
        url: &str,
    ) -> Result<DocumentRow> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO documents (id, user_id, file_name, doc_type, description, url, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(file_name)
        .bind(doc_type)
        .bind(description)
        .bind(url)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(sqlx::query_as("SELECT * FROM documents WHERE id = ?")
            .bind(&id)
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn list_documents(&self, user_id: &str) -> Result<Vec<DocumentRow>> {
        Ok(sqlx::query_as(
            "SELECT * FROM documents WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
