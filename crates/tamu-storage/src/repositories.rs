// Repository layer for database operations
//
// Attendance reads always join the owning event so name/slug ride along.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::*;

/// Joined select list shared by every attendance read.
const ATTENDANCE_SELECT: &str = r#"
    SELECT
        a.id, a.event_id, a.guest_name, a.institution, a.institution_id,
        a.position, a.phone, a.email, a.representative_count, a.category,
        a.arrival_time, a.created_at,
        e.name AS event_name, e.slug AS event_slug
    FROM attendance a
    JOIN events e ON a.event_id = e.id
"#;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run embedded migrations (idempotent).
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run database migrations")?;
        tracing::debug!("database migrations applied");
        Ok(())
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEvent) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (name, slug, description, date, location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, slug, description, date, location, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.date)
        .bind(&input.location)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: i64) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, slug, description, date, location, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event_by_slug(&self, slug: &str) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, slug, description, date, location, created_at, updated_at
            FROM events
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_events(&self, limit: i64, offset: i64) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, slug, description, date, location, created_at, updated_at
            FROM events
            ORDER BY date DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_events(&self) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM events"#)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn list_upcoming_events(&self, limit: i64) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, slug, description, date, location, created_at, updated_at
            FROM events
            WHERE date >= now()
            ORDER BY date ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_past_events(&self, limit: i64) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, slug, description, date, location, created_at, updated_at
            FROM events
            WHERE date < now()
            ORDER BY date DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_event(&self, id: i64, input: UpdateEvent) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                date = COALESCE($5, date),
                location = COALESCE($6, location),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, slug, description, date, location, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.date)
        .bind(&input.location)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Hard delete; attendance rows cascade via FK.
    pub async fn delete_event(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM events WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn event_stats(&self, event_id: i64) -> Result<EventStatsRow> {
        let row = sqlx::query_as::<_, EventStatsRow>(
            r#"
            SELECT
                COUNT(*) AS total_attendees,
                COUNT(DISTINCT institution) AS total_institutions,
                COALESCE(SUM(representative_count), 0)::BIGINT AS total_represented,
                MIN(arrival_time) AS first_arrival,
                MAX(arrival_time) AS last_arrival
            FROM attendance
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn attendance_by_institution(
        &self,
        event_id: i64,
    ) -> Result<Vec<InstitutionRollupRow>> {
        let rows = sqlx::query_as::<_, InstitutionRollupRow>(
            r#"
            SELECT
                institution,
                COUNT(*) AS attendee_count,
                COALESCE(SUM(representative_count), 0)::BIGINT AS total_represented
            FROM attendance
            WHERE event_id = $1
            GROUP BY institution
            ORDER BY institution
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn attendance_by_category(&self, event_id: i64) -> Result<Vec<CategoryRollupRow>> {
        let rows = sqlx::query_as::<_, CategoryRollupRow>(
            r#"
            SELECT
                category,
                COUNT(*) AS attendee_count,
                COALESCE(SUM(representative_count), 0)::BIGINT AS total_represented
            FROM attendance
            WHERE event_id = $1
            GROUP BY category
            ORDER BY attendee_count DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Attendance
    // ============================================

    pub async fn create_attendance(&self, input: CreateAttendance) -> Result<AttendanceRow> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO attendance (
                event_id, guest_name, institution, institution_id,
                position, phone, email, representative_count, category
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(input.event_id)
        .bind(&input.guest_name)
        .bind(&input.institution)
        .bind(input.institution_id)
        .bind(&input.position)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(input.representative_count)
        .bind(&input.category)
        .fetch_one(&self.pool)
        .await?;

        self.get_attendance(id)
            .await?
            .context("attendance row missing after insert")
    }

    pub async fn get_attendance(&self, id: i64) -> Result<Option<AttendanceRow>> {
        let sql = format!("{ATTENDANCE_SELECT} WHERE a.id = $1");
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Normalized duplicate probe: same event, same guest name, same
    /// institution, compared after trim + casefold.
    pub async fn attendance_exists(
        &self,
        event_id: i64,
        guest_name: &str,
        institution: &str,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM attendance
                WHERE event_id = $1
                  AND lower(trim(guest_name)) = lower(trim($2))
                  AND lower(trim(institution)) = lower(trim($3))
            )
            "#,
        )
        .bind(event_id)
        .bind(guest_name)
        .bind(institution)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn list_event_attendance(
        &self,
        event_id: i64,
        filter: &AttendanceFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AttendanceRow>> {
        let sql = format!(
            r#"{ATTENDANCE_SELECT}
            WHERE a.event_id = $1
              AND ($2::text IS NULL OR a.institution = $2)
              AND ($3::text IS NULL OR a.guest_name ILIKE $3 OR a.institution ILIKE $3)
            ORDER BY a.created_at DESC
            LIMIT $4 OFFSET $5
            "#
        );
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(event_id)
            .bind(&filter.institution)
            .bind(filter.search.as_ref().map(|s| format!("%{s}%")))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn count_event_attendance(
        &self,
        event_id: i64,
        filter: &AttendanceFilter,
    ) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM attendance a
            WHERE a.event_id = $1
              AND ($2::text IS NULL OR a.institution = $2)
              AND ($3::text IS NULL OR a.guest_name ILIKE $3 OR a.institution ILIKE $3)
            "#,
        )
        .bind(event_id)
        .bind(&filter.institution)
        .bind(filter.search.as_ref().map(|s| format!("%{s}%")))
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Export rows in arrival order, joined with event metadata.
    pub async fn export_event_attendance(
        &self,
        event_id: i64,
        filter: &AttendanceFilter,
    ) -> Result<Vec<ExportRow>> {
        let rows = sqlx::query_as::<_, ExportRow>(
            r#"
            SELECT
                a.guest_name, a.institution, a.position, a.phone, a.email,
                a.representative_count, a.category, a.arrival_time,
                e.name AS event_name, e.date AS event_date, e.location AS event_location
            FROM attendance a
            JOIN events e ON a.event_id = e.id
            WHERE a.event_id = $1
              AND ($2::text IS NULL OR a.institution = $2)
              AND ($3::text IS NULL OR a.guest_name ILIKE $3 OR a.institution ILIKE $3)
            ORDER BY a.arrival_time ASC
            "#,
        )
        .bind(event_id)
        .bind(&filter.institution)
        .bind(filter.search.as_ref().map(|s| format!("%{s}%")))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn delete_attendance(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM attendance WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Institutions
    // ============================================

    pub async fn list_institutions(&self) -> Result<Vec<InstitutionRow>> {
        let rows = sqlx::query_as::<_, InstitutionRow>(
            r#"
            SELECT id, name, kind, created_at
            FROM institutions
            ORDER BY kind, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_institution(&self, id: i64) -> Result<Option<InstitutionRow>> {
        let row = sqlx::query_as::<_, InstitutionRow>(
            r#"
            SELECT id, name, kind, created_at
            FROM institutions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find_institution_by_name(&self, name: &str) -> Result<Option<InstitutionRow>> {
        let row = sqlx::query_as::<_, InstitutionRow>(
            r#"
            SELECT id, name, kind, created_at
            FROM institutions
            WHERE lower(name) = lower(trim($1))
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn create_institution(&self, name: &str, kind: &str) -> Result<InstitutionRow> {
        let row = sqlx::query_as::<_, InstitutionRow>(
            r#"
            INSERT INTO institutions (name, kind)
            VALUES ($1, $2)
            RETURNING id, name, kind, created_at
            "#,
        )
        .bind(name)
        .bind(kind)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_institution(
        &self,
        id: i64,
        name: &str,
        kind: &str,
    ) -> Result<Option<InstitutionRow>> {
        let row = sqlx::query_as::<_, InstitutionRow>(
            r#"
            UPDATE institutions
            SET name = $2, kind = $3
            WHERE id = $1
            RETURNING id, name, kind, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// True while any attendance row holds a snapshot reference to this
    /// institution; such institutions cannot be deleted.
    pub async fn institution_in_use(&self, id: i64) -> Result<bool> {
        let in_use: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (SELECT 1 FROM attendance WHERE institution_id = $1)"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(in_use)
    }

    pub async fn delete_institution(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM institutions WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Operators
    // ============================================

    pub async fn get_operator(&self, id: i64) -> Result<Option<OperatorRow>> {
        let row = sqlx::query_as::<_, OperatorRow>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM operators
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_operator_by_email(&self, email: &str) -> Result<Option<OperatorRow>> {
        let row = sqlx::query_as::<_, OperatorRow>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM operators
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn create_operator(&self, input: CreateOperator) -> Result<OperatorRow> {
        let row = sqlx::query_as::<_, OperatorRow>(
            r#"
            INSERT INTO operators (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn count_operators(&self) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM operators"#)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
