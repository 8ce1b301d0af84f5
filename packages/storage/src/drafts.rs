// ABOUTME: Draft storage layer using SQLite
// ABOUTME: Persists wizard drafts and their step payloads; transitions are validated by asb-core

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use tracing::debug;

use asb_core::{generate_draft_id, Draft, DraftError, WizardStep};

use crate::StorageError;

/// Optimistic write attempts before a step save gives up on a busy draft
const WRITE_ATTEMPTS: usize = 3;

pub struct DraftStorage {
    pool: SqlitePool,
}

impl DraftStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an empty draft for an OPD, positioned at the first step
    pub async fn create_draft(&self, opd_id: i64) -> Result<Draft, StorageError> {
        let draft = Draft::new(generate_draft_id(), opd_id);

        debug!("Creating draft: {} (opd: {})", draft.id, opd_id);

        sqlx::query(
            r#"
            INSERT INTO asb_drafts (id, opd_id, current_step, submitted_at, created_at, updated_at)
            VALUES (?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(&draft.id)
        .bind(draft.opd_id)
        .bind(draft.current_step.map(|step| step.as_str()))
        .bind(draft.created_at)
        .bind(draft.updated_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(draft)
    }

    /// Get a single draft with all of its step payloads
    pub async fn get_draft(&self, draft_id: &str) -> Result<Draft, StorageError> {
        debug!("Fetching draft: {}", draft_id);

        let row = sqlx::query("SELECT * FROM asb_drafts WHERE id = ?")
            .bind(draft_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| StorageError::NotFound(draft_id.to_string()))?;

        let mut draft = self.row_to_draft(&row)?;
        draft.steps = self.load_steps(draft_id).await?;
        Ok(draft)
    }

    /// List drafts, newest first, optionally for a single OPD.
    /// Returns the page and the total number of matching drafts.
    pub async fn list_drafts(
        &self,
        opd_id: Option<i64>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<(Vec<Draft>, i64), StorageError> {
        debug!(
            "Fetching drafts (opd: {:?}, limit: {:?}, offset: {:?})",
            opd_id, limit, offset
        );

        let total: i64 = match opd_id {
            Some(opd) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM asb_drafts WHERE opd_id = ?")
                    .bind(opd)
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM asb_drafts")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(StorageError::Sqlx)?;

        let mut query = String::from("SELECT * FROM asb_drafts");
        if opd_id.is_some() {
            query.push_str(" WHERE opd_id = ?");
        }
        query.push_str(" ORDER BY created_at DESC, id");
        // SQLite needs a LIMIT before it accepts an OFFSET
        query.push_str(" LIMIT ? OFFSET ?");

        let mut select = sqlx::query(&query);
        if let Some(opd) = opd_id {
            select = select.bind(opd);
        }
        let rows = select
            .bind(limit.unwrap_or(-1))
            .bind(offset.unwrap_or(0))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut drafts = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut draft = self.row_to_draft(row)?;
            draft.steps = self.load_steps(&draft.id).await?;
            drafts.push(draft);
        }

        Ok((drafts, total))
    }

    /// Fill in one wizard step. The transition is checked against the
    /// stored draft, and the write only lands if the draft still has the
    /// cursor it was checked against and is not submitted.
    pub async fn save_step(
        &self,
        draft_id: &str,
        step: WizardStep,
        payload: serde_json::Value,
    ) -> Result<Draft, StorageError> {
        for attempt in 1..=WRITE_ATTEMPTS {
            let mut draft = self.get_draft(draft_id).await?;
            let expected_cursor = draft.current_step;
            draft.complete_step(step, payload.clone())?;

            debug!(
                "Saving step {} of draft {} (next: {:?}, attempt {})",
                step, draft_id, draft.current_step, attempt
            );

            let payload_json =
                serde_json::to_string(&draft.steps[&step]).map_err(StorageError::Json)?;

            let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

            let guarded = sqlx::query(
                r#"
                UPDATE asb_drafts SET current_step = ?, updated_at = ?
                WHERE id = ? AND submitted_at IS NULL AND current_step IS ?
                "#,
            )
            .bind(draft.current_step.map(|s| s.as_str()))
            .bind(draft.updated_at)
            .bind(draft_id)
            .bind(expected_cursor.map(|s| s.as_str()))
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

            if guarded.rows_affected() == 0 {
                // another writer moved the draft; re-check against its new state
                tx.rollback().await.map_err(StorageError::Sqlx)?;
                continue;
            }

            sqlx::query(
                r#"
                INSERT INTO asb_draft_steps (draft_id, step, payload, completed_at)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(draft_id, step) DO UPDATE SET
                    payload = excluded.payload,
                    completed_at = excluded.completed_at
                "#,
            )
            .bind(draft_id)
            .bind(step.as_str())
            .bind(&payload_json)
            .bind(draft.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

            tx.commit().await.map_err(StorageError::Sqlx)?;
            return Ok(draft);
        }

        Err(self.write_conflict(draft_id, step).await)
    }

    /// Mark a complete draft as handed over to verification. Only one
    /// submission of a draft can succeed.
    pub async fn submit_draft(&self, draft_id: &str) -> Result<Draft, StorageError> {
        let mut draft = self.get_draft(draft_id).await?;
        draft.submit()?;

        debug!("Submitting draft: {}", draft_id);

        let result = sqlx::query(
            r#"
            UPDATE asb_drafts SET submitted_at = ?, updated_at = ?
            WHERE id = ? AND submitted_at IS NULL AND current_step IS NULL
            "#,
        )
        .bind(draft.submitted_at)
        .bind(draft.updated_at)
        .bind(draft_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            // lost the race: report what the stored draft now says
            let mut current = self.get_draft(draft_id).await?;
            return Err(match current.submit() {
                Err(e) => StorageError::Draft(e),
                Ok(()) => StorageError::Draft(DraftError::AlreadySubmitted),
            });
        }

        Ok(draft)
    }

    async fn write_conflict(&self, draft_id: &str, step: WizardStep) -> StorageError {
        match self.get_draft(draft_id).await {
            Ok(draft) if draft.is_submitted() => StorageError::Draft(DraftError::AlreadySubmitted),
            Ok(draft) => StorageError::Draft(DraftError::OutOfOrder {
                expected: draft.current_step.unwrap_or(step),
                got: step,
            }),
            Err(e) => e,
        }
    }

    /// Delete a draft and its step payloads
    pub async fn delete_draft(&self, draft_id: &str) -> Result<(), StorageError> {
        debug!("Deleting draft: {}", draft_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query("DELETE FROM asb_draft_steps WHERE draft_id = ?")
            .bind(draft_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        let result = sqlx::query("DELETE FROM asb_drafts WHERE id = ?")
            .bind(draft_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(draft_id.to_string()));
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;
        Ok(())
    }

    async fn load_steps(
        &self,
        draft_id: &str,
    ) -> Result<BTreeMap<WizardStep, serde_json::Value>, StorageError> {
        let rows = sqlx::query("SELECT step, payload FROM asb_draft_steps WHERE draft_id = ?")
            .bind(draft_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut steps = BTreeMap::new();
        for row in rows {
            let step: String = row.try_get("step").map_err(StorageError::Sqlx)?;
            let payload: String = row.try_get("payload").map_err(StorageError::Sqlx)?;
            steps.insert(
                parse_step(&step)?,
                serde_json::from_str(&payload).map_err(StorageError::Json)?,
            );
        }
        Ok(steps)
    }

    fn row_to_draft(&self, row: &SqliteRow) -> Result<Draft, StorageError> {
        let current_step: Option<String> = row.try_get("current_step").map_err(StorageError::Sqlx)?;
        let submitted_at: Option<DateTime<Utc>> =
            row.try_get("submitted_at").map_err(StorageError::Sqlx)?;

        Ok(Draft {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            opd_id: row.try_get("opd_id").map_err(StorageError::Sqlx)?,
            current_step: current_step.as_deref().map(parse_step).transpose()?,
            steps: BTreeMap::new(),
            submitted_at,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
            updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
        })
    }
}

fn parse_step(value: &str) -> Result<WizardStep, StorageError> {
    value
        .parse::<WizardStep>()
        .map_err(|e| StorageError::Database(format!("Corrupt step column: {}", e)))
}
