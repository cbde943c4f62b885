// src/services/snapshot_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::SnapshotRepository,
    middleware::tenancy::SessionContext,
    models::finance::{DailySnapshot, DateRangeQuery, SnapshotSummary},
};

#[derive(Clone)]
pub struct SnapshotService {
    repo: SnapshotRepository,
    pool: PgPool,
}

impl SnapshotService {
    pub fn new(repo: SnapshotRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    /// Recalcula o dia (padrão: hoje). Rodar de novo sobrescreve.
    pub async fn generate(
        &self,
        session: &SessionContext,
        date: Option<NaiveDate>,
    ) -> Result<DailySnapshot, AppError> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let snapshot = self
            .repo
            .upsert_for_date(&self.pool, session.garage_id, date)
            .await?;

        tracing::info!(
            "📊 Fotografia de {} gerada para a oficina {} (receita {})",
            date,
            session.garage_id,
            snapshot.total_revenue
        );
        Ok(snapshot)
    }

    pub async fn get(&self, session: &SessionContext, date: NaiveDate) -> Result<DailySnapshot, AppError> {
        self.repo
            .find_by_date(session.garage_id, date)
            .await?
            .ok_or(AppError::NotFound("DailySnapshot"))
    }

    pub async fn range(&self, session: &SessionContext, range: DateRangeQuery) -> Result<Vec<DailySnapshot>, AppError> {
        let range = range.validated()?;
        self.repo
            .list_range(session.garage_id, range.from, range.to)
            .await
    }

    pub async fn summary(&self, session: &SessionContext, range: DateRangeQuery) -> Result<SnapshotSummary, AppError> {
        let range = range.validated()?;
        self.repo
            .summarize(session.garage_id, range.from, range.to)
            .await
    }
}
