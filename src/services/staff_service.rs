// src/services/staff_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{crud, error::AppError, pagination::PageInfo},
    db::StaffRepository,
    middleware::tenancy::SessionContext,
    models::{
        garage::Branch,
        staff::{Staff, StaffPage, StaffPayload, StaffQuery},
    },
};

#[derive(Clone)]
pub struct StaffService {
    repo: StaffRepository,
    pool: PgPool,
}

impl StaffService {
    pub fn new(repo: StaffRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    async fn check_branch(&self, session: &SessionContext, branch_id: Option<Uuid>) -> Result<(), AppError> {
        if let Some(branch_id) = branch_id {
            crud::fetch_owned::<Branch, _>(&self.pool, branch_id, session.garage_id).await?;
        }
        Ok(())
    }

    pub async fn create(&self, session: &SessionContext, payload: &StaffPayload) -> Result<Staff, AppError> {
        self.check_branch(session, payload.branch_id).await?;
        self.repo
            .create(&self.pool, session.garage_id, None, payload)
            .await
    }

    pub async fn get(&self, session: &SessionContext, id: Uuid) -> Result<Staff, AppError> {
        crud::fetch_visible::<Staff, _>(&self.pool, id, session.garage_id).await
    }

    pub async fn page(&self, session: &SessionContext, query: &StaffQuery) -> Result<StaffPage, AppError> {
        let request = query.page_request();
        let (content, total) = self
            .repo
            .page(session.garage_id, query.role, &request)
            .await?;

        Ok(StaffPage {
            content,
            page: PageInfo::new(&request, total),
        })
    }

    pub async fn update(
        &self,
        session: &SessionContext,
        id: Uuid,
        payload: &StaffPayload,
    ) -> Result<Staff, AppError> {
        self.check_branch(session, payload.branch_id).await?;

        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<Staff, _>(&mut *tx, id, session.garage_id).await?;
        let staff = self.repo.update(&mut *tx, id, payload).await?;
        tx.commit().await?;
        Ok(staff)
    }

    pub async fn delete(&self, session: &SessionContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        crud::fetch_owned::<Staff, _>(&mut *tx, id, session.garage_id).await?;
        crud::set_active::<Staff, _>(&mut *tx, id, false).await?;
        tx.commit().await?;
        Ok(())
    }
}
