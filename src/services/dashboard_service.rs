// src/services/dashboard_service.rs

use std::sync::Arc;

use chrono::{DateTime, Datelike, Local, LocalResult, Months, NaiveDate, TimeZone, Utc};

use crate::{
    common::error::{AppError, AppResult},
    db::PackageRepository,
    middleware::rbac::{ManagerTier, RequireRole},
    models::dashboard::DashboardReport,
};

#[derive(Clone)]
pub struct DashboardService {
    packages: Arc<dyn PackageRepository>,
}

impl DashboardService {
    pub fn new(packages: Arc<dyn PackageRepository>) -> Self {
        Self { packages }
    }

    pub async fn get_report(&self, guard: &RequireRole<ManagerTier>) -> AppResult<DashboardReport> {
        self.report_at(guard, Local::now()).await
    }

    pub async fn report_at(
        &self,
        guard: &RequireRole<ManagerTier>,
        now: DateTime<Local>,
    ) -> AppResult<DashboardReport> {
        let tenant_id = guard.context().tenant_id();
        let (start, end) = month_bounds(now)?;

        let pending_now = self.packages.count_pending(tenant_id).await?;
        let month = self.packages.period_counts(tenant_id, start, end).await?;

        Ok(DashboardReport {
            pending_now,
            total_this_month: month.total,
            collected_this_month: month.collected,
        })
    }
}

/// Mês civil no fuso do servidor: dia 1 00:00:00 até o último dia 23:59:59.
pub fn month_bounds(now: DateTime<Local>) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let invalid = || AppError::InternalServerError(anyhow::anyhow!("invalid calendar month for {}", now));

    let first_day = NaiveDate::from_ymd_opt(now.year(), now.month(), 1).ok_or_else(invalid)?;
    let last_day = first_day
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;

    let start = to_utc(first_day.and_hms_opt(0, 0, 0).ok_or_else(invalid)?)?;
    let end = to_utc(last_day.and_hms_opt(23, 59, 59).ok_or_else(invalid)?)?;
    Ok((start, end))
}

fn to_utc(naive: chrono::NaiveDateTime) -> AppResult<DateTime<Utc>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        // Horário de verão: na ambiguidade vale o primeiro instante
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Ok(Utc.from_utc_datetime(&naive)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::package_repo::MockPackageRepository,
        middleware::{rbac::require_role, tenancy::tenant_membership},
        models::{
            auth::{Role, User},
            dashboard::PeriodCounts,
        },
    };
    use chrono::Timelike;
    use uuid::Uuid;

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local
            .from_local_datetime(&NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap())
            .earliest()
            .unwrap()
    }

    #[test]
    fn bounds_cover_the_whole_local_month() {
        let (start, end) = month_bounds(local(2024, 2, 14, 10)).unwrap();
        let start = start.with_timezone(&Local);
        let end = end.with_timezone(&Local);

        assert_eq!((start.day(), start.hour(), start.minute()), (1, 0, 0));
        assert_eq!(start.month(), 2);
        // 2024 é bissexto
        assert_eq!((end.day(), end.hour(), end.minute(), end.second()), (29, 23, 59, 59));
        assert_eq!(end.month(), 2);
    }

    #[test]
    fn december_ends_on_the_31st() {
        let (_, end) = month_bounds(local(2025, 12, 31, 22)).unwrap();
        let end = end.with_timezone(&Local);
        assert_eq!((end.year(), end.month(), end.day()), (2025, 12, 31));
    }

    #[tokio::test]
    async fn report_combines_pending_and_month_counts() {
        let now = Utc::now();
        let manager = User {
            id: Uuid::new_v4(),
            open_id: "test|manager".into(),
            name: None,
            email: None,
            login_method: None,
            role: Role::Manager,
            tenant_id: Some(Uuid::new_v4()),
            created_at: now,
            updated_at: now,
            last_signed_in: now,
        };
        let tenant_id = manager.tenant_id.unwrap();
        let guard = require_role::<ManagerTier>(tenant_membership(manager).unwrap()).unwrap();

        let mut repo = MockPackageRepository::new();
        repo.expect_count_pending()
            .withf(move |t| *t == tenant_id)
            .returning(|_| Ok(3));
        repo.expect_period_counts()
            .returning(|_, _, _| Ok(PeriodCounts { total: 10, collected: 7 }));

        let report = DashboardService::new(Arc::new(repo)).get_report(&guard).await.unwrap();
        assert_eq!(
            report,
            DashboardReport {
                pending_now: 3,
                total_this_month: 10,
                collected_this_month: 7
            }
        );
    }
}
