// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

// Os cards do painel do síndico
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    #[schema(example = 12)]
    pub pending_now: i64,
    #[schema(example = 87)]
    pub total_this_month: i64,
    #[schema(example = 75)]
    pub collected_this_month: i64,
}

// Contagens de encomendas registradas dentro de um período
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodCounts {
    pub total: i64,
    pub collected: i64,
}
