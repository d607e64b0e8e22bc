use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_members: i64,
    pub active_members: i64,
    pub total_trainers: i64,
    /// 简化估算：活跃会员当前套餐价格之和
    pub estimated_revenue: f64,
    pub today_attendance: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sea_orm::FromQueryResult)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub count: i64,
}
