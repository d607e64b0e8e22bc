use crate::services::ReportService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "report",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "仪表盘统计", body = DashboardStats))
)]
pub async fn stats(report_service: web::Data<ReportService>) -> Result<HttpResponse> {
    match report_service.stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/attendance/chart",
    tag = "report",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "最近 7 天每日签到数", body = [ChartPoint]))
)]
pub async fn attendance_chart(report_service: web::Data<ReportService>) -> Result<HttpResponse> {
    match report_service.attendance_chart().await {
        Ok(points) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": points
        }))),
        Err(e) => Ok(e.error_response()),
    }
}
