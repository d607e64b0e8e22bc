use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::AttendanceService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/management/scan",
    tag = "attendance",
    security(("bearer_auth" = [])),
    request_body = ScanRequest,
    responses(
        (status = 200, description = "签到成功", body = AttendanceResponse),
        (status = 400, description = "二维码已过期 / 该用户不能签到"),
        (status = 404, description = "用户不存在"),
        (status = 409, description = "今天已签到")
    )
)]
pub async fn scan(
    attendance_service: web::Data<AttendanceService>,
    user: AuthUser,
    request: web::Json<ScanRequest>,
) -> Result<HttpResponse> {
    match attendance_service.scan(user.id, request.into_inner()).await {
        Ok(record) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": record,
            "message": "Attendance marked"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/history",
    tag = "attendance",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "我的签到记录", body = [AttendanceResponse]))
)]
pub async fn history(
    attendance_service: web::Data<AttendanceService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    match attendance_service.history(user.id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/management/attendance",
    tag = "attendance",
    security(("bearer_auth" = [])),
    params(AttendanceQuery),
    responses((status = 200, description = "签到记录（分页）"))
)]
pub async fn list_logs(
    attendance_service: web::Data<AttendanceService>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse> {
    match attendance_service.logs(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/reports",
    tag = "report",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "全部签到记录", body = [AttendanceLogResponse]))
)]
pub async fn reports(attendance_service: web::Data<AttendanceService>) -> Result<HttpResponse> {
    match attendance_service.reports().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}
