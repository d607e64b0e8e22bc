use crate::models::*;
use crate::services::PackageService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/management/packages",
    tag = "package",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "套餐列表", body = [PackageResponse]))
)]
pub async fn list_packages(package_service: web::Data<PackageService>) -> Result<HttpResponse> {
    match package_service.list_packages().await {
        Ok(packages) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": packages
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/packages",
    tag = "package",
    security(("bearer_auth" = [])),
    request_body = PackageRequest,
    responses(
        (status = 200, description = "套餐已创建", body = PackageResponse),
        (status = 400, description = "参数错误")
    )
)]
pub async fn create_package(
    package_service: web::Data<PackageService>,
    request: web::Json<PackageRequest>,
) -> Result<HttpResponse> {
    match package_service.create_package(request.into_inner()).await {
        Ok(package) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": package,
            "message": "Package created successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/admin/packages/{id}",
    tag = "package",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "套餐 ID")),
    request_body = PackageRequest,
    responses(
        (status = 200, description = "套餐已更新", body = PackageResponse),
        (status = 404, description = "套餐不存在")
    )
)]
pub async fn update_package(
    package_service: web::Data<PackageService>,
    path: web::Path<i64>,
    request: web::Json<PackageRequest>,
) -> Result<HttpResponse> {
    match package_service
        .update_package(path.into_inner(), request.into_inner())
        .await
    {
        Ok(package) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": package,
            "message": "Package updated successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/packages/{id}",
    tag = "package",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "套餐 ID")),
    responses(
        (status = 200, description = "套餐已删除"),
        (status = 404, description = "套餐不存在")
    )
)]
pub async fn delete_package(
    package_service: web::Data<PackageService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match package_service.delete_package(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Package deleted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}
