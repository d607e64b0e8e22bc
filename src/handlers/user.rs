use crate::entities::Role;
use crate::error::AppError;
use crate::models::*;
use crate::services::UserService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "员工账号已创建", body = UserResponse),
        (status = 400, description = "角色只能是 staff 或 trainer / 邮箱已存在")
    )
)]
pub async fn create_user(
    user_service: web::Data<UserService>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse> {
    match user_service.create_user(request.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user,
            "message": "User created successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("role" = String, Query, description = "admin / staff / trainer / member")),
    responses(
        (status = 200, description = "指定角色的用户列表", body = [UserResponse]),
        (status = 400, description = "缺少或无效的 role")
    )
)]
pub async fn list_users(
    user_service: web::Data<UserService>,
    query: web::Query<UsersQuery>,
) -> Result<HttpResponse> {
    let role = match query.role.as_deref().map(str::trim) {
        None | Some("") => {
            return Ok(AppError::ValidationError("Role is required".to_string()).error_response());
        }
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) => role,
            Err(e) => return Ok(AppError::ValidationError(e).error_response()),
        },
    };

    match user_service.list_by_role(role).await {
        Ok(users) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": users
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "用户 ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "已更新", body = UserResponse),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn update_user(
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
    request: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    match user_service
        .update_user(path.into_inner(), request.into_inner())
        .await
    {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user,
            "message": "User updated successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "用户 ID")),
    responses(
        (status = 200, description = "已删除"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn delete_user(
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match user_service.delete_user(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "User deleted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/toggle",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "用户 ID")),
    responses(
        (status = 200, description = "已切换启用状态"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn toggle_user(
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match user_service.toggle_active(path.into_inner()).await {
        Ok(is_active) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "is_active": is_active },
            "message": if is_active { "User activated" } else { "User deactivated" }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/trainers",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "教练列表", body = [UserResponse]))
)]
pub async fn list_trainers(user_service: web::Data<UserService>) -> Result<HttpResponse> {
    match user_service.list_trainers().await {
        Ok(trainers) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": trainers
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/trainers/{id}/toggle",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "教练 ID")),
    responses(
        (status = 200, description = "已切换启用状态"),
        (status = 404, description = "教练不存在")
    )
)]
pub async fn toggle_trainer(
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match user_service.toggle_trainer(path.into_inner()).await {
        Ok(is_active) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "is_active": is_active }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}
