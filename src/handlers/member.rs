use crate::models::*;
use crate::services::MemberService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/management/members",
    tag = "member",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "会员列表（含套餐）", body = [UserResponse]))
)]
pub async fn list_members(member_service: web::Data<MemberService>) -> Result<HttpResponse> {
    match member_service.list_members().await {
        Ok(members) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": members
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/management/members/{id}",
    tag = "member",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "会员 ID")),
    responses(
        (status = 200, description = "会员详情", body = UserResponse),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn get_member(
    member_service: web::Data<MemberService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match member_service.get_member(path.into_inner()).await {
        Ok(member) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": member
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/management/members/assign",
    tag = "member",
    security(("bearer_auth" = [])),
    request_body = AssignTrainerRequest,
    responses(
        (status = 200, description = "已分配教练"),
        (status = 400, description = "被分配的用户不是教练"),
        (status = 404, description = "会员或教练不存在")
    )
)]
pub async fn assign_trainer(
    member_service: web::Data<MemberService>,
    request: web::Json<AssignTrainerRequest>,
) -> Result<HttpResponse> {
    match member_service.assign_trainer(request.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Trainer assigned successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/management/members/subscribe",
    tag = "member",
    security(("bearer_auth" = [])),
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "订阅成功", body = SubscribeResponse),
        (status = 404, description = "会员或套餐不存在")
    )
)]
pub async fn subscribe(
    member_service: web::Data<MemberService>,
    request: web::Json<SubscribeRequest>,
) -> Result<HttpResponse> {
    match member_service.subscribe(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response,
            "message": "Subscription successful"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/management/members/{id}/toggle",
    tag = "member",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "会员 ID")),
    responses(
        (status = 200, description = "会员状态已切换"),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn toggle_member(
    member_service: web::Data<MemberService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match member_service.toggle_status(path.into_inner()).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "membership_status": status },
            "message": format!("Member is now {status}")
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/admin/members/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "会员 ID")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "会员已更新", body = UserResponse),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn update_member(
    member_service: web::Data<MemberService>,
    path: web::Path<i64>,
    request: web::Json<UpdateMemberRequest>,
) -> Result<HttpResponse> {
    match member_service
        .update_member(path.into_inner(), request.into_inner())
        .await
    {
        Ok(member) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": member,
            "message": "Member updated successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/members/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "会员 ID")),
    responses(
        (status = 200, description = "会员已删除"),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn delete_member(
    member_service: web::Data<MemberService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match member_service.delete_member(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Member deleted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}
