use crate::error::{AppError, AppResult};
use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::AuthService;
use crate::utils::UploadedFile;
use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, ResponseError, Result, web};
use futures_util::TryStreamExt;
use serde_json::json;

// 普通文本字段的上限
const MAX_TEXT_FIELD_SIZE: usize = 64 * 1024;

async fn read_field(field: &mut Field, limit: usize) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::ValidationError(format!(
                "Field exceeds the {limit} byte limit"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// 解析注册用的 multipart 表单，未知字段忽略
async fn read_register_form(mut payload: Multipart, max_file_size: usize) -> AppResult<RegisterForm> {
    let mut form = RegisterForm::default();

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "profile_picture" {
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or_default()
                .to_string();
            let bytes = read_field(&mut field, max_file_size).await?;
            // 浏览器在未选择文件时也会提交一个空的 file 字段
            if !filename.is_empty() && !bytes.is_empty() {
                form.profile_picture = Some(UploadedFile { filename, bytes });
            }
            continue;
        }

        let bytes = read_field(&mut field, MAX_TEXT_FIELD_SIZE).await?;
        let value = String::from_utf8(bytes)
            .map_err(|_| AppError::ValidationError(format!("Field {name} is not valid UTF-8")))?;
        match name.as_str() {
            "name" => form.name = value,
            "email" => form.email = value,
            "password" => form.password = value,
            "package_id" => form.package_id = Some(value),
            "sub_end_date" => form.sub_end_date = Some(value),
            _ => {}
        }
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body(content = RegisterRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "注册成功", body = UserResponse),
        (status = 400, description = "请求参数错误或邮箱已存在")
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = match read_register_form(payload, auth_service.max_upload_size()).await {
        Ok(form) => form,
        Err(e) => return Ok(e.error_response()),
    };

    match auth_service.register(form).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user,
            "message": "User registered successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = LoginResponse),
        (status = 401, description = "邮箱或密码错误 / 账号已停用"),
        (status = 403, description = "会员订阅已过期")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "密码已修改"),
        (status = 400, description = "新密码不符合要求"),
        (status = 401, description = "旧密码错误")
    )
)]
pub async fn change_password(
    auth_service: web::Data<AuthService>,
    user: AuthUser,
    request: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    match auth_service
        .change_password(user.id, request.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Password updated successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "当前用户", body = UserSummary),
        (status = 401, description = "未认证")
    )
)]
pub async fn me(auth_service: web::Data<AuthService>, user: AuthUser) -> Result<HttpResponse> {
    match auth_service.me(user.id).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/change-password", web::post().to(change_password))
            .route("/me", web::get().to(me)),
    );
}
