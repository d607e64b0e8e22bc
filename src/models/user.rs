use crate::entities::{MembershipStatus, Role, user_entity as users};
use crate::models::PackageResponse;
use crate::utils::UploadedFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 完整用户信息（密码哈希永不输出）
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub profile_picture: String,
    pub role: Role,
    pub is_active: bool,
    pub assigned_trainer_id: Option<i64>,
    pub membership_status: MembershipStatus,
    pub package_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageResponse>,
    pub sub_start_date: Option<DateTime<Utc>>,
    pub sub_end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        let created_at = user.created_at.unwrap_or_else(Utc::now);
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            profile_picture: user.profile_picture,
            role: user.role,
            is_active: user.is_active,
            assigned_trainer_id: user.assigned_trainer_id,
            membership_status: user.membership_status,
            package_id: user.package_id,
            package: None,
            sub_start_date: user.sub_start_date,
            sub_end_date: user.sub_end_date,
            created_at,
            updated_at: user.updated_at.unwrap_or(created_at),
        }
    }
}

impl UserResponse {
    pub fn with_package(mut self, package: Option<PackageResponse>) -> Self {
        self.package = package;
        self
    }
}

/// 登录 / me 返回的精简用户信息
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub membership_status: MembershipStatus,
    pub assigned_trainer_id: Option<i64>,
    pub profile_picture: String,
}

impl From<users::Model> for UserSummary {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            membership_status: user.membership_status,
            assigned_trainer_id: user.assigned_trainer_id,
            profile_picture: user.profile_picture,
        }
    }
}

/// 签到列表中展示的用户信息
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserBrief {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&users::Model> for UserBrief {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// 注册表单（multipart 解析后的结果）
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub package_id: Option<String>,
    pub sub_end_date: Option<String>,
    pub profile_picture: Option<UploadedFile>,
}

/// 仅用于 OpenAPI 文档描述 multipart 注册表单
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john@example.com")]
    pub email: String,
    #[schema(example = "member123")]
    pub password: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub profile_picture: Option<Vec<u8>>,
    #[schema(example = "1")]
    pub package_id: Option<String>,
    #[schema(example = "2025-12-31")]
    pub sub_end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin@gmail.com")]
    pub email: String,
    #[schema(example = "admin123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// 管理员创建前台/教练账号
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Default Staff")]
    pub name: String,
    #[schema(example = "staff@gmail.com")]
    pub email: String,
    #[schema(example = "staff123")]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersQuery {
    #[schema(example = "trainer")]
    pub role: Option<String>,
}
