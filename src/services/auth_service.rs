use crate::config::{BootstrapConfig, UploadConfig};
use crate::entities::{MembershipStatus, Role, package_entity as packages, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::user_service::duplicate_email;
use crate::utils::*;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    uploads: UploadConfig,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService, uploads: UploadConfig) -> Self {
        Self {
            pool,
            jwt_service,
            uploads,
        }
    }

    pub fn max_upload_size(&self) -> usize {
        self.uploads.max_file_size
    }

    /// 会员自助注册（可同时选择套餐或指定到期日）
    pub async fn register(&self, form: RegisterForm) -> AppResult<UserResponse> {
        let name = form.name.trim().to_string();
        let email = normalize_email(&form.email);
        if name.is_empty() || email.is_empty() || form.password.is_empty() {
            return Err(AppError::ValidationError(
                "Name, email, and password are required".to_string(),
            ));
        }
        validate_email(&email)?;
        validate_password(&form.password)?;

        // 格式不对的 package_id / sub_end_date 当作未填写
        let package_id = match form.package_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => raw
                .parse::<i64>()
                .inspect_err(|_| log::warn!("Register: ignoring malformed package_id {raw:?}"))
                .ok(),
        };
        let sub_end_date = match form.sub_end_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .inspect_err(|_| log::warn!("Register: ignoring malformed sub_end_date {raw:?}"))
                .ok(),
        };

        // 先查重，避免头像落盘后才发现邮箱已存在
        if self.email_taken(&email).await? {
            return Err(AppError::ValidationError(
                "User already exists or invalid data".to_string(),
            ));
        }

        let profile_picture = match &form.profile_picture {
            Some(file) => store_profile_picture(&self.uploads.dir, file).await?,
            None => String::new(),
        };

        let now = Utc::now();
        let mut model = users::ActiveModel {
            name: Set(name),
            email: Set(email),
            password_hash: Set(hash_password(&form.password)?),
            profile_picture: Set(profile_picture.clone()),
            role: Set(Role::Member),
            is_active: Set(true),
            membership_status: Set(MembershipStatus::Active),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        // 选择的套餐不存在时忽略
        if let Some(package_id) = package_id
            && let Some(package) = packages::Entity::find_by_id(package_id)
                .one(&self.pool)
                .await?
        {
            let window = SubscriptionWindow::for_package(&package, now)?;
            model.package_id = Set(Some(package.id));
            model.sub_start_date = Set(Some(window.start));
            model.sub_end_date = Set(Some(window.end));
        }

        // 手动指定到期日优先于套餐计算结果
        if let Some(end_date) = sub_end_date {
            let window = SubscriptionWindow::until_date(end_date, now);
            model.sub_start_date = Set(Some(window.start));
            model.sub_end_date = Set(Some(window.end));
        }

        let user = match model.insert(&self.pool).await {
            Ok(user) => user,
            Err(e) => {
                // 插入失败时删除已落盘的头像
                remove_profile_picture(&self.uploads.dir, &profile_picture).await;
                return Err(duplicate_email(e));
            }
        };
        log::info!("Member registered: id={} email={}", user.id, user.email);

        Ok(UserResponse::from(user))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let email = normalize_email(&request.email);

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid credentials".to_string()))?;

        // 验证密码
        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError("Invalid credentials".to_string()));
        }

        check_login_allowed(&user, Utc::now())?;

        let token = self.jwt_service.generate_access_token(user.id, user.role)?;
        log::info!("User logged in: id={} role={}", user.id, user.role);

        Ok(LoginResponse {
            token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
            user: UserSummary::from(user),
        })
    }

    pub async fn change_password(
        &self,
        user_id: i64,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        validate_password(&request.new_password)?;

        let user = self.get_user_by_id(user_id).await?;
        if !verify_password(&request.old_password, &user.password_hash)? {
            return Err(AppError::AuthError("Incorrect old password".to_string()));
        }

        let mut model = user.into_active_model();
        model.password_hash = Set(hash_password(&request.new_password)?);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;
        log::info!("Password changed: id={user_id}");

        Ok(())
    }

    pub async fn me(&self, user_id: i64) -> AppResult<UserSummary> {
        let user = self.get_user_by_id(user_id).await?;
        Ok(UserSummary::from(user))
    }

    /// 库中没有管理员时按配置创建一个；返回是否创建
    pub async fn ensure_bootstrap_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<bool> {
        let (Some(email), Some(password)) = (&bootstrap.admin_email, &bootstrap.admin_password)
        else {
            return Ok(false);
        };

        let admins = users::Entity::find()
            .filter(users::Column::Role.eq(Role::Admin))
            .count(&self.pool)
            .await?;
        if admins > 0 {
            log::info!("Admin bootstrap skipped (already exists)");
            return Ok(false);
        }

        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password(password)?;

        let now = Utc::now();
        users::ActiveModel {
            name: Set(bootstrap
                .admin_name
                .clone()
                .unwrap_or_else(|| "Super Admin".to_string())),
            email: Set(email.clone()),
            password_hash: Set(hash_password(password)?),
            profile_picture: Set(String::new()),
            role: Set(Role::Admin),
            is_active: Set(true),
            membership_status: Set(MembershipStatus::Active),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        log::info!("Admin account bootstrapped: {email}");

        Ok(true)
    }

    async fn email_taken(&self, email: &str) -> AppResult<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn get_user_by_id(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
