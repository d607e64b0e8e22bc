use crate::entities::{MembershipStatus, Role, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

/// 员工账号（前台 / 教练）管理
#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 管理员只能创建 staff 或 trainer
    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        match request.role {
            Role::Staff | Role::Trainer => {}
            Role::Admin | Role::Member => {
                return Err(AppError::ValidationError(
                    "Invalid role. Only staff or trainer allowed.".to_string(),
                ));
            }
        }

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        validate_password(&request.password)?;

        let now = Utc::now();
        let user = users::ActiveModel {
            name: Set(name),
            email: Set(email),
            password_hash: Set(hash_password(&request.password)?),
            profile_picture: Set(String::new()),
            role: Set(request.role),
            is_active: Set(true),
            membership_status: Set(MembershipStatus::Active),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(duplicate_email)?;
        log::info!("User created: id={} role={}", user.id, user.role);

        Ok(UserResponse::from(user))
    }

    pub async fn list_by_role(&self, role: Role) -> AppResult<Vec<UserResponse>> {
        let list = users::Entity::find()
            .filter(users::Column::Role.eq(role))
            .order_by_asc(users::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(UserResponse::from).collect())
    }

    pub async fn list_trainers(&self) -> AppResult<Vec<UserResponse>> {
        self.list_by_role(Role::Trainer).await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        request: UpdateUserRequest,
    ) -> AppResult<UserResponse> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }
        let email = normalize_email(&request.email);
        validate_email(&email)?;

        let mut model = self.find(user_id, "User not found").await?.into_active_model();
        model.name = Set(name);
        model.email = Set(email);
        if let Some(role) = request.role {
            model.role = Set(role);
        }
        model.updated_at = Set(Some(Utc::now()));
        let user = model.update(&self.pool).await.map_err(duplicate_email)?;

        Ok(UserResponse::from(user))
    }

    pub async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        let res = users::Entity::delete_by_id(user_id).exec(&self.pool).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        log::info!("User deleted: id={user_id}");
        Ok(())
    }

    /// 启用/停用账号，返回切换后的 is_active
    pub async fn toggle_active(&self, user_id: i64) -> AppResult<bool> {
        self.toggle(user_id, "User not found").await
    }

    pub async fn toggle_trainer(&self, trainer_id: i64) -> AppResult<bool> {
        self.toggle(trainer_id, "Trainer not found").await
    }

    async fn toggle(&self, user_id: i64, not_found: &str) -> AppResult<bool> {
        let user = self.find(user_id, not_found).await?;
        let is_active = !user.is_active;

        let mut model = user.into_active_model();
        model.is_active = Set(is_active);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;
        log::info!("User status toggled: id={user_id} is_active={is_active}");

        Ok(is_active)
    }

    async fn find(&self, user_id: i64, not_found: &str) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(not_found.to_string()))
    }
}

/// 邮箱唯一约束冲突转成 400
pub(crate) fn duplicate_email(err: sea_orm::DbErr) -> AppError {
    if AppError::is_unique_violation(&err) {
        AppError::ValidationError("User already exists or invalid data".to_string())
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::setup_test_db;

    fn create(email: &str, role: Role) -> CreateUserRequest {
        CreateUserRequest {
            name: "Default Staff".to_string(),
            email: email.to_string(),
            password: "staff123".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_user_only_staff_or_trainer() {
        let service = UserService::new(setup_test_db().await);

        assert!(service.create_user(create("s@gym.com", Role::Staff)).await.is_ok());
        assert!(service.create_user(create("t@gym.com", Role::Trainer)).await.is_ok());
        for role in [Role::Admin, Role::Member] {
            assert!(matches!(
                service.create_user(create("x@gym.com", role)).await,
                Err(AppError::ValidationError(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_validation_error() {
        let service = UserService::new(setup_test_db().await);
        service.create_user(create("s@gym.com", Role::Staff)).await.unwrap();

        assert!(matches!(
            service.create_user(create("s@gym.com", Role::Trainer)).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_list_by_role_and_trainers() {
        let service = UserService::new(setup_test_db().await);
        service.create_user(create("s@gym.com", Role::Staff)).await.unwrap();
        service.create_user(create("t1@gym.com", Role::Trainer)).await.unwrap();
        service.create_user(create("t2@gym.com", Role::Trainer)).await.unwrap();

        assert_eq!(service.list_by_role(Role::Staff).await.unwrap().len(), 1);
        let trainers = service.list_trainers().await.unwrap();
        assert_eq!(trainers.len(), 2);
        assert!(trainers.iter().all(|t| t.role == Role::Trainer));
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let service = UserService::new(setup_test_db().await);
        let user = service.create_user(create("t@gym.com", Role::Trainer)).await.unwrap();
        assert!(user.is_active);

        assert!(!service.toggle_active(user.id).await.unwrap());
        assert!(service.toggle_trainer(user.id).await.unwrap());
        assert!(matches!(
            service.toggle_active(9999).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_user() {
        let service = UserService::new(setup_test_db().await);
        let user = service.create_user(create("s@gym.com", Role::Staff)).await.unwrap();

        let updated = service
            .update_user(
                user.id,
                UpdateUserRequest {
                    name: "Head Trainer".to_string(),
                    email: "head@gym.com".to_string(),
                    role: Some(Role::Trainer),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Head Trainer");
        assert_eq!(updated.role, Role::Trainer);

        service.delete_user(user.id).await.unwrap();
        assert!(matches!(
            service.delete_user(user.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
