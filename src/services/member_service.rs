use crate::entities::{MembershipStatus, Role, package_entity as packages, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::user_service::duplicate_email;
use crate::utils::*;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

#[derive(Clone)]
pub struct MemberService {
    pool: DatabaseConnection,
}

/// 分配/更换套餐：重置订阅起止时间并强制激活
fn apply_package(
    model: &mut users::ActiveModel,
    package: &packages::Model,
    now: DateTime<Utc>,
) -> AppResult<()> {
    let window = SubscriptionWindow::for_package(package, now)?;
    model.package_id = Set(Some(package.id));
    model.sub_start_date = Set(Some(window.start));
    model.sub_end_date = Set(Some(window.end));
    model.membership_status = Set(MembershipStatus::Active);
    Ok(())
}

impl MemberService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 所有会员（附带当前套餐）
    pub async fn list_members(&self) -> AppResult<Vec<UserResponse>> {
        let rows = users::Entity::find()
            .find_also_related(packages::Entity)
            .filter(users::Column::Role.eq(Role::Member))
            .order_by_asc(users::Column::Id)
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(user, package)| {
                UserResponse::from(user).with_package(package.map(PackageResponse::from))
            })
            .collect())
    }

    pub async fn get_member(&self, member_id: i64) -> AppResult<UserResponse> {
        let (user, package) = users::Entity::find_by_id(member_id)
            .find_also_related(packages::Entity)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        Ok(UserResponse::from(user).with_package(package.map(PackageResponse::from)))
    }

    /// 只有 trainer 角色可以被指定为教练
    pub async fn assign_trainer(&self, request: AssignTrainerRequest) -> AppResult<()> {
        let member = self.find_member(request.member_id).await?;
        let trainer = users::Entity::find_by_id(request.trainer_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Trainer not found".to_string()))?;

        match trainer.role {
            Role::Trainer => {}
            Role::Admin | Role::Staff | Role::Member => {
                return Err(AppError::ValidationError(
                    "Assigned user must be a trainer".to_string(),
                ));
            }
        }

        let mut model = member.into_active_model();
        model.assigned_trainer_id = Set(Some(trainer.id));
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;
        log::info!(
            "Trainer assigned: member={} trainer={}",
            request.member_id,
            trainer.id
        );

        Ok(())
    }

    pub async fn subscribe(&self, request: SubscribeRequest) -> AppResult<SubscribeResponse> {
        let package = self.find_package(request.package_id).await?;
        let member = self.find_member(request.member_id).await?;

        let now = Utc::now();
        let mut model = member.into_active_model();
        apply_package(&mut model, &package, now)?;
        model.updated_at = Set(Some(now));
        let member = model.update(&self.pool).await?;

        let sub_end_date = member
            .sub_end_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        log::info!(
            "Member subscribed: member={} package={} until {}",
            member.id,
            package.id,
            sub_end_date
        );

        Ok(SubscribeResponse {
            package: package.name,
            sub_end_date,
            status: member.membership_status,
        })
    }

    /// 切换会员状态，返回切换后的状态
    pub async fn toggle_status(&self, member_id: i64) -> AppResult<MembershipStatus> {
        let member = self.find_member(member_id).await?;
        let status = member.membership_status.toggled();

        let mut model = member.into_active_model();
        model.membership_status = Set(status);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.pool).await?;
        log::info!("Member status toggled: id={member_id} status={status}");

        Ok(status)
    }

    /// 管理员编辑会员
    /// 传入与当前相同的 package_id 不会重置订阅日期
    pub async fn update_member(
        &self,
        member_id: i64,
        request: UpdateMemberRequest,
    ) -> AppResult<UserResponse> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }
        let email = normalize_email(&request.email);
        validate_email(&email)?;

        let member = self.find_member(member_id).await?;
        let current_package = member.package_id;

        let now = Utc::now();
        let mut model = member.into_active_model();
        model.name = Set(name);
        model.email = Set(email);

        if let Some(status) = request.membership_status {
            model.membership_status = Set(status);
        }

        // 套餐变化时才重置日期；套餐不存在则忽略
        if let Some(package_id) = request.package_id
            && current_package != Some(package_id)
            && let Some(package) = packages::Entity::find_by_id(package_id)
                .one(&self.pool)
                .await?
        {
            apply_package(&mut model, &package, now)?;
        }

        model.updated_at = Set(Some(now));
        let member = model.update(&self.pool).await.map_err(duplicate_email)?;

        let package = match member.package_id {
            Some(id) => packages::Entity::find_by_id(id).one(&self.pool).await?,
            None => None,
        };
        Ok(UserResponse::from(member).with_package(package.map(PackageResponse::from)))
    }

    pub async fn delete_member(&self, member_id: i64) -> AppResult<()> {
        let res = users::Entity::delete_by_id(member_id)
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Member not found".to_string()));
        }
        log::info!("Member deleted: id={member_id}");
        Ok(())
    }

    async fn find_member(&self, member_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(member_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))
    }

    async fn find_package(&self, package_id: i64) -> AppResult<packages::Model> {
        packages::Entity::find_by_id(package_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found".to_string()))
    }
}
