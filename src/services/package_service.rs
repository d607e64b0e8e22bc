use crate::entities::package_entity as packages;
use crate::error::{AppError, AppResult};
use crate::models::{PackageRequest, PackageResponse};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set};

#[derive(Clone)]
pub struct PackageService {
    pool: DatabaseConnection,
}

/// 套餐时长上限（天）
pub const MAX_PACKAGE_DURATION_DAYS: i32 = 3650;

fn validate_package(request: &PackageRequest) -> AppResult<String> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError("Package name is required".to_string()));
    }
    if request.duration_days <= 0 {
        return Err(AppError::ValidationError(
            "Duration must be a positive number of days".to_string(),
        ));
    }
    if request.duration_days > MAX_PACKAGE_DURATION_DAYS {
        return Err(AppError::ValidationError(format!(
            "Duration cannot exceed {MAX_PACKAGE_DURATION_DAYS} days"
        )));
    }
    if !request.price.is_finite() || request.price < 0.0 {
        return Err(AppError::ValidationError(
            "Price must be zero or positive".to_string(),
        ));
    }
    Ok(name.to_string())
}

impl PackageService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_packages(&self) -> AppResult<Vec<PackageResponse>> {
        let list = packages::Entity::find()
            .order_by_asc(packages::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn create_package(&self, request: PackageRequest) -> AppResult<PackageResponse> {
        let name = validate_package(&request)?;
        let package = packages::ActiveModel {
            name: Set(name),
            duration_days: Set(request.duration_days),
            price: Set(request.price),
            description: Set(request.description),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        log::info!("Package created: id={} name={}", package.id, package.name);

        Ok(package.into())
    }

    /// 修改套餐不影响已订阅会员的日期
    pub async fn update_package(
        &self,
        package_id: i64,
        request: PackageRequest,
    ) -> AppResult<PackageResponse> {
        let name = validate_package(&request)?;
        let mut model = packages::Entity::find_by_id(package_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found".to_string()))?
            .into_active_model();

        model.name = Set(name);
        model.duration_days = Set(request.duration_days);
        model.price = Set(request.price);
        model.description = Set(request.description);
        let package = model.update(&self.pool).await?;

        Ok(package.into())
    }

    /// 删除套餐；引用它的会员 package_id 置空
    pub async fn delete_package(&self, package_id: i64) -> AppResult<()> {
        let res = packages::Entity::delete_by_id(package_id)
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Package not found".to_string()));
        }
        log::info!("Package deleted: id={package_id}");
        Ok(())
    }
}
