use crate::entities::{
    MembershipStatus, Role, attendance_entity as attendance, package_entity as packages,
    user_entity as users,
};
use crate::error::AppResult;
use crate::models::{ChartPoint, DashboardStats};
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// 折线图覆盖的天数（含今天）
pub const CHART_DAYS: i64 = 7;

#[derive(Clone)]
pub struct ReportService {
    pool: DatabaseConnection,
}

impl ReportService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 仪表盘统计，每次请求实时汇总
    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let today = Utc::now().date_naive();

        let members = users::Entity::find().filter(users::Column::Role.eq(Role::Member));
        let total_members = members.clone().count(&self.pool).await?;
        let active_members = members
            .filter(users::Column::MembershipStatus.eq(MembershipStatus::Active))
            .count(&self.pool)
            .await?;
        let total_trainers = users::Entity::find()
            .filter(users::Column::Role.eq(Role::Trainer))
            .count(&self.pool)
            .await?;

        // 活跃会员当前套餐价格之和
        let estimated_revenue: Option<f64> = users::Entity::find()
            .select_only()
            .column_as(packages::Column::Price.sum(), "revenue")
            .inner_join(packages::Entity)
            .filter(users::Column::Role.eq(Role::Member))
            .filter(users::Column::MembershipStatus.eq(MembershipStatus::Active))
            .into_tuple::<Option<f64>>()
            .one(&self.pool)
            .await?
            .flatten();

        let today_attendance = attendance::Entity::find()
            .filter(attendance::Column::Date.eq(today))
            .count(&self.pool)
            .await?;

        Ok(DashboardStats {
            total_members: total_members as i64,
            active_members: active_members as i64,
            total_trainers: total_trainers as i64,
            estimated_revenue: estimated_revenue.unwrap_or(0.0),
            today_attendance: today_attendance as i64,
        })
    }

    /// 最近 7 天每日签到数，按日期升序；没有签到的日期不出现
    pub async fn attendance_chart(&self) -> AppResult<Vec<ChartPoint>> {
        let since: NaiveDate = Utc::now().date_naive() - Duration::days(CHART_DAYS - 1);

        let points = attendance::Entity::find()
            .select_only()
            .column(attendance::Column::Date)
            .column_as(attendance::Column::Id.count(), "count")
            .filter(attendance::Column::Date.gte(since))
            .group_by(attendance::Column::Date)
            .order_by_asc(attendance::Column::Date)
            .into_model::<ChartPoint>()
            .all(&self.pool)
            .await?;

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::setup_test_db;
    use sea_orm::{ActiveModelTrait, Set};

    async fn insert_user(
        pool: &DatabaseConnection,
        email: &str,
        role: Role,
        status: MembershipStatus,
        package_id: Option<i64>,
    ) -> users::Model {
        users::ActiveModel {
            name: Set(email.to_string()),
            email: Set(email.to_string()),
            password_hash: Set("x".to_string()),
            profile_picture: Set(String::new()),
            role: Set(role),
            is_active: Set(true),
            membership_status: Set(status),
            package_id: Set(package_id),
            ..Default::default()
        }
        .insert(pool)
        .await
        .unwrap()
    }

    async fn insert_package(pool: &DatabaseConnection, price: f64) -> packages::Model {
        packages::ActiveModel {
            name: Set(format!("Plan {price}")),
            duration_days: Set(30),
            price: Set(price),
            description: Set(String::new()),
            ..Default::default()
        }
        .insert(pool)
        .await
        .unwrap()
    }

    async fn insert_log(pool: &DatabaseConnection, attendee: i64, scanner: i64, date: NaiveDate) {
        attendance::ActiveModel {
            attendee_id: Set(attendee),
            scanned_by: Set(scanner),
            scan_time: Set(date.and_hms_opt(8, 30, 0).unwrap().and_utc()),
            date: Set(date),
            ..Default::default()
        }
        .insert(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_stats_on_empty_db() {
        let service = ReportService::new(setup_test_db().await);
        let stats = service.stats().await.unwrap();

        assert_eq!(stats.total_members, 0);
        assert_eq!(stats.estimated_revenue, 0.0);
        assert!(service.attendance_chart().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats_counts_and_revenue() {
        let pool = setup_test_db().await;
        let service = ReportService::new(pool.clone());
        let gold = insert_package(&pool, 50.0).await;
        let silver = insert_package(&pool, 20.0).await;

        let staff = insert_user(&pool, "s@gym.com", Role::Staff, MembershipStatus::Active, None).await;
        let m1 = insert_user(&pool, "m1@gym.com", Role::Member, MembershipStatus::Active, Some(gold.id)).await;
        insert_user(&pool, "m2@gym.com", Role::Member, MembershipStatus::Active, Some(silver.id)).await;
        insert_user(&pool, "m3@gym.com", Role::Member, MembershipStatus::Inactive, Some(gold.id)).await;
        insert_user(&pool, "t@gym.com", Role::Trainer, MembershipStatus::Active, Some(gold.id)).await;

        let today = Utc::now().date_naive();
        insert_log(&pool, m1.id, staff.id, today).await;
        insert_log(&pool, m1.id, staff.id, today - Duration::days(1)).await;

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_members, 3);
        assert_eq!(stats.active_members, 2);
        assert_eq!(stats.total_trainers, 1);
        assert_eq!(stats.estimated_revenue, 70.0);
        assert_eq!(stats.today_attendance, 1);
    }

    #[tokio::test]
    async fn test_chart_last_seven_days_ascending() {
        let pool = setup_test_db().await;
        let service = ReportService::new(pool.clone());
        let staff = insert_user(&pool, "s@gym.com", Role::Staff, MembershipStatus::Active, None).await;
        let m1 = insert_user(&pool, "m1@gym.com", Role::Member, MembershipStatus::Active, None).await;
        let m2 = insert_user(&pool, "m2@gym.com", Role::Member, MembershipStatus::Active, None).await;

        let today = Utc::now().date_naive();
        insert_log(&pool, m1.id, staff.id, today).await;
        insert_log(&pool, m2.id, staff.id, today).await;
        insert_log(&pool, m1.id, staff.id, today - Duration::days(3)).await;
        insert_log(&pool, m1.id, staff.id, today - Duration::days(10)).await;

        let chart = service.attendance_chart().await.unwrap();
        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0].date, today - Duration::days(3));
        assert_eq!(chart[0].count, 1);
        assert_eq!(chart[1].date, today);
        assert_eq!(chart[1].count, 2);
    }
}
