use crate::entities::{Role, package_entity as packages, user_entity as users};
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// 一次订阅的起止时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SubscriptionWindow {
    /// 分配/更换套餐：从现在开始，持续 duration_days 天
    pub fn for_package(package: &packages::Model, now: DateTime<Utc>) -> AppResult<Self> {
        let end = now
            .checked_add_signed(Duration::days(i64::from(package.duration_days)))
            .ok_or_else(|| AppError::ValidationError("Package duration is too long".to_string()))?;
        Ok(Self { start: now, end })
    }

    /// 注册时手动指定到期日（当天 00:00 UTC）
    pub fn until_date(end_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            start: now,
            end: end_date.and_time(NaiveTime::default()).and_utc(),
        }
    }
}

/// 会员订阅是否已过期；非会员角色永不过期
pub fn is_subscription_expired(user: &users::Model, now: DateTime<Utc>) -> bool {
    match user.role {
        Role::Member => user.sub_end_date.is_some_and(|end| now > end),
        Role::Admin | Role::Staff | Role::Trainer => false,
    }
}

/// 登录前的账号状态检查（密码已校验通过）
pub fn check_login_allowed(user: &users::Model, now: DateTime<Utc>) -> AppResult<()> {
    if !user.is_active {
        return Err(AppError::AuthError("User is deactivated".to_string()));
    }
    if is_subscription_expired(user, now) {
        return Err(AppError::SubscriptionExpired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MembershipStatus;
    use chrono::TimeZone;

    fn member(sub_end_date: Option<DateTime<Utc>>) -> users::Model {
        users::Model {
            id: 1,
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            password_hash: String::new(),
            profile_picture: String::new(),
            role: Role::Member,
            is_active: true,
            assigned_trainer_id: None,
            membership_status: MembershipStatus::Active,
            package_id: None,
            sub_start_date: None,
            sub_end_date,
            created_at: None,
            updated_at: None,
        }
    }

    fn gold() -> packages::Model {
        packages::Model {
            id: 1,
            name: "Gold Plan".to_string(),
            duration_days: 30,
            price: 50.0,
            description: String::new(),
        }
    }

    #[test]
    fn test_window_for_package_spans_duration() {
        let now = Utc.with_ymd_and_hms(2025, 1, 31, 10, 0, 0).unwrap();
        let window = SubscriptionWindow::for_package(&gold(), now).unwrap();

        assert_eq!(window.start, now);
        assert_eq!(window.end - window.start, Duration::days(30));
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 3, 2, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_window_past_calendar_range_is_rejected() {
        let mut package = gold();
        package.duration_days = i32::MAX;
        assert!(matches!(
            SubscriptionWindow::for_package(&package, Utc::now()),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_window_until_date_is_midnight_utc() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let window = SubscriptionWindow::until_date(end, now);

        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 6, 30, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_expired_member_cannot_login() {
        let now = Utc::now();
        let user = member(Some(now - Duration::seconds(1)));

        assert!(is_subscription_expired(&user, now));
        assert!(matches!(
            check_login_allowed(&user, now),
            Err(AppError::SubscriptionExpired)
        ));
    }

    #[test]
    fn test_member_without_end_date_or_in_window_can_login() {
        let now = Utc::now();
        assert!(check_login_allowed(&member(None), now).is_ok());
        assert!(check_login_allowed(&member(Some(now + Duration::days(1))), now).is_ok());
        // 到期时刻本身仍然有效
        assert!(check_login_allowed(&member(Some(now)), now).is_ok());
    }

    #[test]
    fn test_staff_never_expires() {
        let now = Utc::now();
        let mut user = member(Some(now - Duration::days(10)));
        user.role = Role::Staff;
        assert!(check_login_allowed(&user, now).is_ok());
    }

    #[test]
    fn test_deactivated_user_is_rejected_first() {
        let now = Utc::now();
        let mut user = member(Some(now - Duration::days(10)));
        user.is_active = false;
        assert!(matches!(
            check_login_allowed(&user, now),
            Err(AppError::AuthError(_))
        ));
    }
}
