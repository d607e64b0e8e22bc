use crate::entities::{Role, attendance_entity as attendance, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::validate_scan_timestamp;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct AttendanceService {
    pool: DatabaseConnection,
}

impl AttendanceService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 扫码签到
    ///
    /// 同一人同一天只能签到一次，由 (attendee_id, date) 唯一索引保证，
    /// 并发的重复扫码只会有一条插入成功，其余返回 409
    pub async fn scan(&self, scanner_id: i64, request: ScanRequest) -> AppResult<AttendanceResponse> {
        let now = Utc::now();
        validate_scan_timestamp(request.timestamp, now)?;

        let attendee = users::Entity::find_by_id(request.attendee_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        match attendee.role {
            Role::Trainer | Role::Member => {}
            Role::Admin | Role::Staff => {
                return Err(AppError::ValidationError(
                    "Only trainers or members can check in".to_string(),
                ));
            }
        }

        let record = attendance::ActiveModel {
            attendee_id: Set(attendee.id),
            scanned_by: Set(scanner_id),
            scan_time: Set(now),
            date: Set(now.date_naive()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict("Attendance already marked for today".to_string())
            } else {
                e.into()
            }
        })?;
        log::info!(
            "Attendance marked: attendee={} scanned_by={scanner_id} date={}",
            attendee.id,
            record.date
        );

        Ok(record.into())
    }

    /// 当前用户自己的签到记录（最新在前）
    pub async fn history(&self, user_id: i64) -> AppResult<Vec<AttendanceResponse>> {
        let list = attendance::Entity::find()
            .filter(attendance::Column::AttendeeId.eq(user_id))
            .order_by_desc(attendance::Column::ScanTime)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 全部签到记录（管理员报表）
    pub async fn reports(&self) -> AppResult<Vec<AttendanceLogResponse>> {
        let list = attendance::Entity::find()
            .order_by_desc(attendance::Column::ScanTime)
            .all(&self.pool)
            .await?;
        self.with_users(list).await
    }

    /// 签到记录（分页 + 日期/会员筛选）
    pub async fn logs(
        &self,
        query: &AttendanceQuery,
    ) -> AppResult<PaginatedResponse<AttendanceLogResponse>> {
        let params = PaginationParams::new(query.page, query.limit);
        let base_query = filtered(query);

        let total = base_query.clone().count(&self.pool).await?;
        let list = base_query
            .order_by_desc(attendance::Column::ScanTime)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let items = self.with_users(list).await?;
        Ok(PaginatedResponse::new(items, &params, total))
    }

    /// 一次查询补全签到人/扫码人信息
    async fn with_users(
        &self,
        list: Vec<attendance::Model>,
    ) -> AppResult<Vec<AttendanceLogResponse>> {
        let mut ids: Vec<i64> = list
            .iter()
            .flat_map(|a| [a.attendee_id, a.scanned_by])
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let people: HashMap<i64, UserBrief> = if ids.is_empty() {
            HashMap::new()
        } else {
            users::Entity::find()
                .filter(users::Column::Id.is_in(ids))
                .all(&self.pool)
                .await?
                .iter()
                .map(|u| (u.id, UserBrief::from(u)))
                .collect()
        };

        Ok(list
            .into_iter()
            .map(|a| AttendanceLogResponse {
                attendee: people.get(&a.attendee_id).cloned(),
                scanner: people.get(&a.scanned_by).cloned(),
                id: a.id,
                attendee_id: a.attendee_id,
                scanned_by: a.scanned_by,
                scan_time: a.scan_time,
                date: a.date,
            })
            .collect())
    }
}

fn filtered(query: &AttendanceQuery) -> Select<attendance::Entity> {
    let mut cond = Condition::all();
    if let Some(start) = query.start_date {
        cond = cond.add(attendance::Column::Date.gte(start));
    }
    if let Some(end) = query.end_date {
        cond = cond.add(attendance::Column::Date.lte(end));
    }
    if let Some(member_id) = query.member_id {
        cond = cond.add(attendance::Column::AttendeeId.eq(member_id));
    }
    attendance::Entity::find().filter(cond)
}
