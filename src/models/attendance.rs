use crate::entities::attendance_entity as attendance;
use crate::models::UserBrief;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// 签到人 ID（旧版扫码端字段名为 trainer_id）
    #[serde(alias = "trainer_id")]
    pub attendee_id: i64,
    /// 二维码生成时的 UNIX 秒级时间戳
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttendanceResponse {
    pub id: i64,
    pub attendee_id: i64,
    pub scanned_by: i64,
    pub scan_time: DateTime<Utc>,
    pub date: NaiveDate,
}

impl From<attendance::Model> for AttendanceResponse {
    fn from(a: attendance::Model) -> Self {
        Self {
            id: a.id,
            attendee_id: a.attendee_id,
            scanned_by: a.scanned_by,
            scan_time: a.scan_time,
            date: a.date,
        }
    }
}

/// 带签到人与扫码人信息的记录
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttendanceLogResponse {
    pub id: i64,
    pub attendee_id: i64,
    pub scanned_by: i64,
    pub scan_time: DateTime<Utc>,
    pub date: NaiveDate,
    pub attendee: Option<UserBrief>,
    pub scanner: Option<UserBrief>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub member_id: Option<i64>,
}
