use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

/// 签到记录
/// - attendee_id: 签到的会员/教练
/// - scanned_by: 扫码的前台/管理员
/// - date: 由 scan_time 推导出的自然日 (UTC)，(attendee_id, date) 唯一
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub attendee_id: i64,
    pub scanned_by: i64,
    pub scan_time: DateTime<Utc>,
    pub date: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AttendeeId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Attendee,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ScannedBy",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Scanner,
}

impl ActiveModelBehavior for ActiveModel {}
