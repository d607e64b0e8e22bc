use crate::entities::MembershipStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignTrainerRequest {
    pub member_id: i64,
    pub trainer_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscribeRequest {
    pub member_id: i64,
    pub package_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscribeResponse {
    pub package: String,
    #[schema(example = "2025-12-31")]
    pub sub_end_date: String, // YYYY-MM-DD
    pub status: MembershipStatus,
}

/// 管理员编辑会员；package_id 与当前相同则不重置订阅日期
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateMemberRequest {
    pub name: String,
    pub email: String,
    pub package_id: Option<i64>,
    pub membership_status: Option<MembershipStatus>,
}
