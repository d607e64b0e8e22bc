use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};

/// 二维码最长有效期（秒）
pub const SCAN_MAX_AGE_SECS: i64 = 60;
/// 允许客户端时钟超前的秒数
pub const SCAN_MAX_SKEW_SECS: i64 = 5;

/// 校验客户端二维码时间戳是否新鲜
pub fn validate_scan_timestamp(client_timestamp: i64, now: DateTime<Utc>) -> AppResult<()> {
    let age = now.timestamp() - client_timestamp;
    if age > SCAN_MAX_AGE_SECS || age < -SCAN_MAX_SKEW_SECS {
        return Err(AppError::ValidationError("QR code expired".to_string()));
    }
    Ok(())
}
