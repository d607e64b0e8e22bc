use crate::error::{AppError, AppResult};
use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

/// 对外暴露上传文件的 URL 前缀
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// 去掉路径部分，只保留安全字符
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

fn validate_image_extension(filename: &str) -> AppResult<()> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(AppError::ValidationError(
            "Profile picture must be a jpg, png, gif or webp image".to_string(),
        )),
    }
}

/// 保存头像，返回前端可访问的相对路径（/uploads/<文件名>）
pub async fn store_profile_picture(dir: &str, file: &UploadedFile) -> AppResult<String> {
    // 时间戳 + 随机段，避免同一秒内同名文件互相覆盖
    let nonce = Uuid::new_v4().simple().to_string();
    let filename = format!(
        "{}_{}_{}",
        Utc::now().timestamp(),
        &nonce[..8],
        sanitize_filename(&file.filename)
    );
    validate_image_extension(&filename)?;

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(Path::new(dir).join(&filename), &file.bytes).await?;

    Ok(format!("{UPLOADS_URL_PREFIX}/{filename}"))
}

/// 删除 store_profile_picture 保存的文件；空路径或外部路径不处理
pub async fn remove_profile_picture(dir: &str, url: &str) {
    let Some(filename) = url
        .strip_prefix(UPLOADS_URL_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
    else {
        return;
    };
    if filename.is_empty() || filename != sanitize_filename(filename) {
        return;
    }
    if let Err(e) = tokio::fs::remove_file(Path::new(dir).join(filename)).await {
        log::warn!("Failed to remove profile picture {filename}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("me.png"), "me.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\my pic.jpg"), "my_pic.jpg");
        assert_eq!(sanitize_filename(".hidden.png"), "hidden.png");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn test_validate_image_extension() {
        assert!(validate_image_extension("1_me.PNG").is_ok());
        assert!(validate_image_extension("1_me.jpeg").is_ok());
        assert!(validate_image_extension("1_script.sh").is_err());
        assert!(validate_image_extension("1_noext").is_err());
    }

    #[tokio::test]
    async fn test_store_profile_picture_writes_file() {
        let dir = std::env::temp_dir().join(format!("gym-uploads-{}", uuid::Uuid::new_v4()));
        let dir_str = dir.to_string_lossy().to_string();
        let file = UploadedFile {
            filename: "avatar.png".to_string(),
            bytes: vec![1, 2, 3],
        };

        let url = store_profile_picture(&dir_str, &file).await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("_avatar.png"));

        let stored = dir.join(url.trim_start_matches("/uploads/"));
        assert_eq!(std::fs::read(&stored).unwrap(), vec![1, 2, 3]);

        remove_profile_picture(&dir_str, &url).await;
        assert!(!stored.exists());
        // 空路径和目录外路径直接忽略
        remove_profile_picture(&dir_str, "").await;
        remove_profile_picture(&dir_str, "/uploads/../secret.png").await;
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
