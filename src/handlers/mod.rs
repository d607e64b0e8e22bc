pub mod attendance;
pub mod auth;
pub mod member;
pub mod package;
pub mod report;
pub mod user;

pub use auth::auth_config;

use crate::error::AppError;
use actix_web::{Error, web};

// 路径、JSON、查询参数解析失败统一返回 400
fn bad_request(err: impl std::fmt::Display) -> Error {
    AppError::ValidationError(err.to_string()).into()
}

/// 前台 / 管理员共用
pub fn management_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/management")
            .route("/scan", web::post().to(attendance::scan))
            .route("/members", web::get().to(member::list_members))
            .route("/members/assign", web::post().to(member::assign_trainer))
            .route("/members/subscribe", web::post().to(member::subscribe))
            .route("/members/{id}", web::get().to(member::get_member))
            .route("/members/{id}/toggle", web::post().to(member::toggle_member))
            .route("/packages", web::get().to(package::list_packages))
            .route("/attendance", web::get().to(attendance::list_logs)),
    );
}

/// 仅管理员
pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/users", web::post().to(user::create_user))
            .route("/users", web::get().to(user::list_users))
            .route("/users/{id}", web::put().to(user::update_user))
            .route("/users/{id}", web::delete().to(user::delete_user))
            .route("/users/{id}/toggle", web::post().to(user::toggle_user))
            .route("/trainers", web::get().to(user::list_trainers))
            .route("/trainers/{id}/toggle", web::post().to(user::toggle_trainer))
            .route("/members/subscribe", web::post().to(member::subscribe))
            .route("/members/{id}", web::put().to(member::update_member))
            .route("/members/{id}", web::delete().to(member::delete_member))
            .route("/packages", web::post().to(package::create_package))
            .route("/packages/{id}", web::put().to(package::update_package))
            .route("/packages/{id}", web::delete().to(package::delete_package))
            .route("/reports", web::get().to(attendance::reports))
            .route("/stats", web::get().to(report::stats))
            .route("/attendance/chart", web::get().to(report::attendance_chart)),
    );
}

pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::PathConfig::default().error_handler(|err, _| bad_request(err)))
            .app_data(web::JsonConfig::default().error_handler(|err, _| bad_request(err)))
            .app_data(web::QueryConfig::default().error_handler(|err, _| bad_request(err)))
            .configure(auth_config)
            .configure(management_config)
            .configure(admin_config)
            .route("/history", web::get().to(attendance::history)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BootstrapConfig, UploadConfig};
    use crate::database::setup_test_db;
    use crate::middlewares::AuthMiddleware;
    use crate::services::*;
    use crate::utils::JwtService;
    use actix_web::body::MessageBody;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use chrono::Utc;
    use serde_json::{Value, json};

    const BOUNDARY: &str = "----gym-test-boundary";

    fn register_body(fields: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    /// 内存库 + 引导管理员 admin@gmail.com / admin123
    async fn setup() -> (JwtService, impl FnOnce(&mut web::ServiceConfig)) {
        let pool = setup_test_db().await;
        let jwt = JwtService::new("test-secret", 3600);
        let uploads = UploadConfig {
            dir: std::env::temp_dir()
                .join("gym-handler-tests")
                .to_string_lossy()
                .to_string(),
            max_file_size: 1024,
        };
        let auth_service = AuthService::new(pool.clone(), jwt.clone(), uploads);
        auth_service
            .ensure_bootstrap_admin(&BootstrapConfig {
                admin_name: Some("Super Admin".to_string()),
                admin_email: Some("admin@gmail.com".to_string()),
                admin_password: Some("admin123".to_string()),
            })
            .await
            .unwrap();

        let configure = move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(web::Data::new(auth_service))
                .app_data(web::Data::new(UserService::new(pool.clone())))
                .app_data(web::Data::new(MemberService::new(pool.clone())))
                .app_data(web::Data::new(PackageService::new(pool.clone())))
                .app_data(web::Data::new(AttendanceService::new(pool.clone())))
                .app_data(web::Data::new(ReportService::new(pool)));
            api_config(cfg);
        };
        (jwt, configure)
    }

    async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
    where
        S: Service<R, Response = ServiceResponse<B>, Error = Error>,
        B: MessageBody,
    {
        match app.call(req).await {
            Ok(resp) => {
                let status = resp.status();
                let body = test::read_body(resp).await;
                (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
            }
            Err(err) => (err.as_response_error().status_code(), Value::Null),
        }
    }

    fn login(email: &str, password: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "password": password }))
    }

    fn token(body: &Value) -> String {
        body["data"]["token"].as_str().unwrap().to_string()
    }

    fn bearer(token: &str) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_register_scan_and_history_flow() {
        let (jwt, configure) = setup().await;
        let app =
            test::init_service(App::new().wrap(AuthMiddleware::new(jwt)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(register_body(&[
                ("name", "John Doe"),
                ("email", "john@example.com"),
                ("password", "member123"),
            ]))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["role"], "member");
        let member_id = body["data"]["id"].as_i64().unwrap();

        let (_, body) = send(&app, login("admin@gmail.com", "admin123").to_request()).await;
        let admin = token(&body);
        let (_, body) = send(&app, login("john@example.com", "member123").to_request()).await;
        let member = token(&body);

        let scan = || {
            test::TestRequest::post()
                .uri("/api/management/scan")
                .insert_header(bearer(&admin))
                .set_json(json!({ "attendee_id": member_id, "timestamp": Utc::now().timestamp() }))
                .to_request()
        };
        let (status, _) = send(&app, scan()).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&app, scan()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        let req = test::TestRequest::get()
            .uri("/api/history")
            .insert_header(bearer(&member))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        // 会员不能访问管理接口
        let req = test::TestRequest::get()
            .uri("/api/management/members")
            .insert_header(bearer(&member))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_register_missing_fields_is_400() {
        let (jwt, configure) = setup().await;
        let app =
            test::init_service(App::new().wrap(AuthMiddleware::new(jwt)).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(register_body(&[("name", "John Doe")]))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn test_bad_extractor_input_is_400() {
        let (jwt, configure) = setup().await;
        let app =
            test::init_service(App::new().wrap(AuthMiddleware::new(jwt)).configure(configure)).await;
        let (_, body) = send(&app, login("admin@gmail.com", "admin123").to_request()).await;
        let admin = token(&body);

        let req = test::TestRequest::get()
            .uri("/api/management/members/abc")
            .insert_header(bearer(&admin))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let req = test::TestRequest::post()
            .uri("/api/admin/packages")
            .insert_header(bearer(&admin))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/admin/users?role=owner")
            .insert_header(bearer(&admin))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_admin_package_and_subscribe() {
        let (jwt, configure) = setup().await;
        let app =
            test::init_service(App::new().wrap(AuthMiddleware::new(jwt)).configure(configure)).await;
        let (_, body) = send(&app, login("admin@gmail.com", "admin123").to_request()).await;
        let admin = token(&body);

        let req = test::TestRequest::post()
            .uri("/api/admin/users")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "name": "Mike Trainer",
                "email": "mike@gym.com",
                "password": "trainer123",
                "role": "trainer"
            }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        let trainer_id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri("/api/admin/packages")
            .insert_header(bearer(&admin))
            .set_json(json!({ "name": "Gold Plan", "duration_days": 30, "price": 50.0 }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        let package_id = body["data"]["id"].as_i64().unwrap();

        // 非会员也可以订阅套餐；只校验存在性
        let req = test::TestRequest::post()
            .uri("/api/admin/members/subscribe")
            .insert_header(bearer(&admin))
            .set_json(json!({ "member_id": trainer_id, "package_id": package_id }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["package"], "Gold Plan");
        assert_eq!(body["data"]["status"], "active");

        let (_, body) = send(&app, login("mike@gym.com", "trainer123").to_request()).await;
        let trainer = token(&body);
        let req = test::TestRequest::get()
            .uri("/api/admin/stats")
            .insert_header(bearer(&trainer))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::FORBIDDEN);

        // 编码后的路径仍落在 /api/admin 下
        let req = test::TestRequest::get()
            .uri("/api/%61dmin/stats")
            .insert_header(bearer(&trainer))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/api/admin/stats")
            .insert_header(bearer(&admin))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_trainers"], 1);
    }
}
