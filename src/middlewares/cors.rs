use crate::config::CorsConfig;
use actix_cors::Cors;

pub fn create_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        // 前端会带 Authorization 和 multipart 的 Content-Type
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    // 未配置来源时放开（本地开发）
    if config.allowed_origins.is_empty() {
        return cors.allowed_origin_fn(|_, _req_head| true);
    }

    config
        .allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, HttpResponse, test, web};

    async fn preflight_status(config: CorsConfig, origin: &str) -> (StatusCode, bool) {
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config))
                .route("/api/packages", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/packages")
            .insert_header((header::ORIGIN, origin))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let allowed = resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN);
        (resp.status(), allowed)
    }

    #[actix_web::test]
    async fn test_empty_list_allows_any_origin() {
        let (status, allowed) =
            preflight_status(CorsConfig::default(), "http://localhost:5173").await;
        assert_eq!(status, StatusCode::OK);
        assert!(allowed);
    }

    #[actix_web::test]
    async fn test_configured_origin_list() {
        let config = CorsConfig {
            allowed_origins: vec!["https://gym.example.com".to_string()],
        };
        let (status, allowed) = preflight_status(config, "https://gym.example.com").await;
        assert_eq!(status, StatusCode::OK);
        assert!(allowed);
    }
}
