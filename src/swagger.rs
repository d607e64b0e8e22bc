use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{MembershipStatus, Role};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::change_password,
        handlers::auth::me,
        handlers::attendance::scan,
        handlers::attendance::history,
        handlers::attendance::list_logs,
        handlers::attendance::reports,
        handlers::member::list_members,
        handlers::member::get_member,
        handlers::member::assign_trainer,
        handlers::member::subscribe,
        handlers::member::toggle_member,
        handlers::member::update_member,
        handlers::member::delete_member,
        handlers::package::list_packages,
        handlers::package::create_package,
        handlers::package::update_package,
        handlers::package::delete_package,
        handlers::user::create_user,
        handlers::user::list_users,
        handlers::user::update_user,
        handlers::user::delete_user,
        handlers::user::toggle_user,
        handlers::user::list_trainers,
        handlers::user::toggle_trainer,
        handlers::report::stats,
        handlers::report::attendance_chart,
    ),
    components(
        schemas(
            Role,
            MembershipStatus,
            UserResponse,
            UserSummary,
            UserBrief,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ChangePasswordRequest,
            CreateUserRequest,
            UpdateUserRequest,
            AssignTrainerRequest,
            SubscribeRequest,
            SubscribeResponse,
            UpdateMemberRequest,
            PackageResponse,
            PackageRequest,
            ScanRequest,
            AttendanceResponse,
            AttendanceLogResponse,
            DashboardStats,
            ChartPoint,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and password API"),
        (name = "member", description = "Member management API (admin or staff)"),
        (name = "package", description = "Subscription package API"),
        (name = "attendance", description = "QR check-in API"),
        (name = "admin", description = "Admin-only user and member API"),
        (name = "report", description = "Dashboard and attendance reports"),
    ),
    info(
        title = "Gym Management API",
        version = "1.0.0",
        description = "Gym membership and attendance REST API documentation",
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
