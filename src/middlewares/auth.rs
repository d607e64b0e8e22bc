use crate::entities::Role;
use crate::error::AppError;
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// 已通过认证的调用者，token 只在中间件里解析一次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

/// 路由的访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTier {
    Public,
    Authenticated,
    AdminOrStaff,
    AdminOnly,
}

impl AccessTier {
    pub fn admits(self, role: Role) -> bool {
        match (self, role) {
            (AccessTier::Public | AccessTier::Authenticated, _) => true,
            (AccessTier::AdminOrStaff, Role::Admin | Role::Staff) => true,
            (AccessTier::AdminOrStaff, Role::Trainer | Role::Member) => false,
            (AccessTier::AdminOnly, Role::Admin) => true,
            (AccessTier::AdminOnly, Role::Staff | Role::Trainer | Role::Member) => false,
        }
    }
}

// 路径前缀 -> 访问级别
struct AccessRules {
    // 完全匹配的公开路径
    public_exact: Vec<&'static str>,
    // 前缀匹配的公开路径
    public_prefixes: Vec<&'static str>,
}

impl AccessRules {
    fn new() -> Self {
        Self {
            public_exact: vec![
                "/",
                "/api/auth/register",
                "/api/auth/login",
                "/swagger-ui",
                "/swagger-ui/",
            ],
            public_prefixes: vec!["/uploads/", "/swagger-ui/", "/api-docs/"],
        }
    }

    fn tier_for(&self, path: &str) -> AccessTier {
        if self.public_exact.contains(&path)
            || self
                .public_prefixes
                .iter()
                .any(|&prefix| path.starts_with(prefix))
        {
            return AccessTier::Public;
        }

        if under(path, "/api/admin") {
            AccessTier::AdminOnly
        } else if under(path, "/api/management") {
            AccessTier::AdminOrStaff
        } else {
            AccessTier::Authenticated
        }
    }
}

// "/api/admin" 和 "/api/admin/..." 匹配，"/api/administrator" 不匹配
fn under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            rules: AccessRules::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    rules: AccessRules,
}

impl<S> AuthMiddlewareService<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<AuthUser, AppError> {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))?;

        let claims = self
            .jwt_service
            .verify_access_token(token)
            .map_err(|_| AppError::AuthError("Invalid access token".to_string()))?;
        let id = claims
            .user_id()
            .map_err(|_| AppError::AuthError("Invalid access token".to_string()))?;

        Ok(AuthUser {
            id,
            role: claims.role,
        })
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            return Box::pin(self.service.call(req));
        }

        // 按路由实际匹配的路径（已解码 %xx）判断级别，与 URI 原文无关
        let tier = self.rules.tier_for(req.match_info().as_str());
        if tier == AccessTier::Public {
            return Box::pin(self.service.call(req));
        }

        let user = match self.authenticate(&req) {
            Ok(user) => user,
            Err(error) => return Box::pin(async move { Err(error.into()) }),
        };

        if !tier.admits(user.role) {
            log::warn!(
                "Access denied: user={} role={} path={}",
                user.id,
                user.role,
                req.match_info().as_str()
            );
            return Box::pin(async move { Err(AppError::Forbidden.into()) });
        }

        req.extensions_mut().insert(user);
        Box::pin(self.service.call(req))
    }
}

/// 在 handler 参数中直接取当前用户
impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| AppError::AuthError("Missing access token".to_string()).into());
        ready(user)
    }
}
