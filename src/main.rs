use actix_web::{App, HttpResponse, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use gym_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::{JwtService, UPLOADS_URL_PREFIX},
};

async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Gym Management API is running!")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 头像上传目录
    std::fs::create_dir_all(&config.uploads.dir)?;

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expires_in);

    // 创建服务
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone(), config.uploads.clone());
    let user_service = UserService::new(pool.clone());
    let member_service = MemberService::new(pool.clone());
    let package_service = PackageService::new(pool.clone());
    let attendance_service = AttendanceService::new(pool.clone());
    let report_service = ReportService::new(pool.clone());

    match auth_service.ensure_bootstrap_admin(&config.bootstrap).await {
        Ok(true) => log::info!("Bootstrap admin account created"),
        Ok(false) => {}
        Err(e) => log::error!("Failed to create bootstrap admin: {:?}", e),
    }

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let uploads_dir = config.uploads.dir.clone();
    let cors_config = config.cors.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors(&cors_config))
            .wrap(Logger::default())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(member_service.clone()))
            .app_data(web::Data::new(package_service.clone()))
            .app_data(web::Data::new(attendance_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .route("/", web::get().to(index))
            .service(actix_files::Files::new(UPLOADS_URL_PREFIX, &uploads_dir))
            .configure(swagger_config)
            .configure(handlers::api_config)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
