//! 계정 서비스 메인 애플리케이션
//!
//! 설정을 읽고 저장소와 알림 전송기를 골라 `AppContext`를 조립한 뒤
//! Actix-web HTTP 서버를 구동합니다.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

use account_service_backend::config::{AppConfig, StoreBackend};
use account_service_backend::core::AppContext;
use account_service_backend::db::Database;
use account_service_backend::repositories::users::{
    InMemoryUserStore, MongoUserRepository, UserStore,
};
use account_service_backend::middlewares::internal_error_detail;
use account_service_backend::routes::{configure_routes, login_rate_limit};
use account_service_backend::services::notifications::{
    EmailSender, HttpEmailSender, LogEmailSender, LogPushSender, PushSender, RelayPushSender,
};
use account_service_backend::utils::clock::SystemClock;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 계정 서비스 시작중...");

    let config = AppConfig::from_env().map_err(|e| {
        error!("❌ 설정 로드 실패: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("⚙️ 실행 환경: {}", config.environment.as_str());

    let store = initialize_store(&config).await?;
    let (email_sender, push_sender) = initialize_senders(&config);

    let ctx = AppContext::new(
        config,
        store,
        email_sender,
        push_sender,
        Arc::new(SystemClock),
    );

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(ctx).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 요청 속도 제한, CORS, 보안 헤더, 요청 로깅, 경로 정규화 미들웨어를 적용합니다.
///
/// # Errors
///
/// * `std::io::Error` - 속도 제한 설정 오류, 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(ctx: AppContext) -> io::Result<()> {
    let config = ctx.config.clone();
    let bind_address = config.server.bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(config.rate_limit.per_second)
        .burst_size(config.rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "RATE_LIMIT_PER_SECOND와 RATE_LIMIT_BURST_SIZE는 0보다 커야 합니다",
            )
        })?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        config.rate_limit.per_second, config.rate_limit.burst_size
    );

    let login_limit = login_rate_limit(&config.rate_limit).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!(
        "🛡️ 로그인 속도 제한: IP당 {}회, {}분에 걸쳐 회복",
        config.rate_limit.login_attempts, config.rate_limit.login_window_minutes
    );

    let frontend_origin = config.server.frontend_origin.clone();

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&frontend_origin))
            .wrap(
                middleware::DefaultHeaders::new()
                    .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
                    .add((header::X_FRAME_OPTIONS, "DENY"))
                    .add((header::REFERRER_POLICY, "strict-origin-when-cross-origin")),
            )
            .wrap(middleware::ErrorHandlers::new().default_handler_server(internal_error_detail))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(web::Data::new(ctx.clone()))
            .configure(|cfg| configure_routes(cfg, Some(&login_limit)))
    })
    .workers(config.server.workers)
    .bind(bind_address)?
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    // 로거 초기화 전이므로 결과는 stderr로만 남깁니다
    let result = match profile.as_str() {
        "prod" => dotenv::from_filename(".env.prod").map(|_| ()),
        "dev" => dotenv::from_filename(".env.dev").map(|_| ()),
        _ => dotenv().map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("{} 프로필 env 파일 로드 실패: {}", profile, e);
    }
}

/// `RUST_LOG` 기반 로깅 초기화 (기본값: "info,actix_web=info")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

/// `STORE_BACKEND` 설정에 따라 사용자 저장소를 준비합니다
///
/// MongoDB를 사용하는 경우 연결 확인과 인덱스 생성까지 마친 뒤 반환합니다.
async fn initialize_store(config: &AppConfig) -> io::Result<Arc<dyn UserStore>> {
    match config.database.backend {
        StoreBackend::Mongo => {
            info!("📡 데이터베이스 연결 중...");

            let database = Database::connect(&config.database).await.map_err(|e| {
                error!("❌ MongoDB 연결 실패: {}", e);
                io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string())
            })?;

            let repository = MongoUserRepository::new(&database);
            repository.ensure_indexes().await.map_err(|e| {
                error!("❌ 인덱스 생성 실패: {}", e);
                io::Error::other(e.to_string())
            })?;

            info!("✅ MongoDB 연결 성공: {}", database.database_name());
            Ok(Arc::new(repository))
        }
        StoreBackend::Memory => {
            warn!("⚠️ 인메모리 저장소 사용 중. 재시작하면 모든 데이터가 사라집니다");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
    }
}

/// 메일/푸시 전송기를 선택합니다
///
/// 외부 엔드포인트가 설정되지 않은 경우 로그로만 남기는 구현체를 사용합니다.
fn initialize_senders(config: &AppConfig) -> (Arc<dyn EmailSender>, Arc<dyn PushSender>) {
    let email_sender: Arc<dyn EmailSender> = match &config.mail.api_url {
        Some(api_url) => {
            info!("📧 메일 전송 API 사용: {}", api_url);
            Arc::new(HttpEmailSender::new(api_url.clone(), &config.mail))
        }
        None => {
            warn!("⚠️ EMAIL_API_URL 미설정. 메일은 로그로만 기록됩니다");
            Arc::new(LogEmailSender)
        }
    };

    let push_sender: Arc<dyn PushSender> = match &config.push.relay_url {
        Some(relay_url) => {
            info!("🔔 푸시 릴레이 사용: {}", relay_url);
            Arc::new(RelayPushSender::new(relay_url.clone()))
        }
        None => {
            warn!("⚠️ PUSH_RELAY_URL 미설정. 푸시는 로그로만 기록됩니다");
            Arc::new(LogPushSender)
        }
    };

    (email_sender, push_sender)
}

/// CORS 설정
///
/// 설정된 프론트엔드 Origin과 로컬 개발 서버를 허용합니다.
fn configure_cors(frontend_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(frontend_origin)
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}
