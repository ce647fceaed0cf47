//! 애플리케이션 컨텍스트
//!
//! `main`에서 한 번 조립되어 `web::Data<AppContext>`로 모든 핸들러에 전달됩니다.
//! 전역 싱글톤 없이 저장소, 시계, 메일/푸시 전송기를 주입하므로 테스트에서는
//! 인메모리 저장소와 수동 시계, 기록용 전송기로 교체할 수 있습니다.
//!
//! ```rust,ignore
//! let ctx = AppContext::new(
//!     config,
//!     Arc::new(InMemoryUserStore::new()),
//!     Arc::new(LogEmailSender),
//!     Arc::new(LogPushSender),
//!     Arc::new(SystemClock),
//! );
//! App::new().app_data(web::Data::new(ctx.clone()))
//! ```

use std::sync::Arc;

use crate::config::AppConfig;
use crate::repositories::users::UserStore;
use crate::services::auth::{
    AuthService, GoogleAuthService, LockoutGuard, PasswordHasher, TokenService,
};
use crate::services::notifications::{EmailSender, NotificationDispatcher, PushSender};
use crate::services::push::PushService;
use crate::services::users::UserService;
use crate::utils::clock::Clock;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn UserStore>,
    pub clock: Arc<dyn Clock>,
    pub tokens: TokenService,
    pub auth: AuthService,
    pub users: UserService,
    pub google: GoogleAuthService,
    pub push: PushService,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn UserStore>,
        email_sender: Arc<dyn EmailSender>,
        push_sender: Arc<dyn PushSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = TokenService::new(&config.auth);
        let hasher = PasswordHasher::new(config.password.bcrypt_cost);
        let lockout = LockoutGuard::new(&config.auth);
        let notifier = NotificationDispatcher::new(
            &config,
            email_sender,
            push_sender,
            store.clone(),
            clock.clone(),
        );

        let auth = AuthService::new(
            store.clone(),
            clock.clone(),
            tokens.clone(),
            hasher,
            lockout,
            notifier.clone(),
        );
        let users = UserService::new(store.clone(), clock.clone(), hasher, notifier.clone());
        let google = GoogleAuthService::new(
            config.google.clone(),
            store.clone(),
            clock.clone(),
            tokens.clone(),
            notifier.clone(),
        );
        let push = PushService::new(
            config.push.vapid_public_key.clone(),
            store.clone(),
            clock.clone(),
            notifier,
        );

        Self {
            config: Arc::new(config),
            store,
            clock,
            tokens,
            auth,
            users,
            google,
            push,
        }
    }
}
