//! Shared application state injected into every handler.

use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{
    ProductService, ReviewService, TokenHasher, TokenService, TokenTtls, UserService,
};
use crate::config::Config;
use crate::domain::background::BackgroundTasks;
use crate::infrastructure::mailer::Mailer;
use crate::infrastructure::persistence::{
    PgHealthCheck, PgProductRepository, PgReviewRepository, PgTokenRepository, PgUserRepository,
};

pub type Products = ProductService<PgProductRepository>;
pub type Reviews = ReviewService<PgReviewRepository, PgProductRepository>;
pub type Users = UserService<PgUserRepository, PgTokenRepository>;
pub type Tokens = TokenService<PgTokenRepository>;

/// Settings the state needs beyond the pool. Not `Debug`: holds the signing secret.
#[derive(Clone)]
pub struct StateSettings {
    pub environment: String,
    pub token_signing_secret: String,
    pub query_timeout: Duration,
    pub token_ttls: TokenTtls,
    /// First retry delay for outbound mail.
    pub mail_retry_base: Duration,
}

impl From<&Config> for StateSettings {
    fn from(config: &Config) -> Self {
        Self {
            environment: config.app_env.clone(),
            token_signing_secret: config.token_signing_secret.clone(),
            query_timeout: config.query_timeout(),
            token_ttls: config.token_ttls(),
            mail_retry_base: Duration::from_millis(500),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub product_service: Arc<Products>,
    pub review_service: Arc<Reviews>,
    pub user_service: Arc<Users>,
    pub token_service: Arc<Tokens>,
    pub health: Arc<PgHealthCheck>,
    pub mailer: Arc<dyn Mailer>,
    pub background: BackgroundTasks,
    pub environment: String,
    pub mail_retry_base: Duration,
}

impl AppState {
    /// Wires repositories and services over `pool`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token signing secret cannot key the HMAC.
    pub fn new(
        pool: Arc<PgPool>,
        settings: StateSettings,
        mailer: Arc<dyn Mailer>,
        background: BackgroundTasks,
    ) -> Result<Self> {
        let timeout = settings.query_timeout;

        let products =
            Arc::new(PgProductRepository::new(pool.clone()).with_timeout(timeout));
        let reviews = Arc::new(PgReviewRepository::new(pool.clone()).with_timeout(timeout));
        let users = Arc::new(PgUserRepository::new(pool.clone()).with_timeout(timeout));
        let tokens = Arc::new(PgTokenRepository::new(pool.clone()).with_timeout(timeout));

        let hasher = TokenHasher::new(settings.token_signing_secret.as_bytes())
            .map_err(|e| anyhow::anyhow!("invalid TOKEN_SIGNING_SECRET: {e}"))?;
        let token_service = Arc::new(TokenService::new(tokens, hasher));

        Ok(Self {
            product_service: Arc::new(ProductService::new(products.clone())),
            review_service: Arc::new(ReviewService::new(reviews, products)),
            user_service: Arc::new(UserService::new(
                users,
                token_service.clone(),
                settings.token_ttls,
            )),
            token_service,
            health: Arc::new(PgHealthCheck::new(pool).with_timeout(timeout)),
            mailer,
            background,
            environment: settings.environment,
            mail_retry_base: settings.mail_retry_base,
        })
    }
}
