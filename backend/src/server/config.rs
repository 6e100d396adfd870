//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use event_manager::domain::AccountPolicy;
use event_manager::domain::ports::EmailNotifier;
use event_manager::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) policy: AccountPolicy,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) notifier: Option<Arc<dyn EmailNotifier>>,
}

impl ServerConfig {
    /// Construct a server configuration from session and account settings.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        policy: AccountPolicy,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            policy,
            db_pool: None,
            notifier: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one, accounts live in process memory and vanish on restart.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Deliver account emails through `notifier`.
    ///
    /// Without one, emails are written to the log.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn EmailNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }
}
