//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{LoginService, UserAccountsCommand, UsersQuery};

/// Parameter object bundling the port implementations used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn UserAccountsCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub login: Arc<dyn LoginService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn UserAccountsCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub login: Arc<dyn LoginService>,
    /// Public origin used to build hypermedia links.
    pub base_url: Url,
}

impl HttpState {
    /// Construct state from a ports bundle and the public base URL.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use event_manager::domain::{AccountPolicy, UserService};
    /// use event_manager::inbound::http::state::{HttpState, HttpStatePorts};
    /// use event_manager::outbound::{email::LoggingEmailNotifier, memory::InMemoryUserRepository};
    /// use url::Url;
    ///
    /// let base_url = Url::parse("http://localhost:8080").unwrap();
    /// let service = Arc::new(UserService::new(
    ///     Arc::new(InMemoryUserRepository::new()),
    ///     Arc::new(LoggingEmailNotifier::new()),
    ///     Arc::new(mockable::DefaultClock),
    ///     AccountPolicy { max_login_attempts: 3, public_base_url: base_url.clone() },
    /// ));
    /// let ports = HttpStatePorts {
    ///     accounts: service.clone(),
    ///     users: service.clone(),
    ///     login: service,
    /// };
    /// let state = HttpState::new(ports, base_url);
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, base_url: Url) -> Self {
        let HttpStatePorts {
            accounts,
            users,
            login,
        } = ports;
        Self {
            accounts,
            users,
            login,
            base_url,
        }
    }

    /// Absolute URL for `path` under the public origin.
    ///
    /// Falls back to the bare origin when `path` cannot be joined.
    pub fn link(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }
}
