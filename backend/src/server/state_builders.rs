//! Builders wiring the account service into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};

use event_manager::domain::ports::{EmailNotifier, UserRepository};
use event_manager::domain::{AccountPolicy, UserService};
use event_manager::inbound::http::state::{HttpState, HttpStatePorts};
use event_manager::outbound::email::LoggingEmailNotifier;
use event_manager::outbound::memory::InMemoryUserRepository;
use event_manager::outbound::persistence::DieselUserRepository;

use super::ServerConfig;

fn ports_for<R>(
    repo: Arc<R>,
    notifier: Arc<dyn EmailNotifier>,
    policy: AccountPolicy,
) -> HttpStatePorts
where
    R: UserRepository + 'static,
{
    let service = Arc::new(UserService::new(
        repo,
        notifier,
        Arc::new(DefaultClock),
        policy,
    ));
    HttpStatePorts {
        accounts: service.clone(),
        users: service.clone(),
        login: service,
    }
}

/// Configured notifier, or the logging one when no relay is set up.
fn notifier_for(config: &ServerConfig) -> Arc<dyn EmailNotifier> {
    match &config.notifier {
        Some(notifier) => {
            info!("delivering account emails through the configured relay");
            Arc::clone(notifier)
        }
        None => {
            warn!("no SMTP relay configured; account emails are only logged");
            Arc::new(LoggingEmailNotifier::new())
        }
    }
}

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over the in-memory repository.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let policy = config.policy.clone();
    let base_url = policy.public_base_url.clone();
    let notifier = notifier_for(config);
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL user repository");
            ports_for(
                Arc::new(DieselUserRepository::new(pool.clone())),
                notifier,
                policy,
            )
        }
        None => {
            warn!("no database configured; accounts are kept in memory");
            ports_for(Arc::new(InMemoryUserRepository::new()), notifier, policy)
        }
    };
    web::Data::new(HttpState::new(ports, base_url))
}
