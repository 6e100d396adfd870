//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod email_notifier;
mod login_service;
mod user_accounts_command;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use email_notifier::MockEmailNotifier;
pub use email_notifier::{EmailNotifier, EmailNotifierError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use user_accounts_command::MockUserAccountsCommand;
pub use user_accounts_command::{NewAccount, UserAccountsCommand};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UniqueField, UpdateOutcome, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
