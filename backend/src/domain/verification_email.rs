//! Composition of account emails.

use url::Url;

use super::auth::VerificationToken;
use super::user::{EmailAddress, User, UserId};

/// Message handed to an [`EmailNotifier`](super::ports::EmailNotifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: EmailAddress,
    pub subject: String,
    pub body: String,
}

/// Build the link a user follows to verify their email.
///
/// # Examples
/// ```
/// use event_manager::domain::{verification_link, UserId, VerificationToken};
/// use url::Url;
///
/// let base = Url::parse("https://events.example.com/").unwrap();
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
/// let token = VerificationToken::from_string("abc");
/// assert_eq!(
///     verification_link(&base, &id, &token).as_str(),
///     "https://events.example.com/verify-email/3fa85f64-5717-4562-b3fc-2c963f66afa6/abc",
/// );
/// ```
pub fn verification_link(base: &Url, id: &UserId, token: &VerificationToken) -> Url {
    let mut link = base.clone();
    link.set_query(None);
    link.set_fragment(None);
    if let Ok(mut segments) = link.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(["verify-email", id.as_ref(), token.as_str()]);
    }
    link
}

/// Compose the verification email for a freshly registered user.
///
/// Returns `None` when the user has no pending token.
pub fn verification_email(base: &Url, user: &User) -> Option<OutboundEmail> {
    let token = user.verification_token()?;
    let link = verification_link(base, user.id(), token);
    let greeting = user
        .profile()
        .first_name
        .as_ref()
        .map_or_else(|| user.nickname().to_string(), |name| name.as_ref().to_owned());
    Some(OutboundEmail {
        to: user.email().clone(),
        subject: "Verify Your Account".to_owned(),
        body: format!(
            "Hello {greeting},\n\n\
             Thanks for registering with Event Manager. \
             Confirm your email address by opening the link below:\n\n\
             {link}\n\n\
             If you did not create this account you can ignore this message.\n"
        ),
    })
}
