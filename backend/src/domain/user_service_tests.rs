//! Tests for the account domain service.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{EmailNotifierError, MockEmailNotifier, MockUserRepository};
use crate::domain::{ErrorCode, PersonName, UserProfile};
use crate::outbound::memory::InMemoryUserRepository;

const PASSWORD: &str = "Secur3*Pass";

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn policy() -> AccountPolicy {
    AccountPolicy {
        max_login_attempts: 3,
        public_base_url: Url::parse("http://localhost:8080").expect("valid base url"),
    }
}

fn service(repo: MockUserRepository, notifier: MockEmailNotifier) -> UserService<MockUserRepository> {
    service_over(Arc::new(repo), notifier)
}

fn service_over<R: UserRepository>(repo: Arc<R>, notifier: MockEmailNotifier) -> UserService<R> {
    UserService::new(
        repo,
        Arc::new(notifier),
        Arc::new(FixtureClock { utc_now: now() }),
        policy(),
    )
}

/// In-memory store whose `count` yields first, widening the window between
/// the emptiness check and the insert that follows it.
struct SlowCountRepository(InMemoryUserRepository);

#[async_trait]
impl UserRepository for SlowCountRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.0.insert(user).await
    }

    async fn insert_first(&self, user: &User) -> Result<bool, UserPersistenceError> {
        self.0.insert_first(user).await
    }

    async fn update(&self, user: &User) -> Result<UpdateOutcome, UserPersistenceError> {
        self.0.update(user).await
    }

    async fn record_failed_login(
        &self,
        id: &UserId,
        max_attempts: u32,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.0.record_failed_login(id, max_attempts, at).await
    }

    async fn record_login(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.0.record_login(id, at).await
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        self.0.delete(id).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.0.find_by_id(id).await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.0.find_by_email(email).await
    }

    async fn find_by_nickname(
        &self,
        nickname: &Nickname,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.0.find_by_nickname(nickname).await
    }

    async fn list(&self, skip: u64, limit: u32) -> Result<Vec<User>, UserPersistenceError> {
        self.0.list(skip, limit).await
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.0.count().await
    }
}

#[fixture]
fn password_hash() -> PasswordHash {
    PasswordHash::hash(&Password::new(PASSWORD).expect("strong password")).expect("hash")
}

fn stored_user(email: &str, nickname: &str, role: UserRole, verified: bool, hash: PasswordHash) -> User {
    User::register(
        NewUser {
            email: EmailAddress::new(email).expect("valid email"),
            nickname: Nickname::new(nickname).expect("valid nickname"),
            profile: UserProfile::default(),
            role,
            password_hash: hash,
            verification_token: (!verified).then(|| VerificationToken::from_string("tok")),
            email_verified: verified,
        },
        now(),
    )
}

fn new_account(email: &str, nickname: Option<&str>) -> NewAccount {
    NewAccount {
        email: EmailAddress::new(email).expect("valid email"),
        nickname: nickname.map(|n| Nickname::new(n).expect("valid nickname")),
        profile: UserProfile {
            first_name: Some(PersonName::new("John").expect("valid name")),
            ..UserProfile::default()
        },
        password: Password::new(PASSWORD).expect("strong password"),
    }
}

fn free_lookups(repo: &mut MockUserRepository) {
    repo.expect_find_by_email().returning(|_| Ok(None));
    repo.expect_find_by_nickname().returning(|_| Ok(None));
}

fn assert_error(error: &Error, code: ErrorCode, message: &str) {
    assert_eq!(error.code(), code);
    assert_eq!(error.message(), message);
}

#[rstest]
#[tokio::test]
async fn first_registration_becomes_verified_admin() {
    let mut repo = MockUserRepository::new();
    free_lookups(&mut repo);
    repo.expect_count().times(1).return_once(|| Ok(0));
    repo.expect_insert_first()
        .withf(|user| {
            user.role() == UserRole::Admin
                && user.email_verified()
                && user.verification_token().is_none()
        })
        .times(1)
        .return_once(|_| Ok(true));
    repo.expect_insert().never();
    let mut notifier = MockEmailNotifier::new();
    notifier.expect_send().never();

    let user = service(repo, notifier)
        .register(new_account("admin@example.com", Some("admin")))
        .await
        .expect("registration succeeds");

    assert_eq!(user.role(), UserRole::Admin);
    assert_eq!(user.created_at(), now());
}

#[rstest]
#[tokio::test]
async fn losing_the_first_account_race_registers_normally() {
    let mut repo = MockUserRepository::new();
    free_lookups(&mut repo);
    repo.expect_count().return_once(|| Ok(0));
    repo.expect_insert_first().times(1).return_once(|_| Ok(false));
    repo.expect_insert()
        .withf(|user| user.role() == UserRole::Anonymous && !user.email_verified())
        .times(1)
        .return_once(|_| Ok(()));
    let mut notifier = MockEmailNotifier::new();
    notifier.expect_send().times(1).return_once(|_| Ok(()));

    let user = service(repo, notifier)
        .register(new_account("second@example.com", Some("second")))
        .await
        .expect("registration succeeds");

    assert_eq!(user.role(), UserRole::Anonymous);
}

#[rstest]
#[tokio::test]
async fn concurrent_registrations_yield_one_admin() {
    let repo = Arc::new(SlowCountRepository(InMemoryUserRepository::new()));
    let mut notifier = MockEmailNotifier::new();
    notifier.expect_send().returning(|_| Ok(()));
    let service = service_over(Arc::clone(&repo), notifier);

    let (first, second) = tokio::join!(
        service.register(new_account("ada@example.com", Some("ada"))),
        service.register(new_account("grace@example.com", Some("grace"))),
    );

    let roles = [
        first.expect("first registration").role(),
        second.expect("second registration").role(),
    ];
    let admins = roles.iter().filter(|role| **role == UserRole::Admin).count();
    assert_eq!(admins, 1, "roles were {roles:?}");
    assert!(roles.contains(&UserRole::Anonymous));
    assert_eq!(repo.count().await.expect("count"), 2);
}

#[rstest]
#[tokio::test]
async fn later_registration_is_anonymous_and_emailed() {
    let mut repo = MockUserRepository::new();
    free_lookups(&mut repo);
    repo.expect_count().return_once(|| Ok(1));
    repo.expect_insert()
        .withf(|user| user.role() == UserRole::Anonymous && !user.email_verified())
        .times(1)
        .return_once(|_| Ok(()));
    let mut notifier = MockEmailNotifier::new();
    notifier
        .expect_send()
        .withf(|email| {
            email.to.as_ref() == "john.doe@example.com"
                && email.body.starts_with("Hello John,")
                && email.body.contains("http://localhost:8080/verify-email/")
        })
        .times(1)
        .return_once(|_| Ok(()));

    let user = service(repo, notifier)
        .register(new_account("John.Doe@example.com", None))
        .await
        .expect("registration succeeds");

    assert_eq!(user.role(), UserRole::Anonymous);
    assert_eq!(user.nickname().as_ref().split('_').count(), 3);
}

#[rstest]
#[tokio::test]
async fn registration_survives_email_failure() {
    let mut repo = MockUserRepository::new();
    free_lookups(&mut repo);
    repo.expect_count().return_once(|| Ok(4));
    repo.expect_insert().return_once(|_| Ok(()));
    let mut notifier = MockEmailNotifier::new();
    notifier
        .expect_send()
        .return_once(|_| Err(EmailNotifierError::unavailable("relay down")));

    let result = service(repo, notifier)
        .register(new_account("john.doe@example.com", Some("john_doe")))
        .await;

    assert!(result.is_ok());
}

#[rstest]
#[tokio::test]
async fn registration_rejects_taken_email(password_hash: PasswordHash) {
    let existing = stored_user("john.doe@example.com", "john", UserRole::Authenticated, true, password_hash);
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_insert().never();

    let error = service(repo, MockEmailNotifier::new())
        .register(new_account("john.doe@example.com", None))
        .await
        .expect_err("duplicate email rejected");

    assert_error(&error, ErrorCode::InvalidRequest, "Email already exists");
    assert_eq!(
        error.details(),
        Some(&json!({"field": "email", "code": "email_taken"}))
    );
}

#[rstest]
#[tokio::test]
async fn registration_rejects_taken_nickname(password_hash: PasswordHash) {
    let existing = stored_user("other@example.com", "john_doe", UserRole::Authenticated, true, password_hash);
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(|_| Ok(None));
    repo.expect_find_by_nickname()
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_insert().never();

    let error = service(repo, MockEmailNotifier::new())
        .register(new_account("john.doe@example.com", Some("john_doe")))
        .await
        .expect_err("duplicate nickname rejected");

    assert_error(&error, ErrorCode::InvalidRequest, "Nickname already exists");
}

#[rstest]
#[tokio::test]
async fn racing_insert_maps_to_duplicate_error() {
    let mut repo = MockUserRepository::new();
    free_lookups(&mut repo);
    repo.expect_count().return_once(|| Ok(2));
    repo.expect_insert()
        .return_once(|_| Err(UserPersistenceError::duplicate(UniqueField::Email)));

    let error = service(repo, MockEmailNotifier::new())
        .register(new_account("john.doe@example.com", Some("john_doe")))
        .await
        .expect_err("constraint violation surfaces");

    assert_error(&error, ErrorCode::InvalidRequest, "Email already exists");
}

#[rstest]
#[tokio::test]
async fn staff_creation_defaults_to_authenticated() {
    let mut repo = MockUserRepository::new();
    free_lookups(&mut repo);
    repo.expect_count().return_once(|| Ok(3));
    repo.expect_insert()
        .withf(|user| user.role() == UserRole::Authenticated)
        .return_once(|_| Ok(()));
    let mut notifier = MockEmailNotifier::new();
    notifier.expect_send().times(1).return_once(|_| Ok(()));

    let user = service(repo, notifier)
        .create(new_account("staff@example.com", None), None)
        .await
        .expect("creation succeeds");

    assert_eq!(user.role(), UserRole::Authenticated);
}

#[rstest]
#[tokio::test]
async fn update_requires_a_field() {
    let error = service(MockUserRepository::new(), MockEmailNotifier::new())
        .update(&UserId::random(), UserUpdate::default())
        .await
        .expect_err("empty update rejected");

    assert_error(
        &error,
        ErrorCode::InvalidRequest,
        "At least one field must be provided for update",
    );
}

#[rstest]
#[tokio::test]
async fn update_accepts_own_email_and_nickname(password_hash: PasswordHash) {
    let user = stored_user("john.doe@example.com", "john_doe", UserRole::Authenticated, true, password_hash);
    let id = user.id().clone();
    let (by_id, by_email, by_nickname) = (user.clone(), user.clone(), user.clone());
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(move |_| Ok(Some(by_id)));
    repo.expect_find_by_email()
        .return_once(move |_| Ok(Some(by_email)));
    repo.expect_find_by_nickname()
        .return_once(move |_| Ok(Some(by_nickname)));
    repo.expect_update()
        .withf(|user| {
            user.profile()
                .github_profile_url
                .as_ref()
                .is_some_and(|url| url.as_ref() == "https://github.com/jdoe")
        })
        .times(1)
        .return_once(|_| Ok(UpdateOutcome::Updated));

    let update = UserUpdate {
        email: Some(user.email().clone()),
        nickname: Some(user.nickname().clone()),
        github_profile_url: Some(
            crate::domain::ProfileUrl::new("https://github.com/jdoe").expect("valid url"),
        ),
        ..UserUpdate::default()
    };
    let updated = service(repo, MockEmailNotifier::new())
        .update(&id, update)
        .await
        .expect("update succeeds");

    assert_eq!(updated.email().as_ref(), "john.doe@example.com");
}

#[rstest]
#[tokio::test]
async fn update_of_missing_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    let update = UserUpdate {
        bio: Some(crate::domain::Bio::new("hello").expect("valid bio")),
        ..UserUpdate::default()
    };

    let error = service(repo, MockEmailNotifier::new())
        .update(&UserId::random(), update)
        .await
        .expect_err("missing user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn stale_update_is_a_conflict(password_hash: PasswordHash) {
    let user = stored_user("john.doe@example.com", "john_doe", UserRole::Authenticated, true, password_hash);
    let id = user.id().clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(move |_| Ok(Some(user)));
    repo.expect_update()
        .times(1)
        .return_once(|_| Ok(UpdateOutcome::Stale));
    let update = UserUpdate {
        bio: Some(crate::domain::Bio::new("hello").expect("valid bio")),
        ..UserUpdate::default()
    };

    let error = service(repo, MockEmailNotifier::new())
        .update(&id, update)
        .await
        .expect_err("concurrent write wins");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(
        error.message(),
        format!("User {id} was modified concurrently; retry the request")
    );
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_reports_missing_rows(#[case] removed: bool, #[case] expected: Option<ErrorCode>) {
    let mut repo = MockUserRepository::new();
    repo.expect_delete().return_once(move |_| Ok(removed));

    let result = service(repo, MockEmailNotifier::new())
        .delete(&UserId::random())
        .await;

    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[case("tok", true)]
#[case("wrong", false)]
#[tokio::test]
async fn verify_email_checks_token(
    password_hash: PasswordHash,
    #[case] presented: &str,
    #[case] accepted: bool,
) {
    let user = stored_user("john.doe@example.com", "john_doe", UserRole::Anonymous, false, password_hash);
    let id = user.id().clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(move |_| Ok(Some(user)));
    repo.expect_update()
        .withf(|user| user.email_verified() && user.role() == UserRole::Authenticated)
        .times(usize::from(accepted))
        .returning(|_| Ok(UpdateOutcome::Updated));

    let result = service(repo, MockEmailNotifier::new())
        .verify_email(&id, presented)
        .await;

    match result {
        Ok(user) => {
            assert!(accepted);
            assert_eq!(user.role(), UserRole::Authenticated);
        }
        Err(error) => {
            assert!(!accepted);
            assert_error(&error, ErrorCode::InvalidRequest, INVALID_TOKEN_MESSAGE);
        }
    }
}

#[rstest]
#[tokio::test]
async fn verify_email_for_unknown_user_is_invalid() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let error = service(repo, MockEmailNotifier::new())
        .verify_email(&UserId::random(), "tok")
        .await
        .expect_err("unknown user");

    assert_error(&error, ErrorCode::InvalidRequest, INVALID_TOKEN_MESSAGE);
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("john.doe@example.com", password).expect("credentials shape")
}

#[rstest]
#[tokio::test]
async fn unknown_email_fails_generically() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().return_once(|_| Ok(None));

    let error = service(repo, MockEmailNotifier::new())
        .authenticate(&credentials(PASSWORD))
        .await
        .expect_err("unknown user");

    assert_error(&error, ErrorCode::Unauthorized, LOGIN_FAILED_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn unverified_account_fails_generically(password_hash: PasswordHash) {
    let user = stored_user("john.doe@example.com", "john_doe", UserRole::Anonymous, false, password_hash);
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().return_once(move |_| Ok(Some(user)));
    repo.expect_record_failed_login().never();
    repo.expect_record_login().never();

    let error = service(repo, MockEmailNotifier::new())
        .authenticate(&credentials(PASSWORD))
        .await
        .expect_err("unverified user");

    assert_error(&error, ErrorCode::Unauthorized, LOGIN_FAILED_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn successful_login_resets_failures(password_hash: PasswordHash) {
    let mut user = stored_user("john.doe@example.com", "john_doe", UserRole::Authenticated, true, password_hash);
    user.record_failed_login(3, now());
    let id = user.id().clone();
    let mut logged_in = user.clone();
    logged_in.record_successful_login(now());
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().return_once(move |_| Ok(Some(user)));
    repo.expect_record_login()
        .withf(move |user_id, at| *user_id == id && *at == now())
        .times(1)
        .return_once(move |_, _| Ok(Some(logged_in)));
    repo.expect_update().never();

    let user = service(repo, MockEmailNotifier::new())
        .authenticate(&credentials(PASSWORD))
        .await
        .expect("login succeeds");

    assert_eq!(user.failed_login_attempts(), 0);
    assert_eq!(user.last_login_at(), Some(now()));
}

#[rstest]
#[tokio::test]
async fn wrong_password_is_counted_in_place(password_hash: PasswordHash) {
    let user = stored_user("john.doe@example.com", "john_doe", UserRole::Authenticated, true, password_hash);
    let mut counted = user.clone();
    counted.record_failed_login(3, now());
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().return_once(move |_| Ok(Some(user)));
    repo.expect_record_failed_login()
        .withf(|_, max, at| *max == 3 && *at == now())
        .times(1)
        .return_once(move |_, _, _| Ok(Some(counted)));
    repo.expect_update().never();

    let error = service(repo, MockEmailNotifier::new())
        .authenticate(&credentials("Wr0ng*Pass"))
        .await
        .expect_err("wrong password");

    assert_error(&error, ErrorCode::Unauthorized, LOGIN_FAILED_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn lock_landing_before_the_login_write_blocks_it(password_hash: PasswordHash) {
    let user = stored_user("john.doe@example.com", "john_doe", UserRole::Authenticated, true, password_hash);
    let mut locked = user.clone();
    for _ in 0..3 {
        locked.record_failed_login(3, now());
    }
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().return_once(move |_| Ok(Some(user)));
    repo.expect_record_login().return_once(|_, _| Ok(None));
    repo.expect_find_by_id().return_once(move |_| Ok(Some(locked)));

    let error = service(repo, MockEmailNotifier::new())
        .authenticate(&credentials(PASSWORD))
        .await
        .expect_err("locked meanwhile");

    assert_error(&error, ErrorCode::InvalidRequest, ACCOUNT_LOCKED_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn repeated_failures_lock_then_block(password_hash: PasswordHash) {
    let user = stored_user("john.doe@example.com", "john_doe", UserRole::Authenticated, true, password_hash);
    let repo = Arc::new(InMemoryUserRepository::new());
    repo.insert(&user).await.expect("seed user");
    let service = service_over(Arc::clone(&repo), MockEmailNotifier::new());

    for _ in 0..3 {
        let error = service
            .authenticate(&credentials("Wr0ng*Pass"))
            .await
            .expect_err("wrong password");
        assert_error(&error, ErrorCode::Unauthorized, LOGIN_FAILED_MESSAGE);
    }
    let stored = repo.find_by_id(user.id()).await.expect("lookup").expect("stored");
    assert!(stored.is_locked());

    let error = service
        .authenticate(&credentials(PASSWORD))
        .await
        .expect_err("locked account");
    assert_error(&error, ErrorCode::InvalidRequest, ACCOUNT_LOCKED_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn concurrent_failures_are_all_counted(password_hash: PasswordHash) {
    let user = stored_user("john.doe@example.com", "john_doe", UserRole::Authenticated, true, password_hash);
    let repo = Arc::new(InMemoryUserRepository::new());
    repo.insert(&user).await.expect("seed user");
    let service = service_over(Arc::clone(&repo), MockEmailNotifier::new());
    let wrong = credentials("Wr0ng*Pass");

    let (first, second, third) = tokio::join!(
        service.authenticate(&wrong),
        service.authenticate(&wrong),
        service.authenticate(&wrong),
    );

    for outcome in [first, second, third] {
        assert_error(
            &outcome.expect_err("wrong password"),
            ErrorCode::Unauthorized,
            LOGIN_FAILED_MESSAGE,
        );
    }
    let stored = repo.find_by_id(user.id()).await.expect("lookup").expect("stored");
    assert_eq!(stored.failed_login_attempts(), 3);
    assert!(stored.is_locked());
}

#[rstest]
#[tokio::test]
async fn unlock_requires_locked_account(password_hash: PasswordHash) {
    let user = stored_user("john.doe@example.com", "john_doe", UserRole::Authenticated, true, password_hash);
    let id = user.id().clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(move |_| Ok(Some(user)));
    repo.expect_update().never();

    let error = service(repo, MockEmailNotifier::new())
        .unlock(&id)
        .await
        .expect_err("not locked");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn reset_password_replaces_hash(password_hash: PasswordHash) {
    let mut user = stored_user("john.doe@example.com", "john_doe", UserRole::Authenticated, true, password_hash);
    for _ in 0..3 {
        user.record_failed_login(3, now());
    }
    let id = user.id().clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(move |_| Ok(Some(user)));
    repo.expect_update()
        .withf(|user| !user.is_locked() && user.password_hash().verify("N3w*Secret"))
        .times(1)
        .return_once(|_| Ok(UpdateOutcome::Updated));

    service(repo, MockEmailNotifier::new())
        .reset_password(&id, Password::new("N3w*Secret").expect("strong password"))
        .await
        .expect("reset succeeds");
}

#[rstest]
#[tokio::test]
async fn list_users_pairs_rows_with_total(password_hash: PasswordHash) {
    let user = stored_user("john.doe@example.com", "john_doe", UserRole::Authenticated, true, password_hash);
    let mut repo = MockUserRepository::new();
    repo.expect_list()
        .withf(|skip, limit| *skip == 10 && *limit == 5)
        .return_once(move |_, _| Ok(vec![user]));
    repo.expect_count().return_once(|| Ok(11));

    let request = PageRequest::new(Some(10), Some(5)).expect("valid request");
    let page = service(repo, MockEmailNotifier::new())
        .list_users(request)
        .await
        .expect("list succeeds");

    assert_eq!(page.items().len(), 1);
    assert_eq!(page.total(), 11);
    assert_eq!(page.request().page_number(), 3);
}

#[rstest]
#[tokio::test]
async fn connection_failures_are_unavailable() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Err(UserPersistenceError::connection("pool timed out")));

    let error = service(repo, MockEmailNotifier::new())
        .get_user(&UserId::random())
        .await
        .expect_err("connection failure");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
