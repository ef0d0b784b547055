//! End-to-end flow tests for sheetboard.
//!
//! These tests walk the board the way a request handler would: register
//! an account, log in, create threads and posts, and render view
//! contexts, all against the in-memory store backend.

use std::sync::Arc;

use sheetboard::{
    login, logout, register_user, thread_slug, Banner, BoardError, BoardService, ContentStore,
    LoginError, MemoryStore, RegistrationError, SessionRegistry, ViewContext,
};

fn board() -> (Arc<MemoryStore>, BoardService, SessionRegistry) {
    let store = Arc::new(MemoryStore::new());
    let service = BoardService::new(store.clone());
    (store, service, SessionRegistry::new())
}

/// Test the id scenario from a cold start: an empty store yields
/// thread id 1, and after that thread lands the next allocation
/// yields 2.
#[tokio::test]
async fn test_first_thread_gets_id_one_then_two() {
    let (_store, service, _registry) = board();

    let first = service
        .create_thread("First", "alice", "hello board")
        .await
        .unwrap();
    assert_eq!(first.thread.thread_id, 1);
    assert_eq!(first.opening_post.post_id, 1);

    let second = service
        .create_thread("Second", "alice", "hello again")
        .await
        .unwrap();
    assert_eq!(second.thread.thread_id, 2);
}

/// Test that a failed append burns its id permanently.
///
/// The gap is the documented outcome: the allocator never hands the
/// lost id out again, and the store never sees a row for it.
#[tokio::test]
async fn test_failed_append_leaves_documented_gap() {
    let (store, service, _registry) = board();

    service.create_thread("One", "alice", "a").await.unwrap();

    store.set_fail_appends(true);
    let result = service.create_thread("Lost", "alice", "b").await;
    assert!(matches!(result, Err(BoardError::StoreUnavailable(_))));
    store.set_fail_appends(false);

    let recovered = service.create_thread("Three", "alice", "c").await.unwrap();
    assert_eq!(recovered.thread.thread_id, 3, "id 2 stays a gap");

    let ids: Vec<i64> = service
        .list_threads()
        .await
        .unwrap()
        .iter()
        .map(|t| t.thread_id)
        .collect();
    assert_eq!(ids, vec![3, 1], "newest first, id 2 absent");
}

/// Test registration followed by login and logout.
#[tokio::test]
async fn test_register_login_logout_flow() {
    let (store, _service, registry) = board();

    let outcome = register_user(store.as_ref(), "carol", "pw123")
        .await
        .unwrap();
    assert!(outcome.just_registered);

    // Registration does not log the user in.
    assert!(!registry.is_logged_in("carol").await.unwrap());

    let session = login(store.as_ref(), &registry, "carol", "pw123")
        .await
        .unwrap();
    assert_eq!(session.username, "carol");
    assert!(session.login_flag);

    assert!(logout(&registry, "carol").await.unwrap());
    assert!(!registry.is_logged_in("carol").await.unwrap());

    // A second logout is a no-op, not an error.
    assert!(!logout(&registry, "carol").await.unwrap());
}

/// Test that registering a taken username is a distinguishable failure.
#[tokio::test]
async fn test_duplicate_registration_is_distinguishable() {
    let (store, _service, _registry) = board();

    register_user(store.as_ref(), "dave", "first").await.unwrap();

    let result = register_user(store.as_ref(), "dave", "second").await;
    assert!(matches!(result, Err(RegistrationError::UsernameTaken)));

    // The original password still works; the second attempt changed
    // nothing.
    assert!(store.check_credentials("dave", "first").await.unwrap());
    assert!(!store.check_credentials("dave", "second").await.unwrap());
}

/// Test that a second login for a live session is idempotent.
#[tokio::test]
async fn test_double_login_is_idempotent() {
    let (store, _service, registry) = board();
    store.seed_user("erin", "pw").await;

    let first = login(store.as_ref(), &registry, "erin", "pw").await.unwrap();
    let second = login(store.as_ref(), &registry, "erin", "pw").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(registry.count().await, 1);
}

/// Test that a wrong password never creates a session.
#[tokio::test]
async fn test_failed_login_leaves_no_session() {
    let (store, _service, registry) = board();
    store.seed_user("frank", "right").await;

    let result = login(store.as_ref(), &registry, "frank", "wrong").await;
    assert!(matches!(result, Err(LoginError::InvalidCredentials)));
    assert_eq!(registry.count().await, 0);
}

/// Test a full posting session: log in, open a thread, reply, read
/// back in order.
#[tokio::test]
async fn test_posting_session() {
    let (store, service, registry) = board();
    store.seed_user("grace", "pw").await;

    login(store.as_ref(), &registry, "grace", "pw").await.unwrap();

    let created = service
        .create_thread("Show and tell", "grace", "look at this")
        .await
        .unwrap();
    let thread_id = created.thread.thread_id;

    service.create_post(thread_id, "grace", "more detail").await.unwrap();
    service.create_post(thread_id, "grace", "last word").await.unwrap();

    let posts = service.list_posts(thread_id).await.unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(
        posts.iter().map(|p| p.post_id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(posts[2].body, "last word");

    assert_eq!(thread_slug(&created.thread), "1=Show_and_tell");
}

/// Test that view contexts reflect the registry per viewer.
///
/// Two overlapping viewers each build their own context; a logged-in
/// viewer's state never leaks into an anonymous one's page.
#[tokio::test]
async fn test_view_contexts_track_viewers_independently() {
    let (store, _service, registry) = board();
    store.seed_user("heidi", "pw").await;
    login(store.as_ref(), &registry, "heidi", "pw").await.unwrap();

    let heidi = ViewContext::for_user(&registry, "heidi", "UTC").await.unwrap();
    let anon = ViewContext::for_user(&registry, "nobody", "UTC").await.unwrap();

    assert!(heidi.logged_in);
    assert_eq!(heidi.banner, Banner::Logged);
    assert_eq!(heidi.current_user.as_deref(), Some("heidi"));

    assert!(!anon.logged_in);
    assert_eq!(anon.banner, Banner::Top);
    assert!(anon.current_user.is_none());
}

/// Test the registration-response context.
#[tokio::test]
async fn test_registration_response_context() {
    let (store, _service, _registry) = board();

    let outcome = register_user(store.as_ref(), "ivan", "pw").await.unwrap();

    let ctx = ViewContext::anonymous("UTC").with_just_registered();
    assert!(ctx.just_registered);
    assert!(!ctx.logged_in, "registration does not log the viewer in");
    assert_eq!(outcome.username, "ivan");

    let rejected = ViewContext::anonymous("UTC")
        .with_notice("Cannot register account: username already taken");
    assert!(rejected.notice.unwrap().contains("already taken"));
}

/// Test that a store outage surfaces without corrupting id sequences.
#[tokio::test]
async fn test_store_outage_is_transient() {
    let (store, service, _registry) = board();

    service.create_thread("Before", "alice", "a").await.unwrap();

    store.set_fail_reads(true);
    assert!(matches!(
        service.list_threads().await,
        Err(BoardError::StoreUnavailable(_))
    ));
    assert!(matches!(
        service.create_thread("During", "alice", "b").await,
        Err(BoardError::StoreUnavailable(_))
    ));
    store.set_fail_reads(false);

    // The failed read consumed no id; the next thread is simply 2.
    let after = service.create_thread("After", "alice", "c").await.unwrap();
    assert_eq!(after.thread.thread_id, 2);
}
