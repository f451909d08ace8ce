//! Process-wide container selection and the in-memory drivers behind it

use firekit::di::{
    container, reset_test_drivers, test_auth_driver, test_container, test_database_driver,
    use_container, use_real_container, use_test_container, CreateUser, ServiceContainer,
    ServiceId,
};
use firekit::drivers::fake_id_token;
use firekit::guard::disable_env_looks_like_prod_check;
use firekit::FirekitError;
use serde_json::json;
use serial_test::serial;
use std::sync::Arc;

fn same_instance<T: ?Sized, U: ?Sized>(a: &Arc<T>, b: &Arc<U>) -> bool {
    Arc::as_ptr(a) as *const u8 == Arc::as_ptr(b) as *const u8
}

fn setup() {
    firekit::logging::init();
    disable_env_looks_like_prod_check();
    reset_test_drivers();
}

#[test]
#[serial]
fn test_switching_between_real_and_test() {
    setup();

    let real = use_real_container();
    let test = use_test_container();
    assert!(Arc::ptr_eq(&container().unwrap(), &test));

    let real_again = use_real_container();
    assert!(Arc::ptr_eq(&real, &real_again));
    assert!(Arc::ptr_eq(&container().unwrap(), &real));

    let test_again = use_test_container();
    assert!(Arc::ptr_eq(&test, &test_again));
}

#[test]
#[serial]
fn test_in_memory_drivers_are_shared_across_containers() {
    setup();

    let first = test_container();
    let second = test_container();

    let auth = first.auth().unwrap();
    assert!(same_instance(&auth, &first.auth().unwrap()));
    assert!(same_instance(&auth, &second.auth().unwrap()));
    assert!(same_instance(&auth, &test_auth_driver().unwrap()));

    let database = first.database().unwrap();
    assert!(same_instance(&database, &second.database().unwrap()));
    assert!(same_instance(&database, &test_database_driver().unwrap()));
}

#[test]
#[serial]
fn test_custom_container_without_bindings() {
    setup();

    use_container(Arc::new(ServiceContainer::new()));

    let err = container().unwrap().make(ServiceId::Auth).unwrap_err();
    assert!(matches!(err, FirekitError::Unbound(ref id) if id == "auth"));
}

#[tokio::test]
#[serial]
async fn test_auth_round_trip_through_container() {
    setup();
    use_test_container();

    let auth = container().unwrap().auth().unwrap();
    auth.create_user(CreateUser::with_uid("u1").email("a@b.com"))
        .await
        .unwrap();

    let verified = auth.verify_id_token(&fake_id_token("u1")).await.unwrap();
    assert_eq!(verified.uid, "u1");

    // Every resolution shares the one in-memory driver.
    let stored = test_auth_driver().unwrap().user("u1").unwrap();
    assert_eq!(stored.email, "a@b.com");

    let err = container()
        .unwrap()
        .auth()
        .unwrap()
        .create_user(CreateUser::with_uid("u1"))
        .await
        .unwrap_err();
    assert!(matches!(err, FirekitError::UserAlreadyExists(_)));
}

#[tokio::test]
#[serial]
async fn test_reset_clears_users() {
    setup();
    use_test_container();

    let auth = container().unwrap().auth().unwrap();
    auth.create_user(CreateUser::with_uid("u1")).await.unwrap();

    reset_test_drivers();

    let err = auth
        .verify_id_token(&fake_id_token("u1"))
        .await
        .unwrap_err();
    assert!(matches!(err, FirekitError::UserNotFound(ref uid) if uid == "u1"));
}

#[tokio::test]
#[serial]
async fn test_database_round_trip_through_container() {
    setup();
    use_test_container();

    let db = container().unwrap().database().unwrap();
    db.set_document("rooms/r1", json!({ "open": true }))
        .await
        .unwrap();

    let again = container().unwrap().database().unwrap();
    assert_eq!(
        again.get_document("rooms/r1").await.unwrap(),
        Some(json!({ "open": true }))
    );
}

#[test]
#[serial]
fn test_test_container_config_reads_environment() {
    setup();
    std::env::set_var("FIREKIT_IT_CONFIG_VALUE", "from-env");

    let config = use_test_container().config().unwrap();
    let value = config.get_or_throw("FIREKIT_IT_CONFIG_VALUE", None);
    std::env::remove_var("FIREKIT_IT_CONFIG_VALUE");

    assert_eq!(value.unwrap(), "from-env");
    assert!(!config.has("FIREKIT_IT_CONFIG_VALUE_ABSENT"));
    assert_eq!(config.get_or("FIREKIT_IT_CONFIG_VALUE_ABSENT", "fallback"), "fallback");
}
