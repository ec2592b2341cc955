use portfolio_core::{init_db, AuthService, MemoryRecordStore, Role};

#[test]
fn seeded_accounts_authenticate_without_password_field() {
    let store = MemoryRecordStore::new();
    init_db(&store).unwrap();
    let auth = AuthService::new(&store);

    let admin = auth
        .authenticate("admin@school.edu", "password")
        .unwrap()
        .unwrap();
    assert_eq!(admin.id, 1);
    assert!(admin.is_admin());

    let student = auth
        .authenticate("student1@school.edu", "password")
        .unwrap()
        .unwrap();
    assert_eq!(student.role, Role::Student);
    assert_eq!(student.name, "Student One");

    let json = serde_json::to_value(&student).unwrap();
    assert!(json.get("password").is_none());
}

#[test]
fn mismatched_credentials_return_none() {
    let store = MemoryRecordStore::new();
    init_db(&store).unwrap();
    let auth = AuthService::new(&store);

    for (email, password) in [
        ("admin@school.edu", "wrong"),
        ("admin@school.edu", ""),
        ("ADMIN@school.edu", "password"),
        ("nobody@school.edu", "password"),
        ("", ""),
    ] {
        assert!(auth.authenticate(email, password).unwrap().is_none());
    }
}

#[test]
fn unseeded_store_has_no_users() {
    let store = MemoryRecordStore::new();
    let auth = AuthService::new(&store);
    assert!(auth
        .authenticate("admin@school.edu", "password")
        .unwrap()
        .is_none());
    assert!(auth.find_user(1).unwrap().is_none());
}

#[test]
fn find_user_returns_profile_by_id() {
    let store = MemoryRecordStore::new();
    init_db(&store).unwrap();
    let auth = AuthService::new(&store);

    let profile = auth.find_user(2).unwrap().unwrap();
    assert_eq!(profile.email, "student1@school.edu");
}
