use personhub_core::db::DbPool;
use personhub_core::{Person, PersonFilter, PersonRepository, RepoError, SqlitePersonRepository};

fn repo() -> SqlitePersonRepository {
    SqlitePersonRepository::new(DbPool::open_in_memory().unwrap())
}

fn seed(repo: &SqlitePersonRepository, email: &str, phone: &str, first_name: &str) -> Person {
    repo.create(&Person::new(email, phone, first_name)).unwrap()
}

#[test]
fn create_assigns_id_and_get_roundtrip() {
    let repo = repo();

    let created = seed(&repo, "ann@example.com", "8999", "Ann Lee");
    assert!(created.id > 0);
    assert_eq!(created.email, "ann@example.com");

    let loaded = repo.get_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn lookups_report_absence_as_none() {
    let repo = repo();

    assert!(repo.get_by_id(42).unwrap().is_none());
    assert!(repo.get_by_email("nobody@example.com").unwrap().is_none());
}

#[test]
fn get_by_email_finds_exact_owner() {
    let repo = repo();
    let ann = seed(&repo, "ann@example.com", "8999", "Ann Lee");
    seed(&repo, "bob@example.com", "7000", "Bob Ray");

    let found = repo.get_by_email("ann@example.com").unwrap().unwrap();
    assert_eq!(found.id, ann.id);
}

#[test]
fn create_sets_created_at_at_write_time() {
    let pool = DbPool::open_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(pool.clone());
    let created = seed(&repo, "ann@example.com", "8999", "Ann Lee");

    let conn = pool.get().unwrap();
    let (created_at, updated_at): (i64, Option<i64>) = conn
        .query_row(
            "SELECT created_at, updated_at FROM persons WHERE id = ?1;",
            [created.id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert!(created_at > 0);
    assert!(updated_at.is_none());
}

#[test]
fn duplicate_email_insert_is_rejected_by_store() {
    let repo = repo();
    seed(&repo, "ann@example.com", "8999", "Ann Lee");

    let err = repo
        .create(&Person::new("ann@example.com", "1111", "Another"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict));
    assert_eq!(repo.count(&PersonFilter::default()).unwrap(), 1);
}

#[test]
fn update_overwrites_fields_and_preserves_id() {
    let pool = DbPool::open_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(pool.clone());
    let created = seed(&repo, "ann@example.com", "8999", "Ann Lee");

    let updated = repo
        .update(created.id, &Person::new("ann@new.example.com", "1234", "Annie"))
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.email, "ann@new.example.com");
    assert_eq!(updated.first_name, "Annie");
    assert_eq!(repo.get_by_id(created.id).unwrap().unwrap(), updated);

    let conn = pool.get().unwrap();
    let updated_at: Option<i64> = conn
        .query_row(
            "SELECT updated_at FROM persons WHERE id = ?1;",
            [created.id],
            |row| row.get(0),
        )
        .unwrap();
    assert!(updated_at.is_some());
}

#[test]
fn update_missing_row_fails() {
    let repo = repo();

    let err = repo
        .update(7, &Person::new("ghost@example.com", "1", "Ghost"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(7)));
}

#[test]
fn update_into_taken_email_is_conflict() {
    let repo = repo();
    seed(&repo, "ann@example.com", "8999", "Ann Lee");
    let bob = seed(&repo, "bob@example.com", "7000", "Bob Ray");

    let err = repo
        .update(bob.id, &Person::new("ann@example.com", "7000", "Bob Ray"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict));
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let repo = repo();

    let err = repo.create(&Person::new("a@b.c", "1", "ab")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let created = seed(&repo, "a@b.c", "1", "Abe");
    let err = repo
        .update(created.id, &Person::new("", "1", "Abe"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn delete_removes_row_once() {
    let repo = repo();
    let created = seed(&repo, "ann@example.com", "8999", "Ann Lee");

    repo.delete(created.id).unwrap();
    assert!(repo.get_by_id(created.id).unwrap().is_none());

    let err = repo.delete(created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == created.id));
}

#[test]
fn list_orders_by_id_and_paginates() {
    let repo = repo();
    let first = seed(&repo, "a@example.com", "100", "Alice");
    let second = seed(&repo, "b@example.com", "200", "Bruno");
    let third = seed(&repo, "c@example.com", "300", "Carla");

    let all = repo.list_all(&PersonFilter::default(), 10, 0).unwrap();
    let ids: Vec<_> = all.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);

    let window = repo.list_all(&PersonFilter::default(), 1, 1).unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].id, second.id);

    let past_end = repo.list_all(&PersonFilter::default(), 10, 3).unwrap();
    assert!(past_end.is_empty());
    assert_eq!(repo.count(&PersonFilter::default()).unwrap(), 3);
}

#[test]
fn list_filters_every_field_by_substring() {
    let repo = repo();
    let ann = seed(&repo, "ann@example.com", "8999-100", "Annabel");
    let joann = seed(&repo, "joann@example.com", "7000-100", "Joanna");
    seed(&repo, "bob@example.com", "8999-200", "Bob Ray");

    let by_email = PersonFilter::by_email("ann@");
    let found = repo.list_all(&by_email, 10, 0).unwrap();
    assert_eq!(found, vec![ann.clone(), joann]);
    assert_eq!(repo.count(&by_email).unwrap(), 2);

    let full_email = PersonFilter::by_email("bob@example.com");
    assert_eq!(repo.count(&full_email).unwrap(), 1);

    let by_phone = PersonFilter::new(None, Some("8999".into()), None);
    assert_eq!(repo.count(&by_phone).unwrap(), 2);

    let by_name = PersonFilter::new(None, None, Some("ann".into()));
    let names: Vec<_> = repo
        .list_all(&by_name, 10, 0)
        .unwrap()
        .into_iter()
        .map(|p| p.first_name)
        .collect();
    assert_eq!(names, vec!["Annabel".to_string(), "Joanna".to_string()]);

    let combined = PersonFilter::new(None, Some("100".into()), Some("Jo".into()));
    assert_eq!(repo.count(&combined).unwrap(), 1);
}

#[test]
fn substring_filter_treats_wildcards_literally() {
    let repo = repo();
    seed(&repo, "a@example.com", "100", "Al_ce");
    seed(&repo, "b@example.com", "200", "Alice");

    let filter = PersonFilter::new(None, None, Some("l_c".into()));
    let found = repo.list_all(&filter, 10, 0).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].first_name, "Al_ce");
}

#[test]
fn email_filter_matches_shared_domain() {
    let repo = repo();
    seed(&repo, "ann@gmail.com", "100", "Ann Lee");
    seed(&repo, "bob@gmail.com", "200", "Bob Ray");
    seed(&repo, "cy@example.com", "300", "Cyrus");

    let filter = PersonFilter::by_email("gmail");
    let emails: Vec<_> = repo
        .list_all(&filter, 10, 0)
        .unwrap()
        .into_iter()
        .map(|p| p.email)
        .collect();
    assert_eq!(emails, vec!["ann@gmail.com".to_string(), "bob@gmail.com".to_string()]);
    assert_eq!(repo.count(&filter).unwrap(), 2);
}
