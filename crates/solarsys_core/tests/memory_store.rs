use solarsys_core::{
    BodyCursor, CelestialBody, CelestialBodyRepository, FieldViolation, InMemoryBodyRepository,
    MonotonicAllocator, RepoError,
};
use std::collections::HashSet;
use std::thread;

fn moon(index: usize) -> CelestialBody {
    CelestialBody::new(format!("moon-{index}"), 100.0 + index as f64, 0.4, 1.5, 1.5)
}

#[test]
fn create_get_update_delete_lifecycle() {
    let repo = InMemoryBodyRepository::new();

    let created = repo.create_body(&moon(0)).unwrap();
    let id = created.id.unwrap();
    assert_eq!(id, 1);
    assert!(created.same_fields(&moon(0)));
    assert_eq!(repo.get_body(id).unwrap(), created);

    let updated = repo.update_body(id, &moon(9)).unwrap();
    assert_eq!(updated.id, Some(id));
    assert!(repo.get_body(id).unwrap().same_fields(&moon(9)));

    repo.delete_body(id).unwrap();
    assert!(matches!(repo.get_body(id), Err(RepoError::NotFound(1))));
    assert!(matches!(repo.delete_body(id), Err(RepoError::NotFound(1))));
}

#[test]
fn validation_error_lists_all_violations_and_store_is_unchanged() {
    let repo = InMemoryBodyRepository::new();
    repo.create_body(&moon(0)).unwrap();

    let invalid = CelestialBody::new("", -1.0, -0.5, -10.0, 3.0);
    let err = repo.create_body(&invalid).unwrap_err();

    match err {
        RepoError::Validation(validation) => assert_eq!(
            validation.violations(),
            &[
                FieldViolation::EmptyName,
                FieldViolation::Negative {
                    field: "radius",
                    value: -1.0
                },
                FieldViolation::Negative {
                    field: "orbitRadius",
                    value: -0.5
                },
            ]
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repo.count_bodies().unwrap(), 1);
}

#[test]
fn failed_create_does_not_consume_an_id() {
    let repo = InMemoryBodyRepository::new();

    let mut invalid = moon(0);
    invalid.radius = -1.0;
    repo.create_body(&invalid).unwrap_err();

    assert_eq!(repo.create_body(&moon(1)).unwrap().id, Some(1));
}

#[test]
fn update_checks_existence_before_validation() {
    let repo = InMemoryBodyRepository::new();
    let invalid = CelestialBody::new(" ", 1.0, 1.0, 1.0, 1.0);

    assert!(matches!(
        repo.update_body(3, &invalid),
        Err(RepoError::NotFound(3))
    ));

    let id = repo.create_body(&moon(0)).unwrap().id.unwrap();
    assert!(matches!(
        repo.update_body(id, &invalid),
        Err(RepoError::Validation(_))
    ));
    assert!(repo.get_body(id).unwrap().same_fields(&moon(0)));
}

#[test]
fn list_pages_in_insertion_order() {
    let repo = InMemoryBodyRepository::new();
    for index in 0..5 {
        repo.create_body(&moon(index)).unwrap();
    }
    repo.delete_body(2).unwrap();

    let names: Vec<_> = BodyCursor::new(&repo, 2)
        .map(|body| body.unwrap().name)
        .collect();
    assert_eq!(names, ["moon-0", "moon-2", "moon-3", "moon-4"]);
}

#[test]
fn seeded_allocator_continues_after_given_id() {
    let repo = InMemoryBodyRepository::with_allocator(MonotonicAllocator::starting_after(41));
    assert_eq!(repo.create_body(&moon(0)).unwrap().id, Some(42));
}

#[test]
fn concurrent_creates_get_distinct_ids() {
    let repo = InMemoryBodyRepository::new();

    let ids: Vec<_> = thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|worker| {
                let repo = &repo;
                scope.spawn(move || {
                    (0..25)
                        .map(|index| repo.create_body(&moon(worker * 100 + index)).unwrap())
                        .map(|body| body.id.unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect()
    });

    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(unique.len(), 100);
    assert_eq!(repo.count_bodies().unwrap(), 100);

    let listed: Vec<_> = repo
        .list_bodies()
        .map(|body| body.unwrap().id.unwrap())
        .collect();
    assert_eq!(listed, (1..=100).collect::<Vec<_>>());
}
