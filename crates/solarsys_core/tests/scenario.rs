use solarsys_core::db::open_db_in_memory;
use solarsys_core::{
    BodyService, CelestialBody, CelestialBodyRepository, InMemoryBodyRepository, RepoError,
    SqliteBodyRepository,
};

fn run_earth_mars_scenario<R: CelestialBodyRepository>(repo: R) {
    let service = BodyService::new(repo);

    let earth =
        CelestialBody::new("Earth", 6371.0, 149.6, 1.0, 365.25).with_texture_url("earth.png");
    let mars =
        CelestialBody::new("Mars", 3389.5, 227.9, 1.03, 687.0).with_texture_url("mars.png");

    assert_eq!(service.create_body(&earth).unwrap().id, Some(1));
    let stored_mars = service.create_body(&mars).unwrap();
    assert_eq!(stored_mars.id, Some(2));

    service.delete_body(1).unwrap();
    assert!(matches!(service.get_body(1), Err(RepoError::NotFound(1))));

    let listed = service.list_all().unwrap();
    assert_eq!(listed, vec![stored_mars]);
}

#[test]
fn earth_mars_scenario_in_memory() {
    run_earth_mars_scenario(InMemoryBodyRepository::new());
}

#[test]
fn earth_mars_scenario_sqlite() {
    let conn = open_db_in_memory().unwrap();
    run_earth_mars_scenario(SqliteBodyRepository::try_new(&conn).unwrap());
}

#[test]
fn seeded_catalog_is_identical_across_backends() {
    let conn = open_db_in_memory().unwrap();
    let sqlite = BodyService::new(SqliteBodyRepository::try_new(&conn).unwrap());
    let memory = BodyService::new(InMemoryBodyRepository::new());

    assert_eq!(sqlite.seed_solar_system().unwrap(), 9);
    assert_eq!(memory.seed_solar_system().unwrap(), 9);
    assert_eq!(sqlite.list_all().unwrap(), memory.list_all().unwrap());
}
