//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `solarsys_core` linkage and database bootstrap end to end.
//! - Print the stored catalog deterministically for quick sanity checks.

use solarsys_core::{BodyService, CoreConfig, SqliteBodyRepository};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("solarsys: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("solarsys_core ping={}", solarsys_core::ping());
    println!("solarsys_core version={}", solarsys_core::core_version());

    let config = CoreConfig::from_env()?;
    if config.init_logging()? {
        log::info!("event=cli_start module=cli status=ok");
    }

    let conn = config.open_database()?;
    let service = BodyService::new(SqliteBodyRepository::try_new(&conn)?);
    let seeded = service.seed_solar_system()?;
    println!("seeded={seeded} total={}", service.count_bodies()?);

    for body in service.list_bodies() {
        let body = body?;
        println!(
            "{:>3} {:<8} radius_km={:<9} orbit_mkm={:<7} rotation_d={:<9} orbit_d={}",
            body.id.unwrap_or_default(),
            body.name,
            body.radius,
            body.orbit_radius,
            body.rotation_period,
            body.orbit_period
        );
    }

    Ok(())
}
