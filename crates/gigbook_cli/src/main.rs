//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `gigbook_core` linkage and print its version.
//! - Open the configured database and print a dashboard summary for the
//!   user named by `GIGBOOK_USER`.

use gigbook_core::{
    init_from_config, open_db, status_breakdown, CoreConfig, EventLedger, EventListQuery,
    SqliteEventRepository, StaticIdentity, UserId,
};
use log::info;
use std::process::ExitCode;

const USER_VAR: &str = "GIGBOOK_USER";

fn main() -> ExitCode {
    println!("gigbook_core ping={}", gigbook_core::ping());
    println!("gigbook_core version={}", gigbook_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    init_from_config(&config)?;

    let Some(user) = std::env::var(USER_VAR).ok().and_then(UserId::parse) else {
        println!("{USER_VAR} not set; skipping dashboard");
        return Ok(());
    };

    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let repo = SqliteEventRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let ledger =
        EventLedger::new(repo, StaticIdentity::signed_in(user)).with_policy(config.status_policy);

    let events = ledger
        .list_events(&EventListQuery::default())
        .map_err(|err| err.to_string())?;
    let aggregates = ledger
        .aggregates(config.upcoming_limit)
        .map_err(|err| err.to_string())?;
    info!(
        "event=cli_dashboard module=cli status=ok events={} upcoming={}",
        events.len(),
        aggregates.upcoming.len()
    );

    println!("db={}", config.db_path.display());
    println!("events={} clients={}", events.len(), aggregates.client_count);
    println!(
        "revenue={} received={} pending={}",
        aggregates.total_revenue, aggregates.total_received, aggregates.total_pending
    );
    for (status, count) in status_breakdown(&events) {
        println!("status.{}={count}", status.as_code());
    }
    for event in &aggregates.upcoming {
        println!(
            "upcoming {} {} {} remaining={}",
            event.date,
            gigbook_core::model::event::format_time(event.start_time),
            event.id,
            event.remaining_balance()
        );
    }

    Ok(())
}
