mod args;
mod config;
mod reader;
mod writer;

use bank::{events::LedgerEvent, input::InputEvent, Ledger, Result};

use std::{num::NonZeroUsize, path::PathBuf, thread};

fn main() -> Result {
    config::configure_app()?;

    log::debug!("Application configured. Beginning process...");

    let args = args::parse_input_args()?;
    log::debug!("Found input args: {args:?}");

    let ledger = Ledger::new();

    let events = read_events(args.input_path)?;

    process_events(&ledger, events, args.workers);

    log::debug!("Process complete. Beginning report...");

    report_to_std_out(&ledger)?;

    log::debug!("Application finished successfully!");

    Ok(())
}

/// Read input file into typed events, skipping rows that fail to parse
fn read_events(input_path: PathBuf) -> Result<Vec<LedgerEvent>> {
    let mut rdr = reader::build_csv_reader(input_path)?;

    let mut events = vec![];

    log::debug!("Deserializing reader...");
    for record in rdr.deserialize::<InputEvent>() {
        log::debug!("Parsing record into InputEvent: {record:?}");
        let input_event = match record {
            Ok(input_event) => input_event,
            Err(e) => {
                log::warn!("{e}");
                continue;
            }
        };

        log::debug!("Parsing input_event into LedgerEvent: {input_event:?}");
        match input_event.parse_event() {
            Ok(event) => events.push(event),
            Err(e) => log::warn!("{e}"),
        }
    }

    Ok(events)
}

/// Opens every account up front, then runs the remaining events concurrently across workers
fn process_events(ledger: &Ledger, events: Vec<LedgerEvent>, workers: NonZeroUsize) {
    let (registrations, operations): (Vec<_>, Vec<_>) =
        events.into_iter().partition(LedgerEvent::is_registration);

    log::debug!("Registering {} accounts...", registrations.len());
    for event in registrations {
        apply_event(ledger, event);
    }

    let mut batches: Vec<Vec<LedgerEvent>> = (0..workers.get()).map(|_| vec![]).collect();

    for (idx, event) in operations.into_iter().enumerate() {
        batches[idx % workers.get()].push(event);
    }

    thread::scope(|scope| {
        for (worker, batch) in batches.into_iter().enumerate() {
            scope.spawn(move || {
                log::debug!("Worker {worker} processing {} events", batch.len());

                for event in batch {
                    apply_event(ledger, event);
                }
            });
        }
    });
}

fn apply_event(ledger: &Ledger, event: LedgerEvent) {
    if let Err(e) = ledger.process_event(event.clone()) {
        log::warn!("Failed to process {event:?}: {e}");
    }
}

/// Build report from the ledger, and write report to stdout
fn report_to_std_out(ledger: &Ledger) -> Result {
    let report = ledger.build_report();
    log::debug!("Successfully built reports for {} accounts", report.len());

    let mut wtr = writer::build_csv_writer();

    log::debug!("Serializing reports...");
    for account_report in report.iter() {
        log::debug!("Serializing report: {account_report:?}");
        wtr.serialize(account_report)?;
    }

    let output = writer::write_to_string(wtr)?;

    log::debug!("Writing to stdout: {output:?}");
    print!("{}", output);

    Ok(())
}
