//! Rendering of records, statuses and event logs for text and JSON output.

use artshop_core::{Address, ArtworkRecord, EventLog, LifecycleError, Status};
use serde_json::json;

use crate::OutputFormat;

/// Print the record under inspection and the status region.
pub fn print_record(record: &ArtworkRecord, status: &Status, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let value = json!({ "record": record, "status": status });
            println!(
                "{}",
                serde_json::to_string_pretty(&value).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            println!("{}", status.message());
            if !quiet {
                print!("{}", record_text(record));
            }
        }
    }
}

pub fn record_text(record: &ArtworkRecord) -> String {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let address = |a: &Address| {
        if a.is_zero() {
            String::new()
        } else {
            a.to_string()
        }
    };
    let rows = [
        ("id", record.id.to_string()),
        ("title", text(&record.title)),
        ("year", record.year.to_string()),
        ("medium", text(&record.medium)),
        ("style", text(&record.style)),
        ("artist", text(&record.artist_name)),
        ("artist info", text(&record.artist_info)),
        ("artist location", text(&record.artist_location)),
        ("notes", text(&record.notes)),
        ("price", record.price.to_string()),
        ("state", record.state.to_string()),
        ("owner", address(&record.owner)),
        ("origin artist", address(&record.origin_artist)),
        ("adopter", address(&record.adopter)),
        ("shipper", address(&record.shipper)),
    ];
    rows.iter()
        .map(|(label, value)| format!("  {:<16} {}\n", label, value))
        .collect()
}

pub fn print_events(log: &EventLog, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let value = json!({ "events": log.entries(), "next_block": log.cursor() });
            println!(
                "{}",
                serde_json::to_string_pretty(&value).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            for line in log.lines() {
                println!("{}", line);
            }
            if log.is_empty() && !quiet {
                eprintln!("no events");
            }
        }
    }
}

pub fn print_account(account: &Address, output: OutputFormat) {
    match output {
        OutputFormat::Json => println!("{}", json!({ "account": account })),
        OutputFormat::Text => println!("{}", account),
    }
}

/// Report a lifecycle error on stderr, using the status-region wording.
pub fn report_lifecycle_error(err: &LifecycleError, output: OutputFormat, quiet: bool) {
    let status = Status::for_error(err);
    match output {
        OutputFormat::Json => {
            let value = json!({ "error": { "kind": err.kind(), "message": status.message() } });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&value).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("error: {}", status.message());
            }
        }
    }
}

/// Report a plain error message on stderr.
pub fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            eprintln!("{}", json!({ "error": { "kind": "cli", "message": msg } }));
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("error: {}", msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artshop_core::LifecycleState;

    #[test]
    fn text_rows_hide_unset_fields() {
        let record = ArtworkRecord {
            id: 4,
            title: Some("Harbor".into()),
            state: LifecycleState::Framed,
            ..ArtworkRecord::default()
        };
        let text = record_text(&record);
        assert!(text.contains("  id               4\n"));
        assert!(text.contains("  title            Harbor\n"));
        assert!(text.contains("  state            Framed\n"));
        assert!(text.contains("  owner            \n"));
    }
}
