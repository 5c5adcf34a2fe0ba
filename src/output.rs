//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## new_event
//!
//! ```text
//! Created event 20250801-event
//!     Name: Summer Festival
//!     Date: 2025-08-01
//!     Description: Summer Festivalの写真です。
//! ```
//!
//! ## add_photos (and new_event --photos)
//!
//! ```text
//! Adding 3 photos to 20250801-event
//!     001 photo1.JPG → photo1.jpg
//!     002 photo1.png → photo1_1.jpg
//!     003 broken.jpg: skipped (Decode error: ...)
//! Added 2 of 3 photos to 20250801-event
//!     Failed: /incoming/broken.jpg: Decode error: ...
//! ```
//!
//! ## check
//!
//! ```text
//! 20250801-event: missing photo photo9.jpg
//! 20250801-event: unlisted photo stray.jpg
//! Checked 2 events, 14 photos: 2 problems
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::check::{CheckReport, Issue};
use crate::ingest::{IngestEvent, IngestReport};
use crate::types::Event;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 photo`, `2 photos`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ============================================================================
// new_event
// ============================================================================

/// Format the confirmation for a newly registered event.
pub fn format_created_event(event: &Event) -> Vec<String> {
    vec![
        format!("Created event {}", event.id),
        format!("{}Name: {}", indent(1), event.name),
        format!("{}Date: {}", indent(1), event.date),
        format!("{}Description: {}", indent(1), event.description),
    ]
}

pub fn print_created_event(event: &Event) {
    for line in format_created_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// add_photos
// ============================================================================

/// Format a single progress event as it arrives from the ingest workflow.
pub fn format_ingest_event(event: &IngestEvent) -> Vec<String> {
    match event {
        IngestEvent::BatchStarted {
            event_id,
            candidates,
        } => vec![format!(
            "Adding {} to {}",
            plural(*candidates, "photo"),
            event_id
        )],
        IngestEvent::PhotoAdded {
            index,
            source_name,
            filename,
        } => vec![format!(
            "{}{} {} → {}",
            indent(1),
            format_index(*index),
            source_name,
            filename
        )],
        IngestEvent::PhotoSkipped {
            index,
            source_name,
            reason,
        } => vec![format!(
            "{}{} {}: skipped ({})",
            indent(1),
            format_index(*index),
            source_name,
            reason
        )],
    }
}

/// Format the summary of a finished batch.
pub fn format_ingest_report(report: &IngestReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Added {} of {} to {}",
        report.added_count(),
        plural(report.candidates, "photo"),
        report.event_id
    )];
    for failure in &report.failures {
        lines.push(format!("{}Failed: {}", indent(1), failure));
    }
    lines
}

pub fn print_ingest_report(report: &IngestReport) {
    for line in format_ingest_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

fn issue_line(issue: &Issue) -> String {
    match issue {
        Issue::UnknownEvent(id) => format!("{id}: not in events.json"),
        Issue::DuplicateEventId(id) => format!("{id}: listed more than once in events.json"),
        Issue::MissingEventDirectory { event_id, path } => {
            format!("{event_id}: missing directory {}", path.display())
        }
        Issue::DuplicateListEntry { event_id, filename } => {
            format!("{event_id}: duplicate entry {filename}")
        }
        Issue::MissingPhoto { event_id, filename } => {
            format!("{event_id}: missing photo {filename}")
        }
        Issue::UnlistedPhoto { event_id, filename } => {
            format!("{event_id}: unlisted photo {filename}")
        }
        Issue::WrongDimensions {
            event_id,
            filename,
            width,
            height,
        } => format!("{event_id}: {filename} is {width}x{height}"),
        Issue::UnreadablePhoto {
            event_id,
            filename,
            reason,
        } => format!("{event_id}: cannot read {filename} ({reason})"),
    }
}

/// Format a consistency check: one line per issue, then a summary.
pub fn format_check_report(report: &CheckReport) -> Vec<String> {
    let mut lines: Vec<String> = report.issues.iter().map(issue_line).collect();
    let verdict = if report.is_clean() {
        "no problems".to_string()
    } else {
        plural(report.issues.len(), "problem")
    };
    lines.push(format!(
        "Checked {}, {}: {}",
        plural(report.events_checked, "event"),
        plural(report.photos_checked, "photo"),
        verdict
    ));
    lines
}

pub fn print_check_report(report: &CheckReport) {
    for line in format_check_report(report) {
        println!("{}", line);
    }
}
