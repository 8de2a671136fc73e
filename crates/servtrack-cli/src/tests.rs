use chrono::{DateTime, Duration, TimeZone, Utc};
use clap::Parser;
use servtrack_core::view::HttpClientLookup;
use servtrack_core::{
    DatabaseService, ErrorCode, NewTimeTracking, TimeTrackingContext, TimeTrackingEntity, TimeTrackingStatus,
};

use crate::cli::{Cli, Commands};
use crate::commands::common::{
    format_duration, format_record_lines, format_relative_time, location, normalize_id,
    normalize_note,
};
use crate::commands::list::{run_list, ListFilter};
use crate::commands::note::run_note;
use crate::commands::show::run_show;
use crate::commands::start::{run_start, StartArgs};
use crate::commands::stop::run_stop;
use crate::error::CliError;

const NO_LOOKUP: Option<HttpClientLookup> = None;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, hour, 0, 0).unwrap()
}

async fn embedded() -> TimeTrackingContext<DatabaseService> {
    TimeTrackingContext::new(DatabaseService::open_in_memory().await.unwrap())
}

async fn seed(
    context: &TimeTrackingContext<DatabaseService>,
    employee: &str,
    client: &str,
) -> TimeTrackingEntity {
    context
        .create_time_tracking(&NewTimeTracking::new(employee, client).with_start_time(at(8)))
        .await
        .unwrap()
}

fn output(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).unwrap()
}

#[test]
fn normalize_id_trims_and_rejects_empty() {
    assert_eq!(normalize_id("  abc ").unwrap(), "abc");
    assert!(matches!(normalize_id("   "), Err(CliError::EmptyId)));
}

#[test]
fn normalize_note_joins_parts() {
    let parts = vec!["left".to_string(), "key".to_string()];
    assert_eq!(normalize_note(&parts).unwrap(), "left key");
    assert!(matches!(
        normalize_note(&[" ".to_string()]),
        Err(CliError::EmptyNote)
    ));
}

#[test]
fn format_duration_uses_hours_and_minutes() {
    assert_eq!(format_duration(at(8), at(8) + Duration::minutes(42)), "42m");
    assert_eq!(format_duration(at(8), at(9) + Duration::minutes(5)), "1h 05m");
    assert_eq!(format_duration(at(9), at(8)), "0m");
}

#[test]
fn format_relative_time_buckets() {
    let now = at(12);
    assert_eq!(format_relative_time(now, now), "just now");
    assert_eq!(format_relative_time(now - Duration::minutes(5), now), "5m ago");
    assert_eq!(format_relative_time(now - Duration::hours(3), now), "3h ago");
    assert_eq!(format_relative_time(now - Duration::days(2), now), "2d ago");
    assert_eq!(format_relative_time(now - Duration::days(21), now), "3w ago");
}

#[test]
fn location_requires_both_coordinates() {
    assert_eq!(location(Some(38.7), Some(-9.1)), Some((38.7, -9.1)));
    assert_eq!(location(Some(38.7), None), None);
}

#[test]
fn list_filter_prefers_client() {
    assert_eq!(ListFilter::from_args(None, None), ListFilter::All);
    assert_eq!(
        ListFilter::from_args(None, Some(" e1 ".to_string())),
        ListFilter::Employee("e1".to_string())
    );
}

#[test]
fn cli_rejects_conflicting_list_filters() {
    let parsed = Cli::try_parse_from([
        "servtrack",
        "list",
        "--client",
        "c1",
        "--employee",
        "e1",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn cli_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "servtrack",
        "start",
        "--employee",
        "e1",
        "--client",
        "c1",
        "--lat",
        "38.72",
        "--long",
        "-9.14",
    ])
    .unwrap();
    let Commands::Start { lat, long, .. } = cli.command else {
        panic!("expected start command");
    };
    assert_eq!(location(lat, long), Some((38.72, -9.14)));
}

#[test]
fn cli_requires_paired_coordinates() {
    let parsed = Cli::try_parse_from(["servtrack", "stop", "abc", "--lat", "38.72"]);
    assert!(parsed.is_err());
}

#[test]
fn record_lines_show_status_and_duration() {
    let record = TimeTrackingEntity {
        id: "01900000-0000-7000-8000-000000000000".parse().unwrap(),
        employee_id: "e1".to_string(),
        client_id: "c1".to_string(),
        start_time: at(8),
        end_time: Some(at(10)),
        status: TimeTrackingStatus::Concluded,
        long_start_time: None,
        long_end_time: None,
        lat_start_time: None,
        lat_end_time: None,
        notes: None,
    };
    let lines = format_record_lines(&[record], at(12));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("01900000-0000"));
    assert!(lines[0].contains("concluded"));
    assert!(lines[0].ends_with("2h 00m"));
}

#[tokio::test(flavor = "multi_thread")]
async fn start_then_list() {
    let context = embedded().await;

    let mut buffer = Vec::new();
    run_start(
        &context,
        StartArgs {
            employee_id: "e1".to_string(),
            client_id: "c1".to_string(),
            location: Some((38.72, -9.14)),
            notes: Some("  boiler check ".to_string()),
        },
        &mut buffer,
    )
    .await
    .unwrap();
    let id = output(buffer).trim().to_string();

    let mut buffer = Vec::new();
    run_list(&context, &ListFilter::All, false, true, &mut buffer)
        .await
        .unwrap();
    let listed: Vec<TimeTrackingEntity> = serde_json::from_slice(&buffer).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id.to_string(), id);
    assert_eq!(listed[0].notes.as_deref(), Some("boiler check"));
    assert_eq!(listed[0].lat_start_time, Some(38.72));
}

#[tokio::test(flavor = "multi_thread")]
async fn start_reports_validation_details() {
    let context = embedded().await;

    let err = run_start(
        &context,
        StartArgs {
            employee_id: "e1".to_string(),
            client_id: "  ".to_string(),
            ..StartArgs::default()
        },
        &mut Vec::<u8>::new(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.details(), vec!["clientId is required".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_filters_and_active_only() {
    let context = embedded().await;
    let first = seed(&context, "e1", "c1").await;
    seed(&context, "e2", "c1").await;
    seed(&context, "e1", "c2").await;
    run_stop(&context, NO_LOOKUP, &first.id.as_str(), None, at(12), &mut Vec::<u8>::new())
        .await
        .unwrap();

    let mut buffer = Vec::new();
    run_list(
        &context,
        &ListFilter::Client("c1".to_string()),
        true,
        false,
        &mut buffer,
    )
    .await
    .unwrap();
    let text = output(buffer);
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains("e2"));

    let mut buffer = Vec::new();
    run_list(
        &context,
        &ListFilter::Employee("nobody".to_string()),
        false,
        false,
        &mut buffer,
    )
    .await
    .unwrap();
    assert_eq!(output(buffer).trim(), "No time tracking records");
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_twice_reports_already_concluded() {
    let context = embedded().await;
    let record = seed(&context, "e1", "c1").await;
    let id = record.id.as_str();

    let mut buffer = Vec::new();
    run_stop(&context, NO_LOOKUP, &id, Some((38.7, -9.1)), at(12), &mut buffer)
        .await
        .unwrap();
    assert!(output(buffer).starts_with("Stopped"));

    let stored = context.get_time_tracking_by_id(&id).await.unwrap();
    assert_eq!(stored.status, TimeTrackingStatus::Concluded);
    assert_eq!(stored.end_time, Some(at(12)));
    assert_eq!(stored.lat_end_time, Some(38.7));

    let mut buffer = Vec::new();
    run_stop(&context, NO_LOOKUP, &id, None, at(13), &mut buffer)
        .await
        .unwrap();
    assert!(output(buffer).contains("already concluded"));
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_unknown_record_reports_not_found() {
    let context = embedded().await;
    let err = run_stop(
        &context,
        NO_LOOKUP,
        &servtrack_core::TimeTrackingId::new().as_str(),
        None,
        at(12),
        &mut Vec::<u8>::new(),
    )
    .await
    .unwrap_err();
    let CliError::Context(error) = err else {
        panic!("expected context error");
    };
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_with_invalid_location_leaves_record_active() {
    let context = embedded().await;
    let record = seed(&context, "e1", "c1").await;
    let id = record.id.as_str();

    let mut buffer = Vec::new();
    let err = run_stop(&context, NO_LOOKUP, &id, Some((95.0, 0.0)), at(12), &mut buffer)
        .await
        .unwrap_err();
    assert_eq!(
        err.details(),
        vec!["latEndTime must be a latitude in [-90, 90]".to_string()]
    );
    assert!(buffer.is_empty());

    let stored = context.get_time_tracking_by_id(&id).await.unwrap();
    assert_eq!(stored.status, TimeTrackingStatus::Active);
    assert_eq!(stored.end_time, None);
    assert_eq!(stored.lat_end_time, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn show_unknown_record_reports_not_found() {
    let context = embedded().await;
    let err = run_show(
        context,
        NO_LOOKUP,
        &servtrack_core::TimeTrackingId::new().as_str(),
        false,
        &mut Vec::<u8>::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(&err, CliError::Context(error) if error.code() == ErrorCode::NotFound));
}

#[tokio::test(flavor = "multi_thread")]
async fn show_and_note() {
    let context = embedded().await;
    let record = seed(&context, "e1", "c1").await;
    let id = record.id.as_str();

    run_note(
        &context,
        &id,
        &["gate".to_string(), "code 1234".to_string()],
        &mut Vec::<u8>::new(),
    )
    .await
    .unwrap();

    let mut buffer = Vec::new();
    run_show(context.clone(), NO_LOOKUP, &id, false, &mut buffer)
        .await
        .unwrap();
    let text = output(buffer);
    assert!(text.contains("Status:    active"));
    assert!(text.contains("Client:    c1"));
    assert!(text.contains("Notes:     gate code 1234"));

    let mut buffer = Vec::new();
    run_show(context, NO_LOOKUP, &id, true, &mut buffer)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
    assert_eq!(json["timeTracking"]["clientId"], "c1");
    assert_eq!(json["client"], serde_json::Value::Null);
}
