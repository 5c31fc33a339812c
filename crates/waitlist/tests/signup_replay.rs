use chrono::{TimeZone, Utc};
use std::sync::Arc;
use waitlist::config::WaitlistConfig;
use waitlist::waitlist::{
    InMemoryWaitlistRepository, SequentialIdentityGenerator, SignupImportError, SignupImporter,
    SkippedSignup, WaitlistService,
};

fn service() -> WaitlistService<InMemoryWaitlistRepository, SequentialIdentityGenerator> {
    WaitlistService::new(
        Arc::new(InMemoryWaitlistRepository::new()),
        Arc::new(SequentialIdentityGenerator::default()),
        WaitlistConfig::default(),
    )
}

fn replay_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[test]
fn replay_applies_referrals_and_reports_skipped_rows() {
    let data = include_bytes!("fixtures/signups.csv");
    let service = service();

    let report = SignupImporter::from_reader(&data[..], &service, replay_time())
        .expect("replay succeeds");

    assert_eq!(report.applied, 6);
    let skipped_lines: Vec<usize> = report.skipped.iter().map(|row| row.line).collect();
    assert_eq!(skipped_lines, vec![7, 9, 10]);
    assert!(report.skipped[0].reason.contains("already on the waitlist"));
    assert!(report.skipped[2].reason.contains("sometime"));

    let order: Vec<(&str, u32, u32)> = report
        .standings
        .iter()
        .map(|entry| (entry.email.as_str(), entry.position, entry.referral_count))
        .collect();
    assert_eq!(
        order,
        vec![
            ("blake@example.com", 1, 2),
            ("avery@example.com", 2, 1),
            ("casey@example.com", 3, 0),
            ("devon@example.com", 4, 0),
            ("emery@example.com", 5, 0),
            ("finley@example.com", 6, 0),
        ]
    );

    let finley = report
        .standings
        .iter()
        .find(|entry| entry.email == "finley@example.com")
        .expect("finley joined");
    assert!(finley.referred_by.is_none());
}

#[test]
fn missing_joined_at_uses_replay_time() {
    let csv = "name,email,referred_by,joined_at\nSam,sam@example.com,,\n";
    let service = service();

    let report = SignupImporter::from_reader(csv.as_bytes(), &service, replay_time())
        .expect("replay succeeds");

    assert_eq!(report.applied, 1);
    assert_eq!(report.standings[0].joined_at, replay_time());
}

#[test]
fn replay_from_path_propagates_io_errors() {
    let service = service();
    let error = SignupImporter::from_path("./does-not-exist.csv", &service, replay_time())
        .expect_err("expected io error");

    match error {
        SignupImportError::Io(_) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn replay_rejects_rows_missing_required_columns() {
    let csv = "name,referred_by\nSam,\n";
    let service = service();

    let error = SignupImporter::from_reader(csv.as_bytes(), &service, replay_time())
        .expect_err("missing email column");
    assert!(matches!(error, SignupImportError::MissingColumn("email")));
    assert!(service.entries().expect("entries").is_empty());
}

#[test]
fn short_rows_are_skipped_and_replay_continues() {
    let csv = "name,email,referred_by,joined_at\n\
               Avery,avery@example.com,,2025-05-01\n\
               Blake,blake@example.com\n\
               Casey,casey@example.com,,2025-05-02\n";
    let service = service();

    let report = SignupImporter::from_reader(csv.as_bytes(), &service, replay_time())
        .expect("replay succeeds");

    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line, 3);
    assert!(report.skipped[0].reason.contains("fields"));

    let emails: Vec<&str> = report
        .standings
        .iter()
        .map(|entry| entry.email.as_str())
        .collect();
    assert_eq!(emails, vec!["avery@example.com", "casey@example.com"]);
}

#[test]
fn skipped_rows_report_physical_lines_after_multiline_fields() {
    let csv = "name,email,referred_by,joined_at\n\
               \"Avery\nChen\",avery@example.com,,2025-05-01\n\
               Avery Again,avery@example.com,,2025-05-02\n";
    let service = service();

    let report = SignupImporter::from_reader(csv.as_bytes(), &service, replay_time())
        .expect("replay succeeds");

    assert_eq!(report.applied, 1);
    assert_eq!(report.standings[0].name, "Avery\nChen");
    assert_eq!(
        report.skipped,
        vec![SkippedSignup {
            line: 4,
            email: "avery@example.com".to_string(),
            reason: "This email is already on the waitlist.".to_string(),
        }]
    );
}
