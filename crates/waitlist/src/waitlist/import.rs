//! Replay a CSV export of signups through the join workflow.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use tracing::info;

use super::domain::{JoinRequest, WaitlistEntry};
use super::identity::IdentityGenerator;
use super::repository::WaitlistRepository;
use super::service::{WaitlistError, WaitlistService};

#[derive(Debug, thiserror::Error)]
pub enum SignupImportError {
    #[error("failed to read signup export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid signup CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("signup CSV is missing the `{0}` column")]
    MissingColumn(&'static str),
    #[error("could not apply signups to the waitlist: {0}")]
    Waitlist(#[from] WaitlistError),
}

/// One CSV row: `name,email,referred_by,joined_at`.
#[derive(Debug, Deserialize)]
struct SignupRow {
    name: String,
    email: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    referred_by: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    joined_at: Option<String>,
}

/// A row that did not produce an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSignup {
    pub line: usize,
    pub email: String,
    pub reason: String,
}

/// Outcome of a replay: how many rows joined, which were skipped, and the final queue.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub applied: usize,
    pub skipped: Vec<SkippedSignup>,
    pub standings: Vec<WaitlistEntry>,
}

pub struct SignupImporter;

impl SignupImporter {
    pub fn from_path<P, R, G>(
        path: P,
        service: &WaitlistService<R, G>,
        default_joined_at: DateTime<Utc>,
    ) -> Result<ReplayReport, SignupImportError>
    where
        P: AsRef<Path>,
        R: WaitlistRepository + 'static,
        G: IdentityGenerator + 'static,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, service, default_joined_at)
    }

    /// Rows are applied in file order. `referred_by` names the referrer's
    /// email, which must appear on an earlier row to count. Malformed rows
    /// are reported and skipped; only read failures and a missing `name` or
    /// `email` column abort the replay.
    pub fn from_reader<Rd, R, G>(
        reader: Rd,
        service: &WaitlistService<R, G>,
        default_joined_at: DateTime<Utc>,
    ) -> Result<ReplayReport, SignupImportError>
    where
        Rd: Read,
        R: WaitlistRepository + 'static,
        G: IdentityGenerator + 'static,
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let email_column = required_column(&headers, "email")?;
        required_column(&headers, "name")?;

        let mut applied = 0;
        let mut skipped = Vec::new();
        let mut record = csv::StringRecord::new();

        loop {
            match csv_reader.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    skipped.push(SkippedSignup {
                        line: line_of(err.position()),
                        email: String::new(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            }

            let line = line_of(record.position());
            let row: SignupRow = match record.deserialize(Some(&headers)) {
                Ok(row) => row,
                Err(err) => {
                    skipped.push(SkippedSignup {
                        line,
                        email: record.get(email_column).unwrap_or_default().to_string(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let joined_at = match row.joined_at.as_deref() {
                Some(raw) => match parse_timestamp(raw) {
                    Some(timestamp) => timestamp,
                    None => {
                        skipped.push(SkippedSignup {
                            line,
                            email: row.email,
                            reason: format!("unrecognized joined_at '{raw}'"),
                        });
                        continue;
                    }
                },
                None => default_joined_at,
            };

            let mut request = JoinRequest::new(row.name, row.email.clone());
            if let Some(referrer_email) = row.referred_by.as_deref() {
                if let Some(stats) = service.stats(referrer_email)? {
                    request = request.with_referral_code(stats.referral_code.0);
                }
            }

            match service.join_at(request, joined_at) {
                Ok(_) => applied += 1,
                Err(WaitlistError::Repository(err)) => {
                    return Err(WaitlistError::Repository(err).into())
                }
                Err(err) => skipped.push(SkippedSignup {
                    line,
                    email: row.email,
                    reason: err.to_string(),
                }),
            }
        }

        let standings = service.entries()?;
        info!(
            applied,
            skipped = skipped.len(),
            total = standings.len(),
            "signup replay finished"
        );

        Ok(ReplayReport {
            applied,
            skipped,
            standings,
        })
    }
}

fn required_column(
    headers: &csv::StringRecord,
    column: &'static str,
) -> Result<usize, SignupImportError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or(SignupImportError::MissingColumn(column))
}

/// Physical line a record starts on; quoted fields may span several lines.
fn line_of(position: Option<&csv::Position>) -> usize {
    position.map_or(0, |position| position.line() as usize)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_timestamp_supports_rfc3339_and_dates() {
        assert_eq!(
            parse_timestamp("2025-04-02T08:30:00+02:00"),
            Utc.with_ymd_and_hms(2025, 4, 2, 6, 30, 0).single()
        );
        assert_eq!(
            parse_timestamp("2025-04-02"),
            Utc.with_ymd_and_hms(2025, 4, 2, 0, 0, 0).single()
        );
        assert!(parse_timestamp("  ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
