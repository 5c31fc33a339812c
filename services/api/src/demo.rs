use crate::infra::memory_waitlist_service;
use chrono::{Duration, Utc};
use clap::Args;
use std::path::PathBuf;
use waitlist::config::WaitlistConfig;
use waitlist::error::AppError;
use waitlist::waitlist::{
    JoinRequest, SequentialIdentityGenerator, SignupImporter, SkippedSignup, WaitlistEntry,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Base URL used when printing referral links.
    #[arg(long)]
    pub(crate) base_url: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ReplayArgs {
    /// CSV export with `name,email,referred_by,joined_at` columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Base URL used when printing referral links.
    #[arg(long)]
    pub(crate) base_url: Option<String>,
}

fn waitlist_config(base_url: Option<String>) -> WaitlistConfig {
    match base_url {
        Some(url) => WaitlistConfig::new(url, WaitlistConfig::DEFAULT_CODE_LENGTH),
        None => WaitlistConfig::default(),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = waitlist_config(args.base_url);
    let service = memory_waitlist_service(SequentialIdentityGenerator::default(), config);
    let start = Utc::now();

    println!("Waitlist referral demo");
    let avery = service.join_at(JoinRequest::new("Avery", "avery@example.com"), start)?;
    let blake = service.join_at(
        JoinRequest::new("Blake", "blake@example.com"),
        start + Duration::seconds(1),
    )?;
    println!(
        "- {} joined at #{}, {} joined at #{}",
        avery.name, avery.position, blake.name, blake.position
    );
    render_standings("Queue before referrals", &service.entries()?);

    let link = service.referral_link(&blake.referral_code);
    println!("\n{} shares {}", blake.name, link);
    let casey = service.join_at(
        JoinRequest::new("Casey", "casey@example.com")
            .with_referral_code(blake.referral_code.0.clone()),
        start + Duration::seconds(2),
    )?;
    println!("- {} joined with {}'s code", casey.name, blake.name);
    render_standings("Queue after referral", &service.entries()?);

    match service.join(JoinRequest::new("Avery Again", "avery@example.com")) {
        Ok(_) => println!("\nDuplicate signup unexpectedly accepted"),
        Err(err) => println!("\nDuplicate signup rejected: {err}"),
    }

    if let Some(stats) = service.stats(&blake.email)? {
        println!(
            "{}: position {} of {}, {} referral(s), code {}",
            blake.name, stats.position, stats.total_entries, stats.referral_count, stats.referral_code
        );
    }

    Ok(())
}

pub(crate) fn run_replay(args: ReplayArgs) -> Result<(), AppError> {
    let config = waitlist_config(args.base_url);
    let service = memory_waitlist_service(SequentialIdentityGenerator::default(), config);

    let report = SignupImporter::from_path(&args.csv, &service, Utc::now())?;

    println!("Signup replay: {}", args.csv.display());
    println!(
        "{} applied, {} skipped",
        report.applied,
        report.skipped.len()
    );
    render_standings("Final standings", &report.standings);
    render_skipped(&report.skipped);

    if let Some(leader) = report.standings.first() {
        println!(
            "\nTop referrer link: {}",
            service.referral_link(&leader.referral_code)
        );
    }

    Ok(())
}

fn render_standings(title: &str, entries: &[WaitlistEntry]) {
    println!("\n{title}");
    if entries.is_empty() {
        println!("- (empty)");
        return;
    }

    for entry in entries {
        println!(
            "- #{} {} <{}> | {} referral(s) | code {} | joined {}",
            entry.position,
            entry.name,
            entry.email,
            entry.referral_count,
            entry.referral_code,
            entry.joined_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

fn render_skipped(skipped: &[SkippedSignup]) {
    if skipped.is_empty() {
        return;
    }

    println!("\nSkipped rows");
    for row in skipped {
        if row.email.is_empty() {
            println!("- line {}: {}", row.line, row.reason);
        } else {
            println!("- line {} ({}): {}", row.line, row.email, row.reason);
        }
    }
}
