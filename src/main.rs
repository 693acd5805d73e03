//! Fresheyes CLI entrypoint for pull request mirroring.

use std::io::{self, Write};
use std::process::ExitCode;

use fresheyes::{
    FresheyesConfig, MirrorError, MirrorReport, MirrorRun, OctocrabActivityGateway,
    OctocrabReplayGateway, PersonalAccessToken, PullRequestLocator,
};
use ortho_config::OrthoConfig;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), MirrorError> {
    let config = load_config()?;

    let mirror_url = config.require_mirror_pr_url()?;
    let source_number = config.require_source_pr()?;
    let token = PersonalAccessToken::new(config.resolve_token()?)?;

    let mirror = PullRequestLocator::parse(mirror_url)?;
    let activity = OctocrabActivityGateway::new(&token, mirror.api_base().as_str())?;
    let replay = OctocrabReplayGateway::new(&token, mirror.api_base().as_str())?;

    let mirror_run = MirrorRun::new(&activity, &replay);
    let source = mirror_run.resolve_source(&mirror, source_number).await?;
    let report = mirror_run.run(&source, &mirror).await?;

    write_summary(&report)?;
    Ok(())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`MirrorError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<FresheyesConfig, MirrorError> {
    FresheyesConfig::load().map_err(|error| MirrorError::Configuration {
        message: error.to_string(),
    })
}

fn write_summary(report: &MirrorReport) -> Result<(), MirrorError> {
    let mut stdout = io::stdout().lock();
    let mut message = format!(
        "Replayed {replayed} review group(s); {failed} failed; {skipped} skipped; \
         {synthesized} synthesized comment(s) computed",
        replayed = report.replayed(),
        failed = report.failed(),
        skipped = report.skipped_verdicts.len(),
        synthesized = report.synthesized.len()
    );
    for outcome in &report.outcomes {
        if let Err(error) = &outcome.result {
            message.push_str(&format!(
                "\nreview group {id}: {error}",
                id = outcome.verdict_id
            ));
        }
    }

    writeln!(stdout, "{message}").map_err(|error| MirrorError::Io {
        message: error.to_string(),
    })
}
