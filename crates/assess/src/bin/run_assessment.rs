use std::path::PathBuf;

use anyhow::{Context, Result};
use assess::{Assessor, AssessmentConfig, AssessmentRequest};

/// Thin adapter: read a JSON assessment request from a file, run the
/// pipeline, print the JSON assessment to stdout.
fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let path: PathBuf = std::env::args()
        .nth(1)
        .context("usage: run_assessment <request.json>")?
        .into();

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let request: AssessmentRequest =
        serde_json::from_str(&raw).context("failed to parse assessment request")?;

    let assessor = Assessor::new(AssessmentConfig::default())?;
    let assessment = assessor.assess(&request)?;

    println!("{}", serde_json::to_string_pretty(&assessment)?);
    Ok(())
}
