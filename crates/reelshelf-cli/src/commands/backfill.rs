use super::prompts;
use crate::output::Output;
use chrono::Utc;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::io::IsTerminal;

fn progress_bar(total: u64) -> ProgressBar {
    let interactive = std::io::stdout().is_terminal() && std::io::stderr().is_terminal();
    if !interactive {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
    {
        bar.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    bar
}

pub async fn run_backfill(to_watch: bool, yes: bool, output: &Output) -> Result<()> {
    let (_, mut catalog) = super::open_catalog(output).await?;
    let kind = super::kind(to_watch);

    let missing = catalog
        .collection(kind)
        .iter()
        .filter(|m| m.date_added.is_none())
        .count();
    if missing == 0 {
        output.info(format!("Every movie in {} already has dateAdded", kind));
        output.data(&json!({ "collection": kind.to_string(), "updated": 0, "failed": 0, "skipped": catalog.collection(kind).len() }));
        return Ok(());
    }

    let prompt = format!("Stamp dateAdded on {} movie(s) in {} and write them back?", missing, kind);
    if !prompts::confirm(&prompt, yes, output)? {
        output.info("Cancelled");
        return Ok(());
    }

    let bar = progress_bar(missing as u64);
    bar.set_message(format!("Writing {}", kind));
    let report = catalog
        .backfill_date_added(kind, Utc::now().timestamp_millis(), |done, total| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
            if !bar.is_hidden() {
                return;
            }
            tracing::info!(operation = "backfill", current = done, total, "Backfill progress");
        })
        .await;
    bar.finish_and_clear();

    output.success(format!(
        "Backfill finished: {} updated, {} failed, {} already dated",
        report.updated, report.failed, report.skipped
    ));
    if report.failed > 0 {
        output.warn("Failed records keep their new timestamp locally; run again to retry the remote write");
    }
    output.data(&json!({ "collection": kind.to_string(), "report": report }));
    Ok(())
}
