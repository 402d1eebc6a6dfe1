use crate::config::{NormalizeConfig, PROGRESS_INTERVAL, WRITE_BUFFER_SIZE};
use crate::models::PageEvent;
use crate::output::JsonArrayWriter;
use crate::parser::{open_dump, DumpReader};
use crate::stats::ExtractionStats;
use crate::titles::AllowList;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Streams `input` into a JSON array at `output`.
///
/// The output file is a complete JSON document whenever this returns,
/// including after cancellation or a read error.
pub fn run_extraction(
    input: &str,
    output: &str,
    allow: &AllowList,
    config: &NormalizeConfig,
    limit: Option<u64>,
    cancel: Arc<AtomicBool>,
) -> Result<ExtractionStats> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] {bar:40} {percent:>3}% ({eta}) {msg}",
        )?,
    );

    let reader = open_dump(input, &pb)?;
    let file = File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output))?;
    let writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);

    info!(input, output, "Starting extraction");
    let (_, stats) = extract_to(reader, writer, allow, config, limit, cancel, &pb)?;
    pb.finish_and_clear();

    Ok(stats)
}

/// Core extraction loop over any line source and sink.
pub fn extract_to<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    allow: &AllowList,
    config: &NormalizeConfig,
    limit: Option<u64>,
    cancel: Arc<AtomicBool>,
    progress: &ProgressBar,
) -> Result<(W, ExtractionStats)> {
    let stats = ExtractionStats::new();
    let mut out = JsonArrayWriter::new(writer)?;

    let mut events = DumpReader::new(reader, allow, config, Arc::clone(&cancel));
    loop {
        if limit.is_some_and(|max| out.written() >= max) {
            info!(limit, "Article limit reached");
            break;
        }
        let Some(event) = events.next() else {
            break;
        };
        let event = event?;
        stats.record(&event);
        if stats.titles() % PROGRESS_INTERVAL == 0 {
            progress.set_message(event.title().to_string());
        }

        match event {
            PageEvent::Accepted { title, record } => {
                debug!(
                    title = title.as_str(),
                    sections = record.sections.len(),
                    "Article accepted"
                );
                out.write_record(&record)
                    .with_context(|| format!("Failed to write article: {}", title))?;
            }
            PageEvent::Skipped { title, reason } => {
                debug!(title = title.as_str(), %reason, "Article skipped");
            }
        }
    }

    if cancel.load(Ordering::Relaxed) {
        warn!(
            accepted = stats.accepted(),
            "Extraction interrupted, closing output early"
        );
    }

    let writer = out.finish()?;
    info!(
        titles = stats.titles(),
        accepted = stats.accepted(),
        not_allowed = stats.not_allowed(),
        redirects = stats.redirects(),
        too_short = stats.too_short(),
        "Extraction finished"
    );
    Ok((writer, stats))
}
