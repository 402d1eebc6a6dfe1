//! Line-oriented scanner over a MediaWiki XML export.
//!
//! The dump is never parsed as XML. The reader looks for `<title>` lines and
//! `<text ...>`/`</text>` boundaries, which is enough to cut one article's
//! wikitext out of the stream without holding more than that article.

use crate::config::{NormalizeConfig, READ_BUFFER_SIZE};
use crate::models::{ArticleRecord, PageEvent, RawArticle, SkipReason};
use crate::normalize::normalize;
use crate::sections::segment;
use crate::titles::AllowList;
use anyhow::{Context, Result};
use bzip2::read::MultiBzDecoder;
use indicatif::ProgressBar;
use memchr::memmem;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

const TITLE_OPEN: &str = "<title>";
const TITLE_CLOSE: &[u8] = b"</title>";
const TEXT_OPEN: &str = "<text";
const TEXT_CLOSE: &str = "</text>";
const REDIRECT_MARKER: &[u8] = b"#redirect";

/// Opens a dump for line reading; progress tracks compressed bytes consumed.
pub fn open_dump(path: &str, progress: &ProgressBar) -> Result<Box<dyn BufRead>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open wiki dump at: {}", path))?;
    let size = file
        .metadata()
        .with_context(|| format!("Failed to get metadata for: {}", path))?
        .len();
    progress.set_length(size);

    let source = progress.wrap_read(file);
    let reader: Box<dyn BufRead> = if path.ends_with(".bz2") {
        Box::new(BufReader::with_capacity(
            READ_BUFFER_SIZE,
            MultiBzDecoder::new(source),
        ))
    } else {
        Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, source))
    };
    Ok(reader)
}

enum TextField {
    Body(String),
    Redirect,
}

/// Streams [`PageEvent`]s out of a decompressed dump.
///
/// Iteration ends at end of input or once `cancel` is set; an article cut
/// short by either is dropped. Only I/O errors are yielded as `Err`.
pub struct DumpReader<'a, R: BufRead> {
    reader: R,
    allow: &'a AllowList,
    config: &'a NormalizeConfig,
    cancel: Arc<AtomicBool>,
    buf: Vec<u8>,
    done: bool,
}

impl<'a, R: BufRead> DumpReader<'a, R> {
    pub fn new(
        reader: R,
        allow: &'a AllowList,
        config: &'a NormalizeConfig,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            reader,
            allow,
            config,
            cancel,
            buf: Vec::with_capacity(4096),
            done: false,
        }
    }

    /// Next line without its terminator, or `None` at end of input or on cancellation.
    fn read_line(&mut self) -> Result<Option<String>> {
        if self.cancel.load(Ordering::Relaxed) {
            debug!("Cancellation requested, stopping dump scan");
            return Ok(None);
        }

        self.buf.clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .context("Failed to read from wiki dump")?;
        if n == 0 {
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end_matches(['\n', '\r']);
        Ok(Some(line.to_string()))
    }

    fn read_text_field(&mut self) -> Result<Option<TextField>> {
        let open_line = loop {
            match self.read_line()? {
                Some(line) if line.trim_start().starts_with(TEXT_OPEN) => break line,
                Some(_) => continue,
                None => return Ok(None),
            }
        };

        let (first, self_closing) = split_text_open(&open_line);
        if self_closing {
            return Ok(Some(TextField::Body(String::new())));
        }

        if is_redirect(first) {
            let mut line = first.to_string();
            while strip_text_close(&line).is_none() {
                match self.read_line()? {
                    Some(next) => line = next,
                    None => return Ok(None),
                }
            }
            return Ok(Some(TextField::Redirect));
        }

        let mut body = String::new();
        let mut line = first.to_string();
        loop {
            if let Some(last) = strip_text_close(&line) {
                body.push_str(last);
                return Ok(Some(TextField::Body(body)));
            }
            body.push_str(&line);
            body.push('\n');
            line = match self.read_line()? {
                Some(next) => next,
                None => return Ok(None),
            };
        }
    }

    fn next_event(&mut self) -> Result<Option<PageEvent>> {
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let Some(title) = parse_title(&line) else {
                continue;
            };

            if !self.allow.contains(&title) {
                return Ok(Some(PageEvent::Skipped {
                    title,
                    reason: SkipReason::NotAllowed,
                }));
            }

            return match self.read_text_field()? {
                None => Ok(None),
                Some(TextField::Redirect) => Ok(Some(PageEvent::Skipped {
                    title,
                    reason: SkipReason::Redirect,
                })),
                Some(TextField::Body(body)) => {
                    Ok(Some(process_article(RawArticle { title, body }, self.config)))
                }
            };
        }
    }
}

impl<R: BufRead> Iterator for DumpReader<'_, R> {
    type Item = Result<PageEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Normalizes and segments one article, applying the minimum-size gate.
pub fn process_article(article: RawArticle, config: &NormalizeConfig) -> PageEvent {
    let normalized = normalize(&article.title, &article.body, config);
    let sections = segment(&normalized);

    if sections.is_empty() || normalized.len() < config.min_article_chars {
        debug!(
            title = article.title.as_str(),
            chars = normalized.len(),
            "Article below minimum size"
        );
        return PageEvent::Skipped {
            title: article.title,
            reason: SkipReason::TooShort,
        };
    }

    PageEvent::Accepted {
        title: article.title,
        record: ArticleRecord { sections },
    }
}

fn parse_title(line: &str) -> Option<String> {
    let rest = line.trim_start().strip_prefix(TITLE_OPEN)?;
    let end = memmem::find(rest.as_bytes(), TITLE_CLOSE).unwrap_or(rest.len());
    let raw = &rest[..end];
    let title = quick_xml::escape::unescape(raw)
        .map(|t| t.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    Some(title)
}

/// Content after the `<text ...>` tag, and whether the tag was self-closing.
fn split_text_open(line: &str) -> (&str, bool) {
    let start = line.find(TEXT_OPEN).unwrap_or(0);
    match line[start..].find('>') {
        Some(offset) => {
            let end = start + offset;
            let self_closing = line[..end].ends_with('/');
            (&line[end + 1..], self_closing)
        }
        None => ("", false),
    }
}

fn strip_text_close(line: &str) -> Option<&str> {
    line.trim_end().strip_suffix(TEXT_CLOSE)
}

fn is_redirect(line: &str) -> bool {
    memmem::find(line.to_ascii_lowercase().as_bytes(), REDIRECT_MARKER).is_some()
}
