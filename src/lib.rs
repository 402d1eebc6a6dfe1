//! Icarus: Wikipedia dump to sectioned prose corpus
//!
//! This crate streams a Wikipedia XML dump, keeps the articles named in an
//! allow-list, strips them down to plain prose, and writes each one as a list
//! of `{title, content}` sections inside a single JSON array.
//!
//! # Pipeline
//!
//! 1. **Reading** -- Line-oriented scan of the (optionally BZ2-compressed) dump,
//!    pairing each `<title>` with its `<text>` body and skipping redirects
//! 2. **Normalization** -- An ordered chain of rewrite stages that expands unit
//!    conversions, unwraps language templates, drops nested markup, decodes
//!    entities, and filters residual lines until only prose remains
//! 3. **Segmentation** -- Splits the normalized text on section markers
//! 4. **Output** -- Appends each accepted article to a streaming JSON array that
//!    is always closed, even on interruption
//!
//! # Key Modules
//!
//! - [`parser`] -- Streaming dump reader and per-article processing
//! - [`normalize`] -- The stage chain that turns wikitext into marked prose
//! - [`convert`] -- `{{convert}}` / `{{cvt}}` template rewriting
//! - [`typography`] -- Character substitution table and charset policy
//! - [`sections`] -- Marker-based section splitting
//! - [`output`] -- Incremental JSON array writer
//! - [`titles`] -- Allow-list loading and title normalization
//! - [`extract`] -- Extraction driver with progress reporting
//! - [`models`] -- Core data types (RawArticle, Section, PageEvent)
//! - [`stats`] -- Extraction counters
//! - [`config`] -- Thresholds, heading lists, and buffer sizes
//!
//! # Example Usage
//!
//! ```bash
//! # Extract the allow-listed articles
//! icarus extract -i enwiki-latest-pages-articles.xml.bz2 -o corpus.json -t titles.txt
//!
//! # Inspect how one article normalizes
//! icarus normalize -i article.wiki --title "Entropy"
//! ```

pub mod config;
pub mod convert;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod sections;
pub mod stats;
pub mod titles;
pub mod typography;
