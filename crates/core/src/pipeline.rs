//! End-to-end site generation: parse, index, resolve, render, diff, write.
//!
//! One linear batch per invocation, single-threaded, everything in memory.
//! Every fatal error fires before the first site-folder mutation; once
//! writing starts only I/O failures can interrupt, and re-running
//! reproduces the same target state.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::attachments::{self, AttachmentError};
use crate::config::SiteConfig;
use crate::corpus::{Corpus, CorpusError};
use crate::diagnostics::{Diagnostic, Report};
use crate::indexes::{self, IndexPageError};
use crate::links::resolve_body;
use crate::render::{RenderError, Renderer, assemble_page};
use crate::site::{self, ApplyError, PlanAction, SitePlan, assets};
use crate::text::strip_tags;
use crate::zettel::{ParseError, ReservedPage, Zettel, ZettelId, parse};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("zettelkasten folder not found: {0}")]
    MissingZettelkasten(String),

    #[error("site folder {0} must not be the zettelkasten folder or live inside it")]
    SiteOverlapsZettelkasten(String),

    #[error("failed to walk zettelkasten: {0}")]
    Walk(#[source] walkdir::Error),

    #[error("failed to read {0}: {1}")]
    Read(String, #[source] std::io::Error),

    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    IndexPage(#[from] IndexPageError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to prepare site folder {0}: {1}")]
    SiteFolder(String, #[source] std::io::Error),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Attachment(#[from] AttachmentError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Rewrite `style.css` from the built-in default. Off by default so a
    /// user's stylesheet survives ordinary runs.
    pub refresh_css: bool,
}

#[derive(Debug)]
pub struct RunSummary {
    pub published: usize,
    pub written: Vec<String>,
    pub deleted: Vec<String>,
    /// Absolute paths the caller must confirm before deletion.
    pub needs_confirmation: Vec<PathBuf>,
    pub report: Report,
}

/// Everything computed before any site-folder mutation.
struct Prepared {
    plan: SitePlan,
    content: BTreeMap<String, String>,
    attachments: BTreeMap<String, PathBuf>,
    report: Report,
    published: usize,
}

/// Generate the site. The zettelkasten folder is only ever read.
pub fn generate(
    config: &SiteConfig,
    renderer: &dyn Renderer,
    opts: RunOptions,
) -> Result<RunSummary, PipelineError> {
    let prepared = prepare(config, renderer, opts)?;

    fs::create_dir_all(&config.site_path)
        .map_err(|e| PipelineError::SiteFolder(config.site_path.display().to_string(), e))?;
    let outcome = site::apply(&prepared.plan, &config.site_path, &prepared.content)?;
    let mut written = outcome.written;
    written.extend(attachments::copy_into(&config.site_path, &prepared.attachments)?);

    Ok(RunSummary {
        published: prepared.published,
        written,
        deleted: outcome.deleted,
        needs_confirmation: outcome.needs_confirmation,
        report: prepared.report,
    })
}

/// Compute the plan a run would apply, without touching the site folder.
pub fn preview(
    config: &SiteConfig,
    renderer: &dyn Renderer,
    opts: RunOptions,
) -> Result<(SitePlan, Report), PipelineError> {
    let prepared = prepare(config, renderer, opts)?;
    Ok((prepared.plan, prepared.report))
}

fn prepare(
    config: &SiteConfig,
    renderer: &dyn Renderer,
    opts: RunOptions,
) -> Result<Prepared, PipelineError> {
    ensure_site_outside_zettelkasten(config)?;
    let mut report = Report::default();

    let zettels = read_zettelkasten(config)?;
    tracing::info!(count = zettels.len(), "parsed zettelkasten");

    let unpublished: BTreeSet<String> = zettels
        .iter()
        .filter(|z| !z.is_published())
        .filter_map(|z| match &z.id {
            ZettelId::Numeric(id) => Some(id.clone()),
            ZettelId::Reserved(_) => None,
        })
        .collect();

    for zettel in zettels.iter().filter(|z| z.is_published() && z.title.is_empty()) {
        report.push(Diagnostic::MissingTitle { id: zettel.id.clone() });
    }

    let corpus = Corpus::build(zettels)?;
    tracing::info!(published = corpus.len(), "built corpus");
    if corpus.get(&ZettelId::Reserved(ReservedPage::About)).is_none() {
        return Err(IndexPageError::MissingRequiredPage("about").into());
    }

    // Derived page bodies; the categorical index also checks index.md.
    let categorical = indexes::categorical_body(&corpus)?;
    let alphabetical = indexes::alphabetical_body(&corpus);
    let chronological = indexes::chronological_body(&corpus, config.hide_chrono_index_dates);

    let mut pages: Vec<(ZettelId, String)> = corpus
        .iter()
        .map(|z| {
            let body = if z.id == ZettelId::Reserved(ReservedPage::Index) {
                categorical.clone()
            } else {
                z.body.clone()
            };
            (z.id.clone(), body)
        })
        .collect();
    pages.push((ZettelId::Reserved(ReservedPage::AlphabeticalIndex), alphabetical));
    pages.push((ZettelId::Reserved(ReservedPage::ChronologicalIndex), chronological));

    let (header, footer) = load_templates(config);
    let mut content = BTreeMap::new();
    let mut attachment_copies = BTreeMap::new();
    let mut stems = BTreeSet::new();

    for (id, body) in pages {
        let rewritten = attachments::rewrite_links(&body, &config.zettelkasten_path);
        attachment_copies.extend(rewritten.copies);
        let body = if config.hide_tags { strip_tags(&rewritten.body) } else { rewritten.body };
        let resolved = resolve_body(&id, &body, &corpus, &unpublished);
        report.extend(resolved.diagnostics);

        let body_html = renderer.render(&resolved.body)?;
        let copyright = (id == ZettelId::Reserved(ReservedPage::Index))
            .then_some(config.copyright_text.as_str());
        let page_html =
            assemble_page(&header, &body_html, &footer, &config.site_title, copyright);

        content.insert(format!("{}.md", id.stem()), resolved.body);
        content.insert(format!("{}.html", id.stem()), page_html);
        stems.insert(id.stem().to_string());
    }

    let existing = list_site_files(config);
    let ignored = site::load_ignore_list(&config.site_path);
    let mut plan = site::plan(&stems, &existing, &ignored, &config.site_path);
    if opts.refresh_css {
        plan.set("style.css", PlanAction::Overwrite);
        content.insert("style.css".to_string(), assets::STYLE_CSS.to_string());
    }

    Ok(Prepared {
        plan,
        content,
        attachments: attachment_copies,
        report,
        published: stems.len(),
    })
}

/// The planner deletes stray markdown from the site folder, so pointing
/// the site at the zettelkasten (or a folder inside it) would destroy
/// source notes. Refuse before anything else runs.
fn ensure_site_outside_zettelkasten(config: &SiteConfig) -> Result<(), PipelineError> {
    // Compare the configured paths as written and their canonical forms;
    // a fresh site folder does not exist yet and cannot be canonicalized.
    let overlaps = config.site_path.starts_with(&config.zettelkasten_path)
        || canonical_or_raw(&config.site_path)
            .starts_with(canonical_or_raw(&config.zettelkasten_path));
    if overlaps {
        return Err(PipelineError::SiteOverlapsZettelkasten(
            config.site_path.display().to_string(),
        ));
    }
    Ok(())
}

fn canonical_or_raw(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn read_zettelkasten(config: &SiteConfig) -> Result<Vec<Zettel>, PipelineError> {
    let root = &config.zettelkasten_path;
    if !root.is_dir() {
        return Err(PipelineError::MissingZettelkasten(root.display().to_string()));
    }

    let mut zettels = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = entry.map_err(PipelineError::Walk)?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let content = fs::read_to_string(path)
            .map_err(|e| PipelineError::Read(path.display().to_string(), e))?;
        let zettel = parse(stem, &content).map_err(|source| PipelineError::Parse {
            file: path.display().to_string(),
            source,
        })?;
        zettels.push(zettel);
    }
    Ok(zettels)
}

/// Header and footer come from the site folder when the user has copies
/// there, otherwise from the built-in defaults. The planner writes the
/// defaults out on first run, so both views stay consistent.
fn load_templates(config: &SiteConfig) -> (String, String) {
    let header = fs::read_to_string(config.site_path.join("header.html"))
        .unwrap_or_else(|_| assets::HEADER_HTML.to_string());
    let footer = fs::read_to_string(config.site_path.join("footer.html"))
        .unwrap_or_else(|_| assets::FOOTER_HTML.to_string());
    (header, footer)
}

fn list_site_files(config: &SiteConfig) -> Vec<String> {
    let Ok(entries) = fs::read_dir(&config.site_path) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect()
}
