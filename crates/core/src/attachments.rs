//! Linked attachment handling.
//!
//! Published notes may link to files sitting near them (images, PDFs).
//! Those links are reduced to bare file names and the files are copied
//! into the site folder, so published pages stay self-contained instead
//! of pointing at paths that only exist on the author's machine.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::text::mask_code_spans;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("failed to copy attachment {0}: {1}")]
    Copy(String, #[source] io::Error),
}

static ATTACHMENT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\]\((?:file://)?([^()\n]+\.(?:pdf|png|jpg|jpeg))\)").unwrap()
});

/// A body with attachment links reduced to bare file names, plus the
/// source files to copy, keyed by their output file name.
#[derive(Debug, Default)]
pub struct RewrittenBody {
    pub body: String,
    pub copies: BTreeMap<String, PathBuf>,
}

/// Rewrite markdown links to existing attachment files.
///
/// Absolute targets and targets relative to the zettelkasten folder are
/// both recognized. A link whose file does not exist is left untouched,
/// and links inside code spans are never rewritten.
pub fn rewrite_links(body: &str, zettelkasten_path: &Path) -> RewrittenBody {
    let masked = mask_code_spans(body);
    let mut out = String::with_capacity(body.len());
    let mut copies = BTreeMap::new();
    let mut cursor = 0;

    for caps in ATTACHMENT_LINK.captures_iter(&masked) {
        let whole = caps.get(0).expect("match");
        let target = &body[caps.get(1).expect("target group").range()];
        let path = Path::new(target);
        let source =
            if path.is_absolute() { path.to_path_buf() } else { zettelkasten_path.join(path) };
        if !source.is_file() {
            continue;
        }
        let Some(file_name) = source.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        out.push_str(&body[cursor..whole.start()]);
        out.push_str("](");
        out.push_str(file_name);
        out.push(')');
        cursor = whole.end();
        copies.insert(file_name.to_string(), source);
    }
    out.push_str(&body[cursor..]);
    RewrittenBody { body: out, copies }
}

/// Copy collected attachments into the site folder. A destination that
/// already is the source file is skipped.
pub fn copy_into(
    site_path: &Path,
    copies: &BTreeMap<String, PathBuf>,
) -> Result<Vec<String>, AttachmentError> {
    let mut copied = Vec::new();
    for (file_name, source) in copies {
        let dest = site_path.join(file_name);
        if let (Ok(d), Ok(s)) = (fs::canonicalize(&dest), fs::canonicalize(source)) {
            if d == s {
                tracing::debug!(file = %file_name, "attachment already in place");
                continue;
            }
        }
        fs::copy(source, &dest)
            .map_err(|e| AttachmentError::Copy(source.display().to_string(), e))?;
        copied.push(file_name.clone());
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn seed(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"data").unwrap();
        path
    }

    #[test]
    fn test_relative_link_rewritten_and_collected() {
        let zk = TempDir::new().unwrap();
        seed(&zk, "diagram.png");
        let rewritten = rewrite_links("see ![d](diagram.png)\n", zk.path());
        assert_eq!(rewritten.body, "see ![d](diagram.png)\n");
        assert_eq!(rewritten.copies.len(), 1);
        assert_eq!(rewritten.copies["diagram.png"], zk.path().join("diagram.png"));
    }

    #[test]
    fn test_absolute_link_reduced_to_file_name() {
        let zk = TempDir::new().unwrap();
        let attachments = TempDir::new().unwrap();
        let pdf = seed(&attachments, "report.pdf");
        let body = format!("[report]({})\n", pdf.display());
        let rewritten = rewrite_links(&body, zk.path());
        assert_eq!(rewritten.body, "[report](report.pdf)\n");
        assert_eq!(rewritten.copies["report.pdf"], pdf);
    }

    #[test]
    fn test_missing_file_left_untouched() {
        let zk = TempDir::new().unwrap();
        let body = "![x](missing.png) and [y](/nowhere/gone.pdf)\n";
        let rewritten = rewrite_links(body, zk.path());
        assert_eq!(rewritten.body, body);
        assert!(rewritten.copies.is_empty());
    }

    #[test]
    fn test_links_in_code_spans_ignored() {
        let zk = TempDir::new().unwrap();
        seed(&zk, "diagram.png");
        let body = "`![d](diagram.png)`\n";
        let rewritten = rewrite_links(body, zk.path());
        assert_eq!(rewritten.body, body);
        assert!(rewritten.copies.is_empty());
    }

    #[test]
    fn test_note_links_are_not_attachments() {
        let zk = TempDir::new().unwrap();
        fs::write(zk.path().join("20201221140928.md"), "# A\n").unwrap();
        let rewritten = rewrite_links("[a](20201221140928.md)\n", zk.path());
        assert!(rewritten.copies.is_empty());
    }

    #[test]
    fn test_copy_into_site_folder() {
        let zk = TempDir::new().unwrap();
        let site = TempDir::new().unwrap();
        let png = seed(&zk, "diagram.png");
        let copies: BTreeMap<String, PathBuf> = [("diagram.png".to_string(), png)].into();
        let copied = copy_into(site.path(), &copies).unwrap();
        assert_eq!(copied, vec!["diagram.png".to_string()]);
        assert!(site.path().join("diagram.png").exists());
    }

    #[test]
    fn test_copy_skips_file_already_in_place() {
        let site = TempDir::new().unwrap();
        let png = seed(&site, "diagram.png");
        let copies: BTreeMap<String, PathBuf> = [("diagram.png".to_string(), png)].into();
        let copied = copy_into(site.path(), &copies).unwrap();
        assert!(copied.is_empty());
    }
}
