//! Pure diff between the publishable set and the site folder's current
//! contents. No filesystem effects happen here; [`super::apply`] executes
//! the plan.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// What a run will do to one site-folder file. First matching rule wins:
///
/// 1. stem matches an output (eligible zettel ID or reserved page) -> overwrite
/// 2. preserved asset (`style.css`, `header.html`, `footer.html`) -> create if absent
/// 3. any other markdown file -> delete
/// 4. any other HTML file -> delete after confirmation, unless its absolute
///    path is listed in `ssg-ignore.txt` -> keep
///
/// Files of any other type are left untouched and get no plan entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    Overwrite,
    CreateIfAbsent,
    Delete,
    DeleteWithConfirmation,
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub file_name: String,
    pub action: PlanAction,
}

#[derive(Debug, Default)]
pub struct SitePlan {
    entries: BTreeMap<String, PlanAction>,
}

impl SitePlan {
    pub fn action_for(&self, file_name: &str) -> Option<PlanAction> {
        self.entries.get(file_name).copied()
    }

    pub fn set(&mut self, file_name: &str, action: PlanAction) {
        self.entries.insert(file_name.to_string(), action);
    }

    pub fn iter(&self) -> impl Iterator<Item = PlanEntry> + '_ {
        self.entries
            .iter()
            .map(|(name, action)| PlanEntry { file_name: name.clone(), action: *action })
    }

    pub fn with_action(&self, action: PlanAction) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

pub const PRESERVED_ASSETS: [&str; 3] = ["style.css", "header.html", "footer.html"];

pub const IGNORE_FILE_NAME: &str = "ssg-ignore.txt";

/// Compute the plan for one run.
///
/// `output_stems` are the file stems the run will produce (`.md` and
/// `.html` for each); `existing` is the site folder's current file
/// listing; `ignored` holds absolute paths exempted from
/// delete-with-confirmation.
pub fn plan(
    output_stems: &BTreeSet<String>,
    existing: &[String],
    ignored: &BTreeSet<PathBuf>,
    site_path: &Path,
) -> SitePlan {
    let mut plan = SitePlan::default();

    for stem in output_stems {
        plan.set(&format!("{stem}.md"), PlanAction::Overwrite);
        plan.set(&format!("{stem}.html"), PlanAction::Overwrite);
    }
    for asset in PRESERVED_ASSETS {
        plan.set(asset, PlanAction::CreateIfAbsent);
    }

    for file_name in existing {
        if plan.action_for(file_name).is_some() {
            continue;
        }
        let extension = Path::new(file_name).extension().and_then(|e| e.to_str());
        match extension {
            Some("md") => plan.set(file_name, PlanAction::Delete),
            Some("html") => {
                if ignored.contains(&site_path.join(file_name)) {
                    plan.set(file_name, PlanAction::Keep);
                } else {
                    plan.set(file_name, PlanAction::DeleteWithConfirmation);
                }
            }
            // Anything else is not ours to manage.
            _ => {}
        }
    }
    plan
}

/// Read `ssg-ignore.txt` from the site folder: one absolute path per
/// line, blank lines skipped. A missing file is an empty list.
pub fn load_ignore_list(site_path: &Path) -> BTreeSet<PathBuf> {
    let path = site_path.join(IGNORE_FILE_NAME);
    match std::fs::read_to_string(&path) {
        Ok(contents) => contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect(),
        Err(_) => {
            tracing::debug!(path = %path.display(), "no ignore list found");
            BTreeSet::new()
        }
    }
}
