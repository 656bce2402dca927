//! Plan command implementation. Dry run of a build.

use std::path::Path;

use zettelsite_core::config;
use zettelsite_core::pipeline::{self, RunOptions};
use zettelsite_core::render::ComrakRenderer;
use zettelsite_core::site::PlanAction;

use crate::logging;

pub fn run(config_path: Option<&Path>) {
    let cfg = match config::load(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(&cfg.logging);
    tracing::info!(site = %cfg.site_path.display(), "computing plan");

    let (plan, report) = match pipeline::preview(&cfg, &ComrakRenderer, RunOptions::default()) {
        Ok(preview) => preview,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("plan for {}", cfg.site_path.display());
    for entry in plan.iter() {
        let verb = match entry.action {
            PlanAction::Overwrite => "write",
            PlanAction::CreateIfAbsent => "create if absent",
            PlanAction::Delete => "delete",
            PlanAction::DeleteWithConfirmation => "delete (asks first)",
            PlanAction::Keep => "keep",
        };
        println!("  {verb:<18} {}", entry.file_name);
    }

    println!("{report}");
}
