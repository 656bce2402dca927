//! Build command implementation.

use std::path::Path;

use dialoguer::Confirm;
use zettelsite_core::config;
use zettelsite_core::pipeline::{self, RunOptions};
use zettelsite_core::render::ComrakRenderer;
use zettelsite_core::site::{IGNORE_FILE_NAME, delete_confirmed};

use crate::{BuildArgs, logging};

pub fn run(config_path: Option<&Path>, args: BuildArgs) {
    let cfg = match config::load(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(&cfg.logging);
    tracing::info!(
        zettelkasten = %cfg.zettelkasten_path.display(),
        site = %cfg.site_path.display(),
        "starting build"
    );

    let opts = RunOptions { refresh_css: args.refresh_css };
    let summary = match pipeline::generate(&cfg, &ComrakRenderer, opts) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "published {} page(s) to {} ({} written, {} deleted)",
        summary.published,
        cfg.site_path.display(),
        summary.written.len(),
        summary.deleted.len()
    );
    println!("{}", summary.report);

    if summary.needs_confirmation.is_empty() {
        return;
    }
    if args.keep {
        println!("kept {} leftover html file(s)", summary.needs_confirmation.len());
        return;
    }

    let mut confirmed = Vec::new();
    for path in &summary.needs_confirmation {
        let delete = args.yes
            || Confirm::new()
                .with_prompt(format!("delete leftover file {}?", path.display()))
                .default(false)
                .interact()
                .unwrap_or(false);
        if delete {
            confirmed.push(path.clone());
        } else {
            println!("kept {} (list it in {IGNORE_FILE_NAME} to stop asking)", path.display());
        }
    }

    match delete_confirmed(&confirmed) {
        Ok(n) if n > 0 => println!("deleted {n} leftover html file(s)"),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
