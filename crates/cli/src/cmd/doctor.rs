//! Doctor command implementation.

use std::path::Path;

use zettelsite_core::config::{default_config_path, load};

pub fn run(config_path: Option<&Path>) {
    let cfg = match load(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            println!("FAIL zettelsite doctor");
            println!("{e}");
            if config_path.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    };

    println!("OK   zettelsite doctor");
    println!(
        "path: {}",
        config_path.map_or_else(
            || default_config_path().display().to_string(),
            |p| p.display().to_string()
        )
    );
    println!("zettelkasten_path: {}", cfg.zettelkasten_path.display());
    println!("site_path: {}", cfg.site_path.display());
    println!("site_title: {}", cfg.site_title);
    println!("hide_tags: {}", cfg.hide_tags);
    println!("hide_chrono_index_dates: {}", cfg.hide_chrono_index_dates);
    println!("logging.level: {}", cfg.logging.level);

    if !cfg.zettelkasten_path.is_dir() {
        println!("FAIL zettelkasten folder does not exist");
        std::process::exit(1);
    }
}
