//! Non-interactive subcommands. Each prints JSON to stdout.

use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context};
use lens_core::request::build_search_request;
use lens_core::settings::JudgeCategory;
use lens_core::{LensConfig, Message, ResultSet, SearchSettings, Viewer, ViewerSettings};
use tracing::{info, warn};

use crate::demo::demo_results;

/// Results from `file`, the bundled demo, or nothing (the empty state).
pub fn load_document(file: Option<&Path>, demo: bool) -> anyhow::Result<Option<ResultSet>> {
    match (file, demo) {
        (_, true) => demo_results(),
        (Some(path), false) => lens_core::load_result_file(path)
            .with_context(|| format!("Failed to load results from {}", path.display())),
        (None, false) => Ok(None),
    }
}

pub fn inspect(
    settings: ViewerSettings,
    results: Option<ResultSet>,
    page: isize,
) -> anyhow::Result<()> {
    let mut viewer = Viewer::new(settings);
    viewer.load_results(results);
    if page != 0 && !viewer.update(Message::PageRequested(page), Instant::now()).page_changed {
        warn!(page, total = viewer.carousel().total_pages(), "page out of range, showing page 0");
    }
    println!("{}", serde_json::to_string_pretty(&viewer.view())?);
    Ok(())
}

pub fn request(mut settings: SearchSettings, query: &str, aspects: &[String]) -> anyhow::Result<()> {
    for name in aspects {
        settings
            .add_aspect(name)
            .with_context(|| format!("Invalid aspect {:?}", name))?;
    }

    info!(
        browser = settings.browser.id(),
        generator = settings.generator.id(),
        judged = ?JudgeCategory::ALL
            .iter()
            .filter(|c| settings.judge.category(**c).enabled)
            .map(|c| c.name())
            .collect::<Vec<_>>(),
        "{}",
        settings.describe()
    );

    let request = build_search_request(query, &settings).context("Cannot build search request")?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

pub fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    lens_core::save_config(&LensConfig::default(), path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "default config written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_document_without_input_is_empty() {
        assert!(load_document(None, false).unwrap().is_none());
        assert!(load_document(None, true).unwrap().is_some());
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let path = std::env::temp_dir().join("factlens_cli_init_config.toml");
        let _ = std::fs::remove_file(&path);

        init_config(&path, false).unwrap();
        assert!(init_config(&path, false).is_err());
        init_config(&path, true).unwrap();
        assert_eq!(lens_core::load_config(&path).unwrap(), LensConfig::default());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_request_requires_aspects() {
        assert!(request(SearchSettings::default(), "query", &[]).is_err());
        assert!(request(SearchSettings::default(), "query", &["pro".to_string()]).is_ok());
    }
}
