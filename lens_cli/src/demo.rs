//! Bundled sample results for `--demo`.

use anyhow::Context;
use lens_core::file_io::parse_result_document;
use lens_core::ResultSet;
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

const DEMO_FILE: &str = "demo_results.json";

pub fn demo_results() -> anyhow::Result<Option<ResultSet>> {
    let file = Assets::get(DEMO_FILE).context("demo results are not bundled")?;
    let text = std::str::from_utf8(file.data.as_ref()).context("demo results are not UTF-8")?;
    parse_result_document(text).context("invalid demo results")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_results_parse() {
        let results = demo_results().unwrap().unwrap();
        let names: Vec<&str> = results.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["Benefits", "Drawbacks", "Regulation"]);
    }
}
