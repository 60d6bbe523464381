//! Sources command implementation

use crate::cli::output::{format_sources_json, format_sources_table, SourceView};
use crate::cli::{load_config, SourcesArgs};
use crate::config::PulseboardConfig;
use crate::poller::Source;

/// Source views in configuration order.
pub fn source_views(config: &PulseboardConfig) -> Vec<SourceView> {
    config
        .sources
        .iter()
        .map(|c| SourceView::from(&Source::from(c)))
        .collect()
}

/// Handle `pulseboard sources` command
pub fn handle_sources(args: &SourcesArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let views = source_views(&config);

    if args.json {
        return Ok(format_sources_json(&views));
    }
    if views.is_empty() {
        return Ok("No sources configured.".to_string());
    }
    Ok(format_sources_table(&views))
}
