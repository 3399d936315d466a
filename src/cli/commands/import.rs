use crate::adapters::authorized_keys::Destination;
use crate::adapters::http_fetcher::HttpFetcher;
use crate::cli::Cli;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::services::encoder::UrlTemplate;
use crate::core::services::import_service::ImportService;

/// Execute the import batch. Returns the number of identifiers that failed.
///
/// Configuration and destination setup happen before any fetch, so a bad
/// template or an uncreatable destination aborts the run up front.
pub fn execute(args: &Cli) -> Result<usize> {
    let config = AppConfig::load()?;
    let template = UrlTemplate::new(config.url_template)?;
    let destination = Destination::resolve(args.output.as_deref())?;
    let fetcher = HttpFetcher::new(args.environment);

    ImportService::new(&template, &fetcher, &destination).run(&args.identifiers)
}
