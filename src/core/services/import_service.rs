use crate::adapters::authorized_keys::Destination;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::services::encoder::UrlTemplate;
use crate::core::services::validator;
use crate::core::traits::fetcher::KeyFetcher;

/// Drives the per-identifier loop: encode, fetch, validate, append.
///
/// Identifiers are processed strictly in order, one at a time. A fetch or
/// validation failure is isolated to its identifier; a write failure aborts
/// the whole batch because the destination state is no longer trustworthy.
pub struct ImportService<'a, F: KeyFetcher> {
    template: &'a UrlTemplate,
    fetcher: &'a F,
    destination: &'a Destination,
}

impl<'a, F: KeyFetcher> ImportService<'a, F> {
    pub fn new(template: &'a UrlTemplate, fetcher: &'a F, destination: &'a Destination) -> Self {
        Self {
            template,
            fetcher,
            destination,
        }
    }

    /// Run the batch and return the number of identifiers that failed.
    pub fn run(&self, identifiers: &[String]) -> Result<usize> {
        let mut outcomes = Vec::with_capacity(identifiers.len());

        for identifier in identifiers {
            let url = self.template.resolve(identifier);
            let outcome = self
                .fetcher
                .fetch(&url)
                .and_then(|body| validator::validate(&body));

            match &outcome {
                Ok(keys) => {
                    self.destination.append(&keys.to_appendable_text())?;
                    output::success(&format!(
                        "Imported {} key(s) for '{identifier}' into {}",
                        keys.len(),
                        self.destination.describe()
                    ));
                }
                Err(e) => {
                    output::warning(&format!("Skipping '{identifier}' ({url}): {e}"));
                }
            }
            outcomes.push(outcome.map(|_| ()));
        }

        Ok(outcomes.iter().filter(|outcome| outcome.is_err()).count())
    }
}
