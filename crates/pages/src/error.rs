use analytics::AnalyticsError;
use configuration::PageId;
use generator::GeneratorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Failed to generate the dataset for page '{page}': {source}")]
    Dataset {
        page: PageId,
        #[source]
        source: GeneratorError,
    },

    #[error("Failed to build a view: {0}")]
    Analytics(#[from] AnalyticsError),
}
