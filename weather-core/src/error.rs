use std::time::Duration;

use thiserror::Error;

/// Ways a single aggregation call can fail.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// The aggregator was built without any provider to ask.
    #[error("No weather providers configured.\nHint: run `weather configure <provider>` first.")]
    NoProviders,

    /// The first provider failure observed; later outcomes are ignored.
    #[error(transparent)]
    Provider(anyhow::Error),

    /// The deadline elapsed before any provider answered successfully.
    #[error("No provider returned a temperature within {deadline:?}")]
    NoReadings { deadline: Duration },
}
