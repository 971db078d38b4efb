//! Scatter-gather over every configured provider with one call-wide deadline.

use std::{sync::Arc, time::Duration};

use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, warn};

use crate::{
    Config,
    config::DEFAULT_DEADLINE,
    error::AggregateError,
    provider::{TemperatureProvider, providers_from_config},
};

/// Averages the temperature reported by several providers queried in parallel.
#[derive(Debug, Clone)]
pub struct Aggregator {
    providers: Vec<Arc<dyn TemperatureProvider>>,
    deadline: Duration,
}

impl Aggregator {
    pub fn new(providers: Vec<Arc<dyn TemperatureProvider>>) -> Self {
        Self { providers, deadline: DEFAULT_DEADLINE }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Build an aggregator over every provider that has an API key in `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let providers = providers_from_config(config)?;
        let deadline = config.deadline()?;
        Ok(Self::new(providers).with_deadline(deadline))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Combined temperature for `city`, in Celsius.
    ///
    /// Every provider is queried concurrently. Readings that arrive before the
    /// deadline are averaged; later ones are dropped. The first provider error
    /// aborts the call and is returned as is. If nothing succeeded by the time
    /// collection stops, the call fails with [`AggregateError::NoReadings`].
    ///
    /// Provider calls still running when this returns are left to finish in
    /// the background; their outcomes are discarded.
    pub async fn temperature(&self, city: &str) -> Result<f64, AggregateError> {
        let expected = self.providers.len();
        if expected == 0 {
            return Err(AggregateError::NoProviders);
        }

        let deadline = Instant::now() + self.deadline;
        // One slot per provider so no sender ever waits on us.
        let (tx, mut rx) = mpsc::channel::<anyhow::Result<f64>>(expected);
        let city: Arc<str> = Arc::from(city);

        for provider in &self.providers {
            let provider = Arc::clone(provider);
            let city = Arc::clone(&city);
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = provider.temperature(&city).await;
                // Fails only once the aggregation has already returned.
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        let timeout = tokio::time::sleep_until(deadline);
        tokio::pin!(timeout);

        let mut sum = 0.0;
        let mut count = 0usize;

        while count < expected {
            tokio::select! {
                biased;

                outcome = rx.recv() => match outcome {
                    Some(Ok(value)) => {
                        sum += value;
                        count += 1;
                        debug!(%city, value, received = count, expected, "provider reading received");
                    }
                    Some(Err(err)) => {
                        warn!(%city, error = %err, "provider failed, aborting aggregation");
                        return Err(AggregateError::Provider(err));
                    }
                    // Every task is gone without reporting (a provider panicked).
                    None => break,
                },
                () = &mut timeout => {
                    debug!(%city, received = count, expected, "deadline elapsed, reducing partial readings");
                    break;
                }
            }
        }

        if count == 0 {
            return Err(AggregateError::NoReadings { deadline: self.deadline });
        }

        Ok(sum / count as f64)
    }
}
