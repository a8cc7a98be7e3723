//! The acquisition pipeline: an ordered chain of providers ending in the
//! synthetic generator.
//!
//! Providers are tried strictly one after another. The first success wins and
//! no later provider is called. Every provider failure, including a timeout,
//! is recorded and swallowed here; once the chain is exhausted the synthetic
//! generator, which cannot fail, supplies the image. `acquire` therefore has
//! no error path.
//!
//! Dropping the future returned by `acquire` (for example when axum drops a
//! handler because the client went away) drops the in-flight upstream request
//! and no further provider is called.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod attempt;

pub use attempt::{AttemptLog, AttemptOutcome, AttemptSummary, ProviderAttempt};

use crate::config::ProvidersConfig;
use crate::encoding::encode;
use crate::error::{ProviderError, Result};
use crate::models::{EncodedImage, ImageResult, Prompt};
use crate::providers::{default_chain, ImageProvider};
use crate::synthetic::SyntheticGenerator;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// The outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub request_id: Uuid,
    pub image: EncodedImage,
    /// Name of the provider (or `synthetic`) that produced the image.
    pub source: &'static str,
    pub attempts: Vec<ProviderAttempt>,
}

pub struct AcquisitionPipeline {
    providers: Vec<Arc<dyn ImageProvider>>,
    generator: SyntheticGenerator,
    attempt_timeout: Duration,
}

impl AcquisitionPipeline {
    pub fn new(providers: Vec<Arc<dyn ImageProvider>>, attempt_timeout: Duration) -> Self {
        Self {
            providers,
            generator: SyntheticGenerator::new(),
            attempt_timeout,
        }
    }

    /// Build the standard Unsplash, Pixabay, placeholder chain.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        Ok(Self::new(
            default_chain(config)?,
            Duration::from_secs(config.attempt_timeout_seconds),
        ))
    }

    pub fn providers(&self) -> impl Iterator<Item = &dyn ImageProvider> + '_ {
        self.providers.iter().map(|p| p.as_ref())
    }

    /// Validate raw caller text, then acquire.
    ///
    /// Fails with `InvalidInput` before any provider is contacted.
    pub async fn acquire_raw(&self, raw: &str) -> Result<Acquisition> {
        let prompt = Prompt::parse(raw)?;
        Ok(self.acquire(&prompt).await)
    }

    /// Produce exactly one encoded image for `prompt`.
    pub async fn acquire(&self, prompt: &Prompt) -> Acquisition {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let mut log = AttemptLog::new();

        let mut winner: Option<(&'static str, ImageResult)> = None;
        for provider in &self.providers {
            let name = provider.name();
            let attempt_started = Instant::now();

            let result = match tokio::time::timeout(self.attempt_timeout, provider.fetch_image(prompt)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::UpstreamError(format!(
                    "timed out after {}ms",
                    self.attempt_timeout.as_millis()
                ))),
            };
            let elapsed = attempt_started.elapsed();

            match result {
                Ok(image) => {
                    debug!("{} succeeded with {} bytes", name, image.len());
                    log.push(ProviderAttempt {
                        provider: name,
                        outcome: AttemptOutcome::Success {
                            bytes: image.len(),
                            mime_type: image.mime_type.clone(),
                        },
                        elapsed,
                    });
                    winner = Some((name, image));
                    break;
                }
                Err(e) => {
                    debug!("{} failed: {}", name, e);
                    log.push(ProviderAttempt {
                        provider: name,
                        outcome: AttemptOutcome::Failure(e),
                        elapsed,
                    });
                }
            }
        }

        let (source, image) = match winner {
            Some(found) => found,
            None => self.synthesize(prompt, &mut log),
        };

        let encoded = encode(&image);
        let elapsed = started.elapsed();
        log.emit(request_id, source, elapsed);
        crate::metrics::record_acquisition(source, elapsed.as_secs_f64());

        Acquisition {
            request_id,
            image: encoded,
            source,
            attempts: log.into_attempts(),
        }
    }

    fn synthesize(&self, prompt: &Prompt, log: &mut AttemptLog) -> (&'static str, ImageResult) {
        let started = Instant::now();
        let image = self.generator.generate(prompt);
        log.push(ProviderAttempt {
            provider: self.generator.name(),
            outcome: AttemptOutcome::Success {
                bytes: image.len(),
                mime_type: image.mime_type.clone(),
            },
            elapsed: started.elapsed(),
        });
        (self.generator.name(), image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::decode;
    use crate::error::AppError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Fail(ProviderError),
        Succeed(Vec<u8>, &'static str),
        Hang,
    }

    struct StubProvider {
        name: &'static str,
        behaviour: Behaviour,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(name: &'static str, behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                name,
                behaviour,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageProvider for StubProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn fetch_image(&self, _prompt: &Prompt) -> std::result::Result<ImageResult, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behaviour {
                Behaviour::Fail(e) => Err(e.clone()),
                Behaviour::Succeed(bytes, mime) => Ok(ImageResult::new(bytes.clone(), *mime)),
                Behaviour::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }
    }

    fn pipeline(providers: Vec<Arc<dyn ImageProvider>>) -> AcquisitionPipeline {
        AcquisitionPipeline::new(providers, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_short_circuits_on_first_success() {
        let first = StubProvider::new("first", Behaviour::Fail(ProviderError::NoResults));
        let second = StubProvider::new("second", Behaviour::Succeed(vec![0xFF, 0xD8, 0xFF, 0x01], "image/jpeg"));
        let third = StubProvider::new("third", Behaviour::Succeed(vec![1, 2, 3], "image/png"));

        let providers: Vec<Arc<dyn ImageProvider>> = vec![first.clone(), second.clone(), third.clone()];
        let acquisition = pipeline(providers)
            .acquire(&Prompt::parse("red fox").unwrap())
            .await;

        assert_eq!(acquisition.source, "second");
        assert_eq!(acquisition.image.as_str(), "data:image/jpeg;base64,/9j/AQ==");
        assert_eq!((first.calls(), second.calls(), third.calls()), (1, 1, 0));
        assert_eq!(acquisition.attempts.len(), 2);
    }

    #[tokio::test]
    async fn test_falls_back_to_synthetic() {
        let providers: Vec<Arc<dyn ImageProvider>> = vec![
            StubProvider::new("a", Behaviour::Fail(ProviderError::Unavailable("no key".into()))),
            StubProvider::new("b", Behaviour::Fail(ProviderError::UpstreamError("HTTP 500".into()))),
            StubProvider::new("c", Behaviour::Fail(ProviderError::ImplausiblePayload { size: 10, minimum: 750 })),
        ];
        let prompt = Prompt::parse("A red fox").unwrap();
        let acquisition = pipeline(providers).acquire(&prompt).await;

        assert_eq!(acquisition.source, "synthetic");
        let expected = encode(&SyntheticGenerator::new().generate(&prompt));
        assert_eq!(acquisition.image, expected);

        let labels: Vec<_> = acquisition.attempts.iter().map(|a| a.outcome.label()).collect();
        assert_eq!(labels, vec!["unavailable", "upstream_error", "implausible_payload", "success"]);
    }

    #[tokio::test]
    async fn test_empty_chain_still_produces_image() {
        let acquisition = pipeline(Vec::new())
            .acquire(&Prompt::parse("sunset over mountains").unwrap())
            .await;
        let (mime, bytes) = decode(&acquisition.image).unwrap();
        assert_eq!(mime, "image/svg+xml");
        assert!(String::from_utf8(bytes).unwrap().contains("sunset over mountains"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_moves_to_next_provider() {
        let slow = StubProvider::new("slow", Behaviour::Hang);
        let fast = StubProvider::new("fast", Behaviour::Succeed(b"GIF89a-data".to_vec(), "image/gif"));

        let providers: Vec<Arc<dyn ImageProvider>> = vec![slow.clone(), fast.clone()];
        let acquisition = pipeline(providers)
            .acquire(&Prompt::parse("anything").unwrap())
            .await;

        assert_eq!(acquisition.source, "fast");
        match &acquisition.attempts[0].outcome {
            AttemptOutcome::Failure(ProviderError::UpstreamError(reason)) => {
                assert!(reason.contains("timed out"))
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_acquire_calls_no_later_provider() {
        let slow = StubProvider::new("slow", Behaviour::Hang);
        let next = StubProvider::new("next", Behaviour::Succeed(vec![1, 2, 3], "image/png"));
        let providers: Vec<Arc<dyn ImageProvider>> = vec![slow.clone(), next.clone()];
        let pipeline = pipeline(providers);
        let prompt = Prompt::parse("anything").unwrap();

        // Caller gives up well before the 200ms attempt timeout
        let abandoned = tokio::time::timeout(Duration::from_millis(50), pipeline.acquire(&prompt)).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(slow.calls(), 1);
        assert_eq!(next.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_prompt_touches_no_provider() {
        let provider = StubProvider::new("only", Behaviour::Succeed(vec![1], "image/png"));
        let providers: Vec<Arc<dyn ImageProvider>> = vec![provider.clone()];
        let result = pipeline(providers).acquire_raw("   ").await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert_eq!(provider.calls(), 0);
    }
}
