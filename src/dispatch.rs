// ABOUTME: Fan-out dispatcher issuing one text generation per selection concurrently
// ABOUTME: Isolates per-selection failures as data and returns results in input order
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::config::DispatchConfig;
use crate::credentials::CredentialSet;
use crate::metrics;
use crate::registry::describe_selection;
use crate::types::{
    ErrorKind, Generation, PlaygroundError, ProviderFactory, ProviderId, Selection, TokenUsage,
};

/// Legacy output for a provider without a configured client factory
pub const UNSUPPORTED_OUTPUT: &str = "Provider not supported.";

/// How one selection settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The provider returned text
    Generated {
        /// Generated text
        text: String,
        /// Token usage, when reported
        usage: Option<TokenUsage>,
    },
    /// Client construction, model resolution, or generation failed
    Failed {
        /// Error category
        kind: ErrorKind,
        /// Human-readable reason
        reason: String,
    },
}

impl Outcome {
    fn from_result(result: Result<Generation, PlaygroundError>) -> Self {
        match result {
            Ok(generation) => Self::Generated {
                text: generation.text,
                usage: generation.usage,
            },
            Err(e) => Self::Failed {
                kind: e.kind,
                reason: e.message,
            },
        }
    }

    /// Whether generation succeeded
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }

    /// Single-string projection used on the wire
    ///
    /// Success and failure share one field there; failures read
    /// `"Request failed: <reason>"` or [`UNSUPPORTED_OUTPUT`].
    pub fn legacy_output(&self) -> String {
        match self {
            Self::Generated { text, .. } => text.clone(),
            Self::Failed {
                kind: ErrorKind::UnsupportedProvider,
                ..
            } => UNSUPPORTED_OUTPUT.to_owned(),
            Self::Failed { reason, .. } => format!("Request failed: {reason}"),
        }
    }

    /// Usage, present only on success
    pub const fn usage(&self) -> Option<TokenUsage> {
        match self {
            Self::Generated { usage, .. } => *usage,
            Self::Failed { .. } => None,
        }
    }
}

/// Settled result for one selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    /// The selection this result answers
    pub selection: Selection,
    /// Success or failure
    pub outcome: Outcome,
    /// Wall-clock time in milliseconds
    pub duration_ms: u64,
}

/// Client factories keyed by provider
#[derive(Clone, Default)]
pub struct ProviderFactories {
    factories: HashMap<ProviderId, Arc<dyn ProviderFactory>>,
}

impl ProviderFactories {
    /// An empty table; every provider is unsupported until registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for a provider
    pub fn insert(&mut self, provider: ProviderId, factory: Arc<dyn ProviderFactory>) {
        self.factories.insert(provider, factory);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, provider: ProviderId, factory: Arc<dyn ProviderFactory>) -> Self {
        self.insert(provider, factory);
        self
    }

    /// Factory for a provider, if one is configured
    pub fn get(&self, provider: ProviderId) -> Option<Arc<dyn ProviderFactory>> {
        self.factories.get(&provider).map(Arc::clone)
    }

    /// Providers with a configured factory
    pub fn providers(&self) -> Vec<ProviderId> {
        let mut providers: Vec<_> = self.factories.keys().copied().collect();
        providers.sort();
        providers
    }
}

impl fmt::Debug for ProviderFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderFactories")
            .field("providers", &self.providers())
            .finish()
    }
}

/// Dispatches every selection of a batch to its provider concurrently
#[derive(Debug, Clone)]
pub struct Dispatcher {
    factories: ProviderFactories,
    max_concurrency: Option<NonZeroUsize>,
}

impl Dispatcher {
    /// Create a dispatcher with the given factories and fan-out configuration
    pub fn new(factories: ProviderFactories, config: DispatchConfig) -> Self {
        Self {
            factories,
            max_concurrency: config.max_concurrency,
        }
    }

    /// Providers this dispatcher can reach
    pub fn supported_providers(&self) -> Vec<ProviderId> {
        self.factories.providers()
    }

    /// Execute every selection and collect results in input order
    ///
    /// Each selection runs in its own tokio task. Failures in one selection
    /// do not affect others and never fail the call as a whole. The
    /// concurrency limit, when set, applies per call. Callers are
    /// expected to have checked credentials first; a missing key here simply
    /// reaches the factory as an empty string.
    pub async fn dispatch(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        selections: &[Selection],
        credentials: &CredentialSet,
    ) -> Vec<ResultItem> {
        let system_prompt: Arc<str> = Arc::from(system_prompt);
        let user_prompt: Arc<str> = Arc::from(user_prompt);
        let limit = self
            .max_concurrency
            .map(|n| Arc::new(Semaphore::new(n.get())));
        let mut handles = Vec::with_capacity(selections.len());

        for selection in selections {
            let call = SingleCall {
                factory: self.factories.get(selection.provider_id),
                api_key: credentials
                    .usable(selection.provider_id)
                    .unwrap_or_default()
                    .to_owned(),
                selection: selection.clone(),
                system_prompt: Arc::clone(&system_prompt),
                user_prompt: Arc::clone(&user_prompt),
            };
            let limit = limit.clone();

            handles.push(tokio::spawn(async move {
                let _permit = match limit {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                call.run().await
            }));
        }

        join_all(handles)
            .await
            .into_iter()
            .zip(selections)
            .map(|(joined, selection)| {
                joined.unwrap_or_else(|e| {
                    warn!(provider = %selection.provider_id, error = %e, "Dispatch task failed");
                    ResultItem {
                        selection: selection.clone(),
                        outcome: Outcome::from_result(Err(PlaygroundError::internal(format!(
                            "Task join error: {e}"
                        )))),
                        duration_ms: 0,
                    }
                })
            })
            .collect()
    }
}

/// Everything one spawned task owns
struct SingleCall {
    factory: Option<Arc<dyn ProviderFactory>>,
    api_key: String,
    selection: Selection,
    system_prompt: Arc<str>,
    user_prompt: Arc<str>,
}

impl SingleCall {
    async fn run(self) -> ResultItem {
        let start = Instant::now();
        let (provider_name, model_label) = describe_selection(&self.selection);
        debug!(
            provider = provider_name,
            model = %model_label,
            "Dispatching selection"
        );

        let result = match &self.factory {
            Some(factory) => self.generate(factory.as_ref()).await,
            None => Err(PlaygroundError::unsupported_provider(self.selection.provider_id)),
        };
        let outcome = Outcome::from_result(result);
        let duration_ms = elapsed_ms(start);

        if let Outcome::Failed { kind, reason } = &outcome {
            warn!(
                provider = %self.selection.provider_id,
                model = %self.selection.model_id,
                kind = ?kind,
                reason = %reason,
                duration_ms,
                "Selection failed"
            );
        }
        let succeeded = outcome.is_success();
        metrics::record_item(self.selection.provider_id, succeeded, duration_ms);

        ResultItem {
            selection: self.selection,
            outcome,
            duration_ms,
        }
    }

    async fn generate(&self, factory: &dyn ProviderFactory) -> Result<Generation, PlaygroundError> {
        let client = factory.create_client(&self.api_key)?;
        let model = client.language_model(&self.selection.model_id)?;
        model.generate(&self.system_prompt, &self.user_prompt).await
    }
}

/// Convert elapsed time to milliseconds as u64
fn elapsed_ms(start: Instant) -> u64 {
    let millis = start.elapsed().as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::types::{LanguageModel, ProviderClient};

    /// Fake provider echoing its inputs, with a call spy and optional failures
    #[derive(Default)]
    struct FakeFactory {
        fail_model: Option<&'static str>,
        panic_model: Option<&'static str>,
        build_error: Option<&'static str>,
        delay_for: HashMap<&'static str, Duration>,
        calls: AtomicUsize,
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    struct FakeClient {
        api_key: String,
        fail_model: Option<&'static str>,
        panic_model: Option<&'static str>,
        delay_for: HashMap<&'static str, Duration>,
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    struct FakeModel {
        model_id: String,
        api_key: String,
        fail: bool,
        panic: bool,
        delay: Duration,
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl ProviderFactory for FakeFactory {
        fn create_client(
            &self,
            api_key: &str,
        ) -> Result<Box<dyn ProviderClient>, PlaygroundError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = self.build_error {
                return Err(PlaygroundError::config(message));
            }
            Ok(Box::new(FakeClient {
                api_key: api_key.to_owned(),
                fail_model: self.fail_model,
                panic_model: self.panic_model,
                delay_for: self.delay_for.clone(),
                in_flight: Arc::clone(&self.in_flight),
                peak: Arc::clone(&self.peak),
            }))
        }
    }

    impl ProviderClient for FakeClient {
        fn language_model(
            &self,
            model_id: &str,
        ) -> Result<Box<dyn LanguageModel>, PlaygroundError> {
            Ok(Box::new(FakeModel {
                model_id: model_id.to_owned(),
                api_key: self.api_key.clone(),
                fail: self.fail_model == Some(model_id),
                panic: self.panic_model == Some(model_id),
                delay: self.delay_for.get(model_id).copied().unwrap_or_default(),
                in_flight: Arc::clone(&self.in_flight),
                peak: Arc::clone(&self.peak),
            }))
        }
    }

    #[async_trait]
    impl LanguageModel for FakeModel {
        fn model_id(&self) -> &str {
            &self.model_id
        }

        async fn generate(
            &self,
            system: &str,
            prompt: &str,
        ) -> Result<Generation, PlaygroundError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            assert!(!self.panic, "fake provider panicked");
            if self.fail {
                return Err(PlaygroundError::external_service("fake", "boom"));
            }
            Ok(Generation {
                text: format!("{}|{}|{system}|{prompt}", self.model_id, self.api_key),
                usage: Some(TokenUsage::from_counts(Some(1), Some(2))),
            })
        }
    }

    fn dispatcher_with(factory: Arc<FakeFactory>, config: DispatchConfig) -> Dispatcher {
        let factories = ProviderFactories::new()
            .with(ProviderId::OpenAi, Arc::clone(&factory) as Arc<dyn ProviderFactory>)
            .with(ProviderId::Anthropic, factory as Arc<dyn ProviderFactory>);
        Dispatcher::new(factories, config)
    }

    fn credentials() -> CredentialSet {
        CredentialSet::new()
            .with(ProviderId::OpenAi, " sk-openai ")
            .with(ProviderId::Anthropic, "sk-ant")
    }

    #[tokio::test]
    async fn results_follow_input_order_regardless_of_completion() {
        let factory = Arc::new(FakeFactory {
            delay_for: HashMap::from([("slow", Duration::from_millis(40))]),
            ..FakeFactory::default()
        });
        let dispatcher = dispatcher_with(Arc::clone(&factory), DispatchConfig::unbounded());
        let selections = vec![
            Selection::new(ProviderId::OpenAi, "slow"),
            Selection::new(ProviderId::Anthropic, "fast"),
            Selection::new(ProviderId::OpenAi, "slow"),
        ];

        let items = dispatcher.dispatch("sys", "hi", &selections, &credentials()).await;

        let returned: Vec<_> = items.iter().map(|i| i.selection.clone()).collect();
        assert_eq!(returned, selections);
        assert_eq!(factory.calls.load(Ordering::SeqCst), 3);
        assert!(items.iter().all(|i| i.outcome.is_success()));
    }

    #[tokio::test]
    async fn credential_is_trimmed_before_reaching_factory() {
        let factory = Arc::new(FakeFactory::default());
        let dispatcher = dispatcher_with(factory, DispatchConfig::unbounded());
        let selections = vec![Selection::new(ProviderId::OpenAi, "gpt-4.1-mini")];

        let items = dispatcher.dispatch("be brief", "hello", &selections, &credentials()).await;

        assert_eq!(
            items[0].outcome.legacy_output(),
            "gpt-4.1-mini|sk-openai|be brief|hello"
        );
        assert_eq!(
            items[0].outcome.usage(),
            Some(TokenUsage::from_counts(Some(1), Some(2)))
        );
    }

    #[tokio::test]
    async fn one_failure_does_not_affect_siblings() {
        let factory = Arc::new(FakeFactory {
            fail_model: Some("claude-3-opus-latest"),
            ..FakeFactory::default()
        });
        let dispatcher = dispatcher_with(factory, DispatchConfig::unbounded());
        let selections = vec![
            Selection::new(ProviderId::OpenAi, "gpt-4.1"),
            Selection::new(ProviderId::Anthropic, "claude-3-opus-latest"),
            Selection::new(ProviderId::OpenAi, "o4-mini"),
        ];

        let items = dispatcher.dispatch("", "q", &selections, &credentials()).await;

        assert!(items[0].outcome.is_success());
        assert!(items[2].outcome.is_success());
        assert_eq!(
            items[1].outcome,
            Outcome::Failed {
                kind: ErrorKind::ExternalService,
                reason: "fake: boom".to_owned(),
            }
        );
        assert_eq!(
            items[1].outcome.legacy_output(),
            "Request failed: fake: boom"
        );
        assert_eq!(items[1].outcome.usage(), None);
    }

    #[tokio::test]
    async fn panicking_provider_becomes_item_failure() {
        let factory = Arc::new(FakeFactory {
            panic_model: Some("explodes"),
            ..FakeFactory::default()
        });
        let dispatcher = dispatcher_with(factory, DispatchConfig::unbounded());
        let selections = vec![
            Selection::new(ProviderId::OpenAi, "explodes"),
            Selection::new(ProviderId::Anthropic, "fine"),
        ];

        let items = dispatcher.dispatch("", "q", &selections, &credentials()).await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].selection, selections[0]);
        assert!(matches!(
            items[0].outcome,
            Outcome::Failed {
                kind: ErrorKind::Internal,
                ..
            }
        ));
        assert!(items[1].outcome.is_success());
    }

    #[tokio::test]
    async fn client_construction_failure_is_item_level() {
        let working = Arc::new(FakeFactory::default());
        let broken = Arc::new(FakeFactory {
            build_error: Some("cannot build"),
            ..FakeFactory::default()
        });
        let factories = ProviderFactories::new()
            .with(ProviderId::OpenAi, Arc::clone(&working) as Arc<dyn ProviderFactory>)
            .with(ProviderId::Xai, Arc::clone(&broken) as Arc<dyn ProviderFactory>);
        let dispatcher = Dispatcher::new(factories, DispatchConfig::unbounded());
        let selections = vec![
            Selection::new(ProviderId::OpenAi, "gpt-4.1"),
            Selection::new(ProviderId::Xai, "grok-3"),
            Selection::new(ProviderId::OpenAi, "o4-mini"),
        ];
        let credentials = credentials().with(ProviderId::Xai, "xai-key");

        let items = dispatcher.dispatch("", "q", &selections, &credentials).await;

        assert_eq!(items.len(), 3);
        assert_eq!(items[1].selection, selections[1]);
        assert_eq!(
            items[1].outcome,
            Outcome::Failed {
                kind: ErrorKind::Config,
                reason: "cannot build".to_owned(),
            }
        );
        assert_eq!(
            items[1].outcome.legacy_output(),
            "Request failed: cannot build"
        );
        assert!(items[0].outcome.is_success());
        assert!(items[2].outcome.is_success());
        assert_eq!(broken.calls.load(Ordering::SeqCst), 1);
        assert_eq!(working.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn provider_without_factory_degrades_per_item() {
        let factory = Arc::new(FakeFactory::default());
        let dispatcher = dispatcher_with(factory, DispatchConfig::unbounded());
        let selections = vec![
            Selection::new(ProviderId::Gemini, "gemini-2.0-flash"),
            Selection::new(ProviderId::OpenAi, "gpt-4.1"),
        ];
        let credentials = credentials().with(ProviderId::Gemini, "g-key");

        let items = dispatcher.dispatch("", "q", &selections, &credentials).await;

        assert_eq!(items[0].outcome.legacy_output(), UNSUPPORTED_OUTPUT);
        assert!(items[1].outcome.is_success());
    }

    #[tokio::test]
    async fn concurrency_limit_caps_in_flight_calls() {
        let factory = Arc::new(FakeFactory {
            delay_for: HashMap::from([("m", Duration::from_millis(20))]),
            ..FakeFactory::default()
        });
        let limit = NonZeroUsize::new(2).expect("non-zero");
        let dispatcher = dispatcher_with(
            Arc::clone(&factory),
            DispatchConfig::unbounded().with_max_concurrency(limit),
        );
        let selections = vec![Selection::new(ProviderId::OpenAi, "m"); 6];

        let items = dispatcher.dispatch("", "q", &selections, &credentials()).await;

        assert_eq!(items.len(), 6);
        assert!(factory.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn unbounded_issues_all_calls_together() {
        let factory = Arc::new(FakeFactory {
            delay_for: HashMap::from([("m", Duration::from_millis(50))]),
            ..FakeFactory::default()
        });
        let dispatcher = dispatcher_with(Arc::clone(&factory), DispatchConfig::unbounded());
        let selections = vec![Selection::new(ProviderId::Anthropic, "m"); 5];

        dispatcher.dispatch("", "q", &selections, &credentials()).await;

        assert_eq!(factory.peak.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn empty_batch_returns_empty() {
        let factory = Arc::new(FakeFactory::default());
        let dispatcher = dispatcher_with(Arc::clone(&factory), DispatchConfig::unbounded());
        let items = dispatcher.dispatch("", "", &[], &credentials()).await;
        assert!(items.is_empty());
        assert_eq!(factory.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn supported_providers_are_sorted() {
        let dispatcher =
            dispatcher_with(Arc::new(FakeFactory::default()), DispatchConfig::default());
        assert_eq!(
            dispatcher.supported_providers(),
            vec![ProviderId::OpenAi, ProviderId::Anthropic]
        );
    }
}
