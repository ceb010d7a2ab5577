//! Portuguese → English translation with a bounded retry policy.
//!
//! Translation is the only network-bound stage and the one most likely
//! to fail, so a failure never aborts the batch:
//! - each article gets up to `RetryPolicy::max_attempts` calls (default 2)
//! - a fixed `RetryPolicy::delay` (default 60s) separates the calls
//! - when every attempt fails, the article's translation is
//!   [`TRANSLATION_SENTINEL`]
//!
//! Waiting goes through a [`Sleeper`] and progress through a
//! [`TranslationObserver`], so neither is baked into the retry logic.

use rayon::prelude::*;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::article::Article;
use crate::error::TranslationError;

/// Translation stored for articles whose every attempt failed.
pub const TRANSLATION_SENTINEL: &str = "ERRO";

/// Public Google Translate endpoint used by [`GoogleTranslator`].
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// An external translation capability.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslationError>;
}

/// Blocking client for the Google Translate `translate_a/single` API.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TranslationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslationError> {
        // The service rejects empty queries
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("client", "gtx"), ("sl", source), ("tl", target), ("dt", "t")])
            .form(&[("q", text)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Status(status.as_u16()));
        }

        let body: Value = response.json()?;
        parse_google_response(&body)
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body looks like `[[["Hello", "Olá", ...], ["world", "mundo", ...]], ...]`.
fn parse_google_response(body: &Value) -> Result<String, TranslationError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::MalformedResponse("missing segment list".into()))?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(Value::as_str) {
            translated.push_str(part);
        }
    }

    Ok(translated)
}

/// Waits between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (at least 1)
    pub max_attempts: u32,
    /// Wait before each attempt after the first
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Call `op` (with the 1-based attempt number) until it succeeds or
    /// the attempts run out. `on_retry` sees each failure that will be
    /// retried, right before the wait. The last error is returned.
    pub fn run<T, E>(
        &self,
        sleeper: &dyn Sleeper,
        mut op: impl FnMut(u32) -> Result<T, E>,
        mut on_retry: impl FnMut(u32, &E),
    ) -> Result<T, E> {
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts => {
                    on_retry(attempt, &err);
                    sleeper.sleep(self.delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Receives per-article translation progress.
pub trait TranslationObserver: Send + Sync {
    fn on_attempt(&self, _index: usize, _chars: usize, _attempt: u32) {}
    fn on_success(&self, _index: usize, _attempt: u32) {}
    fn on_retry(&self, _index: usize, _error: &TranslationError, _delay: Duration) {}
    fn on_give_up(&self, _index: usize, _error: &TranslationError) {}
}

/// Ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TranslationObserver for NoopObserver {}

/// Reports progress as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TranslationObserver for TracingObserver {
    fn on_attempt(&self, index: usize, chars: usize, attempt: u32) {
        debug!(article = index, chars, attempt, "translating article");
    }

    fn on_success(&self, index: usize, attempt: u32) {
        info!(article = index, attempt, "translation succeeded");
    }

    fn on_retry(&self, index: usize, error: &TranslationError, delay: Duration) {
        warn!(
            article = index,
            %error,
            delay_secs = delay.as_secs_f64(),
            "translation failed, retrying after delay"
        );
    }

    fn on_give_up(&self, index: usize, error: &TranslationError) {
        warn!(article = index, %error, "translation failed, storing sentinel");
    }
}

/// The translation stage: a translator plus its retry and reporting setup.
pub struct TranslationStage {
    translator: Box<dyn Translator>,
    policy: RetryPolicy,
    sleeper: Box<dyn Sleeper>,
    observer: Box<dyn TranslationObserver>,
    source: String,
    target: String,
    workers: usize,
}

impl TranslationStage {
    /// Portuguese → English, default policy, blocking sleeps, tracing
    /// observer, one worker.
    pub fn new(translator: impl Translator + 'static) -> Self {
        Self {
            translator: Box::new(translator),
            policy: RetryPolicy::default(),
            sleeper: Box::new(ThreadSleeper),
            observer: Box::new(TracingObserver),
            source: "pt".to_string(),
            target: "en".to_string(),
            workers: 1,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn with_observer(mut self, observer: impl TranslationObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_languages(mut self, source: &str, target: &str) -> Self {
        self.source = source.to_string();
        self.target = target.to_string();
        self
    }

    /// Translate up to `workers` articles at once. 1 means strictly
    /// sequential.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Translate one text under the retry policy. `None` when every
    /// attempt failed.
    pub fn translate_one(&self, index: usize, text: &str) -> Option<String> {
        let chars = text.chars().count();

        let result = self.policy.run(
            self.sleeper.as_ref(),
            |attempt| {
                self.observer.on_attempt(index, chars, attempt);
                let result = self.translator.translate(text, &self.source, &self.target);
                if result.is_ok() {
                    self.observer.on_success(index, attempt);
                }
                result
            },
            |_, error| self.observer.on_retry(index, error, self.policy.delay),
        );

        match result {
            Ok(translated) => Some(translated),
            Err(error) => {
                self.observer.on_give_up(index, &error);
                None
            }
        }
    }

    /// Set `translation` on every article. Failed articles get
    /// [`TRANSLATION_SENTINEL`]. Returns the number of failures.
    pub fn translate_all(&self, articles: &mut [Article]) -> usize {
        let outcomes = if self.workers > 1 {
            self.translate_parallel(articles)
        } else {
            self.translate_sequential(articles)
        };

        let mut failures = 0;
        for (article, outcome) in articles.iter_mut().zip(outcomes) {
            article.translation = Some(outcome.unwrap_or_else(|| {
                failures += 1;
                TRANSLATION_SENTINEL.to_string()
            }));
        }

        failures
    }

    fn translate_sequential(&self, articles: &[Article]) -> Vec<Option<String>> {
        articles
            .iter()
            .enumerate()
            .map(|(index, article)| self.translate_one(index, &article.text))
            .collect()
    }

    fn translate_parallel(&self, articles: &[Article]) -> Vec<Option<String>> {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
        {
            Ok(pool) => pool,
            Err(error) => {
                warn!(%error, "could not start translation workers, translating sequentially");
                return self.translate_sequential(articles);
            }
        };

        pool.install(|| {
            articles
                .par_iter()
                .enumerate()
                .map(|(index, article)| self.translate_one(index, &article.text))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    /// Fails the first `failures` calls, then echoes the text in English.
    struct FlakyTranslator {
        failures: u32,
        calls: Arc<AtomicU32>,
    }

    impl FlakyTranslator {
        fn new(failures: u32) -> (Self, Arc<AtomicU32>) {
            let calls = Arc::new(AtomicU32::new(0));
            (
                Self {
                    failures,
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    impl Translator for FlakyTranslator {
        fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslationError> {
            assert_eq!((source, target), ("pt", "en"));
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(TranslationError::Status(503))
            } else {
                Ok(format!("EN:{text}"))
            }
        }
    }

    /// Fails for any text containing "falha".
    struct SelectiveTranslator;

    impl Translator for SelectiveTranslator {
        fn translate(&self, text: &str, _: &str, _: &str) -> Result<String, TranslationError> {
            if text.contains("falha") {
                Err(TranslationError::MalformedResponse("boom".into()))
            } else {
                Ok(text.to_uppercase())
            }
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSleeper(Arc<Mutex<Vec<Duration>>>);

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.0.lock().unwrap().push(duration);
        }
    }

    #[derive(Clone, Default)]
    struct RecordingObserver(Arc<Mutex<Vec<String>>>);

    impl TranslationObserver for RecordingObserver {
        fn on_attempt(&self, index: usize, chars: usize, attempt: u32) {
            self.0.lock().unwrap().push(format!("attempt {index} {chars} {attempt}"));
        }
        fn on_success(&self, index: usize, attempt: u32) {
            self.0.lock().unwrap().push(format!("success {index} {attempt}"));
        }
        fn on_retry(&self, index: usize, _: &TranslationError, delay: Duration) {
            self.0.lock().unwrap().push(format!("retry {index} {}", delay.as_secs()));
        }
        fn on_give_up(&self, index: usize, _: &TranslationError) {
            self.0.lock().unwrap().push(format!("give_up {index}"));
        }
    }

    fn articles(texts: &[&str]) -> Vec<Article> {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        texts
            .iter()
            .map(|t| Article::new(date, "https://exemplo.com.br", *t))
            .collect()
    }

    #[test]
    fn test_success_on_first_attempt() {
        let (translator, calls) = FlakyTranslator::new(0);
        let sleeper = RecordingSleeper::default();
        let stage = TranslationStage::new(translator).with_sleeper(sleeper.clone());

        assert_eq!(stage.translate_one(0, "olá"), Some("EN:olá".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(sleeper.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_fails_once_then_succeeds() {
        let (translator, calls) = FlakyTranslator::new(1);
        let sleeper = RecordingSleeper::default();
        let stage = TranslationStage::new(translator).with_sleeper(sleeper.clone());

        let mut batch = articles(&["safra recorde"]);
        let failures = stage.translate_all(&mut batch);

        assert_eq!(failures, 0);
        assert_eq!(batch[0].translation.as_deref(), Some("EN:safra recorde"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*sleeper.0.lock().unwrap(), vec![Duration::from_secs(60)]);
    }

    #[test]
    fn test_always_fails_stores_sentinel() {
        let (translator, calls) = FlakyTranslator::new(u32::MAX);
        let sleeper = RecordingSleeper::default();
        let stage = TranslationStage::new(translator).with_sleeper(sleeper.clone());

        let mut batch = articles(&["safra recorde"]);
        let failures = stage.translate_all(&mut batch);

        assert_eq!(failures, 1);
        assert_eq!(batch[0].translation.as_deref(), Some(TRANSLATION_SENTINEL));
        // Exactly two attempts, one wait between them
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(sleeper.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let stage = TranslationStage::new(SelectiveTranslator)
            .with_sleeper(RecordingSleeper::default())
            .with_observer(NoopObserver);

        let mut batch = articles(&["um", "falha aqui", "três"]);
        let failures = stage.translate_all(&mut batch);

        assert_eq!(failures, 1);
        let translations: Vec<_> = batch.iter().map(|a| a.translation.as_deref()).collect();
        assert_eq!(translations, vec![Some("UM"), Some("ERRO"), Some("TRÊS")]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let texts = ["a", "falha 1", "c", "d", "falha 2", "f", "g"];
        let sequential = TranslationStage::new(SelectiveTranslator)
            .with_sleeper(RecordingSleeper::default())
            .with_observer(NoopObserver);
        let parallel = TranslationStage::new(SelectiveTranslator)
            .with_sleeper(RecordingSleeper::default())
            .with_observer(NoopObserver)
            .with_workers(3);

        let mut seq_batch = articles(&texts);
        let mut par_batch = articles(&texts);

        assert_eq!(sequential.translate_all(&mut seq_batch), 2);
        assert_eq!(parallel.translate_all(&mut par_batch), 2);
        assert_eq!(seq_batch, par_batch);
    }

    #[test]
    fn test_observer_sees_progress() {
        let (translator, _) = FlakyTranslator::new(1);
        let observer = RecordingObserver::default();
        let stage = TranslationStage::new(translator)
            .with_sleeper(RecordingSleeper::default())
            .with_observer(observer.clone());

        stage.translate_one(4, "soja");

        assert_eq!(
            *observer.0.lock().unwrap(),
            vec!["attempt 4 4 1", "retry 4 60", "attempt 4 4 2", "success 4 2"]
        );
    }

    #[test]
    fn test_retry_policy_attempt_budget() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::new(3, Duration::from_millis(5));
        let mut seen = Vec::new();

        let result: Result<(), u32> = policy.run(&sleeper, |attempt| Err(attempt), |a, _| seen.push(a));

        assert_eq!(result, Err(3));
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(sleeper.0.lock().unwrap().len(), 2);

        // Zero attempts is clamped to one
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[test]
    fn test_parse_google_response() {
        let body: Value = serde_json::from_str(
            r#"[[["Record harvest. ","Safra recorde. ",null,null,10],["Prices rise.","Preços sobem.",null,null,10]],null,"pt"]"#,
        )
        .unwrap();
        assert_eq!(
            parse_google_response(&body).unwrap(),
            "Record harvest. Prices rise."
        );

        let malformed: Value = serde_json::from_str(r#"{"error": "quota"}"#).unwrap();
        assert!(matches!(
            parse_google_response(&malformed),
            Err(TranslationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_google_translator_skips_blank_text() {
        let translator = GoogleTranslator::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        assert_eq!(translator.translate("  ", "pt", "en").unwrap(), "");
    }
}
