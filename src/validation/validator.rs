//! The gallery validator: pattern rules, then a timed decode.
//!
//! Each [`GalleryValidator::classify`] call is independent. There is no
//! shared mutable state, no cache and no retry; callers may run as many at
//! once as they like and memoize results themselves.
//!
//! The decode runs on tokio's blocking pool and is raced against
//! `timeout`. If the timer wins, the join handle is dropped and whatever
//! the decode eventually produces is discarded. Timeouts, fetch errors,
//! decode errors and panicked tasks all come back as [`Verdict::Unknown`],
//! never as `Placeholder`.

use super::heuristics::{Thresholds, ValidationResult, Verdict, judge};
use super::rules::PlaceholderRules;
use super::source::ImageSource;
use crate::config::ValidatorConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct GalleryValidator<S: ImageSource> {
    source: Arc<S>,
    rules: PlaceholderRules,
    thresholds: Thresholds,
    timeout: Duration,
}

impl<S: ImageSource> Clone for GalleryValidator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            rules: self.rules.clone(),
            thresholds: self.thresholds,
            timeout: self.timeout,
        }
    }
}

impl<S: ImageSource> GalleryValidator<S> {
    /// Validator with stock rules, thresholds and timeout.
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            rules: PlaceholderRules::default(),
            thresholds: Thresholds::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(source: S, config: &ValidatorConfig) -> Self {
        Self {
            source: Arc::new(source),
            rules: PlaceholderRules::new(&config.placeholder_patterns),
            thresholds: config.thresholds(),
            timeout: config.timeout(),
        }
    }

    pub fn with_rules(mut self, rules: PlaceholderRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn rules(&self) -> &PlaceholderRules {
        &self.rules
    }

    /// Pattern check on the raw template (digit run removed, tokens left as
    /// written). `true` means the whole gallery can be suppressed.
    pub fn template_is_entirely_placeholder(&self, template: &str) -> bool {
        self.rules.template_is_entirely_placeholder(template)
    }

    /// Classify one URL.
    pub async fn classify(&self, url: &str) -> ValidationResult {
        if let Some(pattern) = self.rules.matched_pattern(url) {
            tracing::debug!(url, pattern, "placeholder by url pattern");
            return ValidationResult::placeholder(format!("url matches placeholder pattern '{pattern}'"));
        }

        let source = Arc::clone(&self.source);
        let thresholds = self.thresholds;
        let owned_url = url.to_string();
        let decode = tokio::task::spawn_blocking(move || {
            let loaded = source.load(&owned_url)?;
            Ok::<_, super::source::SourceError>(judge(
                loaded.dimensions,
                || source.estimate_size(&loaded),
                &thresholds,
            ))
        });

        let result = match tokio::time::timeout(self.timeout, decode).await {
            Ok(Ok(Ok(result))) => result,
            Ok(Ok(Err(e))) => ValidationResult::unknown(format!("could not load image: {e}")),
            Ok(Err(join_error)) => {
                tracing::warn!(url, error = %join_error, "decode task failed");
                ValidationResult::unknown("decode task failed")
            }
            Err(_) => {
                tracing::warn!(url, timeout_ms = self.timeout.as_millis() as u64, "image load timed out");
                ValidationResult::unknown(format!(
                    "timed out after {}ms",
                    self.timeout.as_millis()
                ))
            }
        };
        tracing::debug!(url, verdict = %result.verdict, reason = %result.reason, "classified");
        result
    }

    /// Classify every URL concurrently. Results come back in input order.
    pub async fn classify_all(&self, urls: &[String]) -> Vec<ValidationResult> {
        let mut set = JoinSet::new();
        for (i, url) in urls.iter().enumerate() {
            let validator = self.clone();
            let url = url.clone();
            set.spawn(async move { (i, validator.classify(&url).await) });
        }

        let mut results: Vec<Option<ValidationResult>> = vec![None; urls.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((i, result)) => results[i] = Some(result),
                Err(e) => tracing::warn!(error = %e, "classification task failed"),
            }
        }
        results
            .into_iter()
            .map(|r| r.unwrap_or_else(|| ValidationResult::unknown("classification task failed")))
            .collect()
    }

    /// [`classify_all`](Self::classify_all) on a private runtime, for
    /// callers without one.
    ///
    /// The runtime is shut down without waiting on abandoned decodes, so a
    /// slow server can hold a blocking thread but not the caller.
    pub fn classify_all_blocking(&self, urls: &[String]) -> std::io::Result<Vec<ValidationResult>> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_time()
            .build()?;
        let results = runtime.block_on(self.classify_all(urls));
        runtime.shutdown_background();
        Ok(results)
    }

    /// Number of URLs in `results` judged to be placeholders.
    pub fn placeholder_count(results: &[ValidationResult]) -> usize {
        results
            .iter()
            .filter(|r| r.verdict == Verdict::Placeholder)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::source::tests::{MockImage, MockSource};
    use crate::validation::source::{Dimensions, NullSource};

    fn loads(w: u32, h: u32, size: Option<u64>) -> MockImage {
        MockImage::Loads {
            dims: Dimensions::new(w, h),
            size,
        }
    }

    #[tokio::test]
    async fn pattern_hit_skips_decode() {
        let validator = GalleryValidator::new(MockSource::new());
        let r = validator
            .classify("https://pics.example/n/now_printing/now_printing.jpg")
            .await;
        assert_eq!(r.verdict, Verdict::Placeholder);
        assert!(r.reason.contains("now_printing"));

        let r = validator.classify("https://h/icon.svg").await;
        assert_eq!(r.verdict, Verdict::Placeholder);
        assert!(validator.source.loaded_urls().is_empty());
    }

    #[tokio::test]
    async fn small_dimensions_are_placeholder() {
        let source = MockSource::new().with("https://h/a.jpg", loads(100, 100, Some(90_000)));
        let r = GalleryValidator::new(source).classify("https://h/a.jpg").await;
        assert_eq!(r.verdict, Verdict::Placeholder);
        assert!(r.reason.contains("dimensions"));
    }

    #[tokio::test]
    async fn large_image_goes_on_to_size_check() {
        let source = MockSource::new().with("https://h/a.jpg", loads(800, 540, Some(8_000)));
        let validator = GalleryValidator::new(source);
        let r = validator.classify("https://h/a.jpg").await;
        assert_eq!(r.verdict, Verdict::Placeholder);
        assert!(r.reason.contains("file too small"));
        assert_eq!(
            *validator.source.estimates.lock().unwrap(),
            vec![Dimensions::new(800, 540)]
        );
    }

    #[tokio::test]
    async fn large_image_with_large_size_is_valid() {
        let source = MockSource::new().with("https://h/a.jpg", loads(800, 540, Some(120_000)));
        let r = GalleryValidator::new(source).classify("https://h/a.jpg").await;
        assert_eq!(r.verdict, Verdict::Valid);
        assert_eq!(r.dimensions, Some(Dimensions::new(800, 540)));
    }

    #[tokio::test]
    async fn unsupported_size_estimate_is_valid() {
        let source = MockSource::new().with("https://h/a.jpg", loads(800, 540, None));
        let r = GalleryValidator::new(source).classify("https://h/a.jpg").await;
        assert_eq!(r.verdict, Verdict::Valid);
        assert!(r.reason.contains("size not checked"));
    }

    #[tokio::test]
    async fn load_failure_is_unknown() {
        let source = MockSource::new().with("https://h/a.jpg", MockImage::Broken);
        let r = GalleryValidator::new(source).classify("https://h/a.jpg").await;
        assert_eq!(r.verdict, Verdict::Unknown);
    }

    #[tokio::test]
    async fn null_source_yields_unknown() {
        let r = GalleryValidator::new(NullSource).classify("https://h/a.jpg").await;
        assert_eq!(r.verdict, Verdict::Unknown);
    }

    #[tokio::test]
    async fn slow_load_times_out_as_unknown() {
        let source = MockSource::new()
            .with("https://h/a.jpg", loads(800, 540, Some(120_000)))
            .slow(Duration::from_millis(400));
        let validator = GalleryValidator::new(source).with_timeout(Duration::from_millis(20));
        let r = validator.classify("https://h/a.jpg").await;
        assert_eq!(r.verdict, Verdict::Unknown);
        assert!(r.reason.contains("timed out"));
    }

    #[tokio::test]
    async fn custom_rules_and_thresholds_apply() {
        let source = MockSource::new().with("https://h/a.jpg", loads(100, 100, None));
        let validator = GalleryValidator::new(source)
            .with_rules(PlaceholderRules::new(["blocked"]))
            .with_thresholds(Thresholds {
                min_dimension_px: 50,
                min_size_bytes: 1,
            });
        assert_eq!(validator.classify("https://h/a.jpg").await.verdict, Verdict::Valid);
        assert_eq!(
            validator.classify("https://h/blocked.jpg").await.verdict,
            Verdict::Placeholder
        );
        assert!(!validator.template_is_entirely_placeholder("https://h/now_printing#.jpg"));
    }

    #[tokio::test]
    async fn classify_all_keeps_input_order() {
        let source = MockSource::new()
            .with("https://h/big.jpg", loads(900, 900, Some(200_000)))
            .with("https://h/small.jpg", loads(60, 60, None));
        let validator = GalleryValidator::new(source);
        let urls = vec![
            "https://h/small.jpg".to_string(),
            "https://h/x.svg".to_string(),
            "https://h/big.jpg".to_string(),
            "https://h/missing.jpg".to_string(),
        ];
        let verdicts: Vec<_> = validator
            .classify_all(&urls)
            .await
            .into_iter()
            .map(|r| r.verdict)
            .collect();
        assert_eq!(
            verdicts,
            [Verdict::Placeholder, Verdict::Placeholder, Verdict::Valid, Verdict::Unknown]
        );
    }

    #[test]
    fn blocking_classify_returns_at_the_timeout() {
        let source = MockSource::new()
            .with("https://h/a.jpg", loads(800, 540, Some(120_000)))
            .slow(Duration::from_secs(3));
        let validator = GalleryValidator::new(source).with_timeout(Duration::from_millis(50));

        let started = std::time::Instant::now();
        let results = validator
            .classify_all_blocking(&["https://h/a.jpg".to_string()])
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(results[0].verdict, Verdict::Unknown);
        assert!(elapsed < Duration::from_secs(2), "blocked for {elapsed:?}");
    }

    #[test]
    fn placeholder_count_counts_only_placeholders() {
        let results = vec![
            ValidationResult::placeholder("a"),
            ValidationResult::unknown("b"),
            ValidationResult::placeholder("c"),
        ];
        assert_eq!(GalleryValidator::<NullSource>::placeholder_count(&results), 2);
    }
}
