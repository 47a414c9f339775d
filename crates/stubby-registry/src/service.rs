use crate::settings::RegistrySettings;
use async_trait::async_trait;
use jiff::SignedDuration;
use std::sync::Arc;
use stubby_core::{
    Clock, CreateError, CreateParams, LinkRecord, LinkStore, LookupError, Registry, Resolution,
    ShortCode, StorageError, SystemClock, MAX_VALIDITY_MINUTES, MIN_VALIDITY_MINUTES,
};
use stubby_generator::Generator;
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};
use url::Url;

/// A concrete implementation of the `Registry` trait.
///
/// This service wraps a `LinkStore` and a `Generator` to handle:
/// - Input validation (URL, validity window, custom code format)
/// - Short code allocation with bounded collision retry
/// - Expiry checks and click accounting on resolution
///
/// Every mutating operation runs under a single async lock that is held
/// across the store round-trip, so check-then-insert in `create` and
/// check-then-increment in `resolve` cannot interleave.
pub struct RegistryService<S, G, C = SystemClock> {
    store: Arc<S>,
    generator: Arc<G>,
    clock: C,
    settings: RegistrySettings,
    write_lock: Mutex<()>,
}

impl<S: LinkStore, G: Generator> RegistryService<S, G, SystemClock> {
    /// Creates a new `RegistryService` backed by the system clock.
    pub fn new(store: S, generator: G) -> Self {
        Self::with_clock(store, generator, SystemClock)
    }
}

impl<S: LinkStore, G: Generator, C: Clock> RegistryService<S, G, C> {
    /// Creates a new `RegistryService` that reads time from `clock`.
    pub fn with_clock(store: S, generator: G, clock: C) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            clock,
            settings: RegistrySettings::default(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_settings(mut self, settings: RegistrySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates that the URL is absolute, with both a scheme and a host.
    ///
    /// The URL is stored as given, so control characters that the parser
    /// would silently strip are rejected; they could never be sent back in
    /// a `Location` header.
    fn validate_url(url: &str) -> Result<(), CreateError> {
        if url.chars().any(char::is_control) {
            return Err(CreateError::InvalidUrl(format!(
                "{}: contains control characters",
                url.escape_debug()
            )));
        }

        let parsed = Url::parse(url)
            .map_err(|e| CreateError::InvalidUrl(format!("{url}: {e}")))?;

        if !parsed.has_host() {
            return Err(CreateError::InvalidUrl(format!("{url}: missing host")));
        }

        Ok(())
    }

    fn validate_validity(minutes: i64) -> Result<u32, CreateError> {
        u32::try_from(minutes)
            .ok()
            .filter(|m| (MIN_VALIDITY_MINUTES..=MAX_VALIDITY_MINUTES).contains(m))
            .ok_or(CreateError::InvalidValidity(minutes))
    }

    /// Draws generator candidates until one is well-formed and unused.
    ///
    /// Must be called with the write lock held.
    async fn allocate_code(&self) -> Result<ShortCode, CreateError> {
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            let candidate: ShortCode = self.generator.generate().into();

            if !ShortCode::validate_format(candidate.as_str()) {
                warn!(code = %candidate, attempt, "generator produced a malformed short code");
                continue;
            }

            if self.store.get(&candidate).await?.is_none() {
                return Ok(candidate);
            }

            warn!(code = %candidate, attempt, "generated short code collides, drawing again");
        }

        warn!(attempts = max_attempts, "short code generation exhausted");
        Err(CreateError::GenerationExhausted {
            attempts: max_attempts,
        })
    }
}

#[async_trait]
impl<S: LinkStore, G: Generator, C: Clock> Registry for RegistryService<S, G, C> {
    async fn create(&self, params: CreateParams) -> Result<LinkRecord, CreateError> {
        Self::validate_url(&params.original_url)?;
        let validity_minutes = Self::validate_validity(params.validity_minutes)?;
        let custom_code = params.custom_code.map(ShortCode::new).transpose()?;

        let _guard = self.write_lock.lock().await;

        let code = match custom_code {
            Some(code) => {
                // Expired records keep their code until deleted.
                if self.store.get(&code).await?.is_some() {
                    debug!(code = %code, "custom short code already taken");
                    return Err(CreateError::CodeTaken(code.to_string()));
                }
                code
            }
            None => self.allocate_code().await?,
        };

        let created_at = self.clock.now();
        let expires_at = created_at
            .checked_add(SignedDuration::from_mins(i64::from(validity_minutes)))
            .map_err(|_| CreateError::InvalidValidity(params.validity_minutes))?;

        let record = LinkRecord {
            code,
            original_url: params.original_url,
            created_at,
            validity_minutes,
            expires_at,
            clicks: 0,
        };

        self.store.put(record.clone()).await?;

        info!(
            code = %record.code,
            url = %record.original_url,
            validity_minutes,
            expires_at = %record.expires_at,
            "created short link"
        );

        Ok(record)
    }

    async fn resolve(&self, code: &ShortCode) -> Result<Resolution, LookupError> {
        trace!(code = %code, "resolving short code");

        let _guard = self.write_lock.lock().await;

        let Some(mut record) = self.store.get(code).await? else {
            debug!(code = %code, "short code not found");
            return Err(LookupError::NotFound(code.to_string()));
        };

        if record.is_expired_at(self.clock.now()) {
            debug!(code = %code, expires_at = %record.expires_at, "short code expired");
            return Err(LookupError::Expired(code.to_string()));
        }

        record.clicks = record.clicks.saturating_add(1);
        let resolution = Resolution {
            original_url: record.original_url.clone(),
            clicks: record.clicks,
        };
        self.store.put(record).await?;

        debug!(code = %code, url = %resolution.original_url, clicks = resolution.clicks, "resolved short code");
        Ok(resolution)
    }

    async fn delete(&self, code: &ShortCode) -> Result<(), LookupError> {
        let _guard = self.write_lock.lock().await;

        if !self.store.delete(code).await? {
            return Err(LookupError::NotFound(code.to_string()));
        }

        info!(code = %code, "deleted short link");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<LinkRecord>, StorageError> {
        let mut records = self.store.list_all().await?;
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });
        Ok(records)
    }

    fn is_expired(&self, record: &LinkRecord) -> bool {
        record.is_expired_at(self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use stubby_core::{ManualClock, ReadStore};
    use stubby_generator::{RandomGenerator, SeqGenerator};
    use stubby_storage::InMemoryStore;

    type TestService<G> = RegistryService<InMemoryStore, G, ManualClock>;

    /// Always hands out the same code.
    struct FixedGenerator(&'static str);

    impl Generator for FixedGenerator {
        type Output = ShortCode;

        fn generate(&self) -> ShortCode {
            ShortCode::new_unchecked(self.0)
        }
    }

    fn start() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap()
    }

    fn test_service() -> (TestService<RandomGenerator>, ManualClock) {
        test_service_with(RandomGenerator::new())
    }

    fn test_service_with<G: Generator>(generator: G) -> (TestService<G>, ManualClock) {
        let clock = ManualClock::new(start());
        let service = RegistryService::with_clock(InMemoryStore::new(), generator, clock.clone());
        (service, clock)
    }

    fn params(url: &str, custom_code: Option<&str>, validity_minutes: i64) -> CreateParams {
        CreateParams {
            original_url: url.to_string(),
            custom_code: custom_code.map(str::to_string),
            validity_minutes,
        }
    }

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn create_then_resolve_until_expiry() {
        let (service, clock) = test_service();

        let record = service
            .create(params("https://example.com", None, 30))
            .await
            .unwrap();
        assert_eq!(record.code.as_str().len(), 6);
        assert!(ShortCode::validate_format(record.code.as_str()));
        assert_eq!(record.created_at, start());
        assert_eq!(
            record.expires_at.as_millisecond() - record.created_at.as_millisecond(),
            1_800_000
        );
        assert_eq!(record.clicks, 0);

        let resolution = service.resolve(&record.code).await.unwrap();
        assert_eq!(resolution.original_url, "https://example.com");
        assert_eq!(resolution.clicks, 1);

        clock.advance(SignedDuration::from_mins(30) + SignedDuration::from_millis(1));
        let err = service.resolve(&record.code).await.unwrap_err();
        assert!(matches!(err, LookupError::Expired(_)));

        let stored = service.store().get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.clicks, 1);
    }

    #[tokio::test]
    async fn resolve_at_exact_expiry_still_succeeds() {
        let (service, clock) = test_service();
        let record = service
            .create(params("https://example.com", Some("edge"), 1))
            .await
            .unwrap();

        clock.set(record.expires_at);
        let resolution = service.resolve(&record.code).await.unwrap();
        assert_eq!(resolution.clicks, 1);
    }

    #[tokio::test]
    async fn each_resolution_counts_one_click() {
        let (service, _clock) = test_service();
        let record = service
            .create(params("https://example.com", Some("counted"), 10))
            .await
            .unwrap();

        for expected in 1..=5 {
            let resolution = service.resolve(&record.code).await.unwrap();
            assert_eq!(resolution.clicks, expected);
        }
    }

    #[tokio::test]
    async fn create_with_custom_code() {
        let (service, _clock) = test_service();

        let record = service
            .create(params("https://a.com", Some("my-link"), 10))
            .await
            .unwrap();
        assert_eq!(record.code.as_str(), "my-link");
    }

    #[tokio::test]
    async fn duplicate_custom_code_is_rejected_without_overwrite() {
        let (service, _clock) = test_service();

        service
            .create(params("https://a.com", Some("my-link"), 10))
            .await
            .unwrap();
        let err = service
            .create(params("https://b.com", Some("my-link"), 10))
            .await
            .unwrap_err();
        assert!(matches!(err, CreateError::CodeTaken(ref c) if c == "my-link"));

        let records = service.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].original_url, "https://a.com");
    }

    #[tokio::test]
    async fn expired_code_still_blocks_reuse_until_deleted() {
        let (service, clock) = test_service();
        service
            .create(params("https://a.com", Some("reuse"), 1))
            .await
            .unwrap();
        clock.advance(SignedDuration::from_hours(1));

        let err = service
            .create(params("https://b.com", Some("reuse"), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CreateError::CodeTaken(_)));

        service.delete(&code("reuse")).await.unwrap();
        let record = service
            .create(params("https://b.com", Some("reuse"), 1))
            .await
            .unwrap();
        assert_eq!(record.original_url, "https://b.com");
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() {
        let (service, _clock) = test_service();

        for url in ["not-a-url", "", "mailto:someone@example.com", "/relative/path"] {
            let err = service.create(params(url, None, 10)).await.unwrap_err();
            assert!(matches!(err, CreateError::InvalidUrl(_)), "{url}");
        }
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn url_with_control_characters_is_rejected() {
        let (service, _clock) = test_service();

        for url in [
            "https://example.com/a\nb",
            "https://example.com/a\tb",
            "https://exa\rmple.com",
            "https://example.com/\u{7f}",
        ] {
            let err = service
                .create(params(url, Some("ctrl"), 10))
                .await
                .unwrap_err();
            assert!(matches!(err, CreateError::InvalidUrl(_)), "{url:?}");
        }
        assert!(service.store().is_empty());

        let err = service.resolve(&code("ctrl")).await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }

    #[tokio::test]
    async fn url_is_stored_verbatim() {
        let (service, _clock) = test_service();

        let record = service
            .create(params("HTTPS://Example.com", None, 10))
            .await
            .unwrap();
        assert_eq!(record.original_url, "HTTPS://Example.com");
    }

    #[tokio::test]
    async fn validity_bounds() {
        let (service, _clock) = test_service();

        for minutes in [0, 1441, -5] {
            let err = service
                .create(params("https://x.com", None, minutes))
                .await
                .unwrap_err();
            assert!(matches!(err, CreateError::InvalidValidity(m) if m == minutes));
        }

        for minutes in [1, 1440] {
            let record = service
                .create(params("https://x.com", None, minutes))
                .await
                .unwrap();
            assert_eq!(record.validity_minutes as i64, minutes);
        }
    }

    #[tokio::test]
    async fn malformed_custom_code_is_rejected() {
        let (service, _clock) = test_service();

        for custom in ["", "has space", "slash/es", "ümlaut"] {
            let err = service
                .create(params("https://x.com", Some(custom), 10))
                .await
                .unwrap_err();
            assert!(matches!(err, CreateError::InvalidCodeFormat(_)), "{custom}");
        }
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn generated_collision_draws_again() {
        let (service, _clock) = test_service_with(SeqGenerator::with_prefix("st"));
        service
            .create(params("https://taken.com", Some("st000000"), 10))
            .await
            .unwrap();

        let record = service
            .create(params("https://x.com", None, 10))
            .await
            .unwrap();
        assert_eq!(record.code.as_str(), "st000001");

        let taken = service.store().get(&code("st000000")).await.unwrap().unwrap();
        assert_eq!(taken.original_url, "https://taken.com");
    }

    #[tokio::test]
    async fn generation_exhausted_after_bounded_attempts() {
        let (service, _clock) = test_service_with(FixedGenerator("always"));
        let service = service.with_settings(RegistrySettings::builder().max_attempts(3).build());

        service
            .create(params("https://first.com", None, 10))
            .await
            .unwrap();
        let err = service
            .create(params("https://second.com", None, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, CreateError::GenerationExhausted { attempts: 3 }));

        let kept = service.store().get(&code("always")).await.unwrap().unwrap();
        assert_eq!(kept.original_url, "https://first.com");
    }

    #[tokio::test]
    async fn malformed_generated_codes_are_skipped() {
        let (service, _clock) = test_service_with(FixedGenerator("bad code"));

        let err = service
            .create(params("https://x.com", None, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, CreateError::GenerationExhausted { attempts: 10 }));
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn resolve_unknown_is_not_found() {
        let (service, _clock) = test_service();

        let err = service.resolve(&code("nope")).await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn delete_then_resolve_is_not_found() {
        let (service, _clock) = test_service();
        let record = service
            .create(params("https://example.com", Some("gone"), 10))
            .await
            .unwrap();

        service.delete(&record.code).await.unwrap();

        let err = service.resolve(&record.code).await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));

        let err = service.delete(&record.code).await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_expired_records() {
        let (service, clock) = test_service();
        let record = service
            .create(params("https://example.com", Some("stale"), 1))
            .await
            .unwrap();
        clock.advance(SignedDuration::from_mins(2));

        service.delete(&record.code).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_keeps_expired() {
        let (service, clock) = test_service();

        service
            .create(params("https://one.com", Some("one"), 1))
            .await
            .unwrap();
        clock.advance(SignedDuration::from_mins(5));
        service
            .create(params("https://two.com", Some("two"), 10))
            .await
            .unwrap();
        clock.advance(SignedDuration::from_mins(5));
        service
            .create(params("https://three.com", Some("three"), 10))
            .await
            .unwrap();

        let records = service.list().await.unwrap();
        let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["three", "two", "one"]);

        assert!(service.is_expired(&records[2]));
        assert!(!service.is_expired(&records[0]));
    }

    #[tokio::test]
    async fn list_is_stable_and_read_only() {
        let (service, _clock) = test_service();
        for custom in ["c", "a", "b"] {
            service
                .create(params("https://same-time.com", Some(custom), 10))
                .await
                .unwrap();
        }

        let first = service.list().await.unwrap();
        let second = service.list().await.unwrap();
        assert_eq!(first, second);

        // Same creation instant: ties fall back to code order.
        let codes: Vec<&str> = first.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["a", "b", "c"]);
        assert!(first.iter().all(|r| r.clicks == 0));
    }

    #[tokio::test]
    async fn concurrent_resolutions_count_every_click() {
        let (service, _clock) = test_service();
        let service = Arc::new(service);
        let record = service
            .create(params("https://example.com", Some("hot"), 10))
            .await
            .unwrap();

        let mut handles = vec![];
        for _ in 0..50 {
            let service = Arc::clone(&service);
            let code = record.code.clone();
            handles.push(tokio::spawn(async move {
                service.resolve(&code).await.unwrap().clicks
            }));
        }

        let mut seen = vec![];
        for handle in handles {
            seen.push(handle.await.unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (1..=50).collect::<Vec<u64>>());

        let stored = service.store().get(&record.code).await.unwrap().unwrap();
        assert_eq!(stored.clicks, 50);
    }

    #[tokio::test]
    async fn concurrent_custom_creates_have_one_winner() {
        let (service, _clock) = test_service();
        let service = Arc::new(service);

        let mut handles = vec![];
        for i in 0..20 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .create(params(&format!("https://site{i}.com"), Some("race"), 10))
                    .await
            }));
        }

        let mut won = 0;
        let mut taken = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => won += 1,
                Err(CreateError::CodeTaken(_)) => taken += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(won, 1);
        assert_eq!(taken, 19);
    }

    #[tokio::test]
    async fn storage_failures_surface_as_storage_errors() {
        use async_trait::async_trait;
        use stubby_core::store::Result as StoreResult;

        struct BrokenStore;

        #[async_trait]
        impl ReadStore for BrokenStore {
            async fn get(&self, _code: &ShortCode) -> StoreResult<Option<LinkRecord>> {
                Err(StorageError::Unavailable("down".to_string()))
            }

            async fn list_all(&self) -> StoreResult<Vec<LinkRecord>> {
                Err(StorageError::Unavailable("down".to_string()))
            }
        }

        #[async_trait]
        impl LinkStore for BrokenStore {
            async fn put(&self, _record: LinkRecord) -> StoreResult<()> {
                Err(StorageError::Unavailable("down".to_string()))
            }

            async fn delete(&self, _code: &ShortCode) -> StoreResult<bool> {
                Err(StorageError::Unavailable("down".to_string()))
            }
        }

        let service = RegistryService::new(BrokenStore, RandomGenerator::new());

        let err = service
            .create(params("https://x.com", None, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, CreateError::Storage(_)));

        let err = service.resolve(&code("abc")).await.unwrap_err();
        assert!(matches!(err, LookupError::Storage(_)));

        assert!(service.list().await.is_err());
    }
}
