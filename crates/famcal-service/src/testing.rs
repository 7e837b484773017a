//! Fakes shared by the service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use famcal_providers::{
    ApiKey, AuthHeaders, BoxFuture, HolidayRequest, HolidaySource, ProviderError,
    ProviderErrorCode, ProviderResult, RawHoliday, TokenProvider,
};

/// What a [`FakeSource`] answers with.
pub enum Answer {
    Holidays(Vec<RawHoliday>),
    Fail(ProviderErrorCode),
}

/// A holiday source that counts calls and records requests.
pub struct FakeSource {
    answer: Answer,
    calls: AtomicUsize,
    requests: Mutex<Vec<HolidayRequest>>,
}

impl FakeSource {
    pub fn new(answer: Answer) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn labor_day() -> Self {
        Self::new(Answer::Holidays(vec![
            RawHoliday::new("Labor Day", "2025-05-01").with_country("ES"),
        ]))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<HolidayRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl HolidaySource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    fn fetch_holidays(
        &self,
        request: HolidayRequest,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawHoliday>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        let result = match &self.answer {
            Answer::Holidays(raw) => Ok(raw.clone()),
            Answer::Fail(code) => Err(ProviderError::new(*code, "fake failure")),
        };
        Box::pin(async move { result })
    }
}

/// A token provider whose validity and refresh outcome are scripted.
pub struct FakeTokens {
    key: Mutex<Option<String>>,
    refresh_to: Option<String>,
    refreshes: AtomicUsize,
}

impl FakeTokens {
    pub fn valid() -> Self {
        Self {
            key: Mutex::new(Some("test-key".to_string())),
            refresh_to: None,
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn expired(refresh_to: Option<&str>) -> Self {
        Self {
            key: Mutex::new(None),
            refresh_to: refresh_to.map(str::to_string),
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl TokenProvider for FakeTokens {
    fn is_valid(&self) -> bool {
        self.key.lock().unwrap().is_some()
    }

    fn refresh(&self) -> BoxFuture<'_, ProviderResult<ApiKey>> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        let result = self
            .refresh_to
            .clone()
            .map(ApiKey::new)
            .ok_or_else(|| ProviderError::authentication("refresh refused"));
        Box::pin(async move { result })
    }

    fn store(&self, key: ApiKey) {
        *self.key.lock().unwrap() = Some(key.expose().to_string());
    }

    fn auth_headers(&self) -> AuthHeaders {
        let key = self.key.lock().unwrap().clone().unwrap_or_default();
        AuthHeaders::default().with("x-rapidapi-key", key)
    }
}
