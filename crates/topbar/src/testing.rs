//! Test doubles shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, NaiveDate, Utc};

use surveybar_auth::{Capability, PermissionGateway};
use surveybar_core::{DataBag, SurveyId, TopbarResult};
use surveybar_events::{HookEvent, PluginHookBus};

use crate::clock::{Clock, FixedClock};
use crate::facts::{SurveyFacts, SurveyFactsProvider};
use crate::request::{RequestContext, UrlGenerator};
use crate::resolver::Collaborators;

pub fn sid(n: u64) -> SurveyId {
    SurveyId::new(n).unwrap()
}

/// 2024-05-10 12:30:45 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 5, 10)
        .unwrap()
        .and_hms_opt(12, 30, 45)
        .unwrap()
        .and_utc()
}

/// Panics on any call; proves a code path touches no collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unreachable;

impl PermissionGateway for Unreachable {
    fn has_permission(&self, sid: SurveyId, capability: &Capability) -> TopbarResult<bool> {
        panic!("permission gateway called for {sid} {capability}")
    }
}

impl SurveyFactsProvider for Unreachable {
    fn find_by_id(&self, sid: SurveyId) -> TopbarResult<Option<SurveyFacts>> {
        panic!("facts provider called for {sid}")
    }

    fn count_top_level_questions(&self, sid: SurveyId) -> TopbarResult<u64> {
        panic!("facts provider called for {sid}")
    }

    fn count_conditions(&self, sid: SurveyId) -> TopbarResult<u64> {
        panic!("facts provider called for {sid}")
    }
}

impl PluginHookBus for Unreachable {
    fn dispatch(&self, event: &HookEvent) -> TopbarResult<DataBag> {
        panic!("hook bus called for {}", event.name)
    }
}

impl RequestContext for Unreachable {
    fn referrer(&self) -> TopbarResult<Option<String>> {
        panic!("request context called")
    }
}

impl UrlGenerator for Unreachable {
    fn create_url(&self, route: &str) -> String {
        panic!("url generator called for {route}")
    }
}

impl Clock for Unreachable {
    fn now(&self) -> DateTime<Utc> {
        panic!("clock called")
    }
}

pub fn unreachable_collaborators() -> Collaborators {
    Collaborators::new(
        Arc::new(Unreachable),
        Arc::new(Unreachable),
        Arc::new(Unreachable),
        Arc::new(Unreachable),
        Arc::new(Unreachable),
    )
    .with_clock(Arc::new(Unreachable))
}

/// Counts permission queries before delegating.
#[derive(Debug)]
pub struct CountingGateway<G> {
    inner: G,
    calls: AtomicUsize,
}

impl<G> CountingGateway<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<G: PermissionGateway> PermissionGateway for CountingGateway<G> {
    fn has_permission(&self, sid: SurveyId, capability: &Capability) -> TopbarResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.has_permission(sid, capability)
    }
}

pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixed_now()))
}
