//! View-data resolvers and the table dispatching view names to them.

use std::collections::BTreeMap;
use std::sync::Arc;

use surveybar_auth::PermissionGateway;
use surveybar_core::{DataBag, SurveyId, TopbarResult};
use surveybar_events::PluginHookBus;

use crate::clock::{Clock, SystemClock};
use crate::facts::SurveyFactsProvider;
use crate::locale::{IdentityTranslator, Translator};
use crate::request::{RequestContext, UrlGenerator};
use crate::settings::TopbarSettings;
use crate::view::ViewName;

pub mod responses;
pub mod survey;
pub mod survey_right;

pub use responses::ResponsesTopbarResolver;
pub use survey::SurveyTopbarResolver;
pub use survey_right::RightSurveyTopbarResolver;

/// Produces the extra data one view needs for a survey.
///
/// Contract shared by every resolver:
/// - `None` subject → empty bag, no collaborator is touched
/// - read-only; collaborator failures propagate unchanged
pub trait ViewDataResolver: Send + Sync {
    fn resolve(&self, sid: Option<SurveyId>) -> TopbarResult<DataBag>;
}

impl<F> ViewDataResolver for F
where
    F: Fn(Option<SurveyId>) -> TopbarResult<DataBag> + Send + Sync,
{
    fn resolve(&self, sid: Option<SurveyId>) -> TopbarResult<DataBag> {
        self(sid)
    }
}

/// Everything the standard resolvers query.
///
/// `request` must reflect the request being rendered; build the table per
/// request (it only clones `Arc`s) or back it with request-scoped state.
#[derive(Clone)]
pub struct Collaborators {
    pub permissions: Arc<dyn PermissionGateway>,
    pub facts: Arc<dyn SurveyFactsProvider>,
    pub hooks: Arc<dyn PluginHookBus>,
    pub request: Arc<dyn RequestContext>,
    pub urls: Arc<dyn UrlGenerator>,
    pub translator: Arc<dyn Translator>,
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    /// Wire the required collaborators; translation and time default to
    /// identity and the system clock.
    pub fn new(
        permissions: Arc<dyn PermissionGateway>,
        facts: Arc<dyn SurveyFactsProvider>,
        hooks: Arc<dyn PluginHookBus>,
        request: Arc<dyn RequestContext>,
        urls: Arc<dyn UrlGenerator>,
    ) -> Self {
        Self {
            permissions,
            facts,
            hooks,
            request,
            urls,
            translator: Arc::new(IdentityTranslator),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl core::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// View name → resolver dispatch table.
#[derive(Default)]
pub struct ResolverTable {
    resolvers: BTreeMap<ViewName, Box<dyn ViewDataResolver>>,
}

impl ResolverTable {
    pub fn builder() -> ResolverTableBuilder {
        ResolverTableBuilder::default()
    }

    /// The three standard resolvers wired to `collaborators`.
    pub fn standard(collaborators: &Collaborators, settings: &TopbarSettings) -> Self {
        Self::builder()
            .register(
                ViewName::SurveyTopbar,
                SurveyTopbarResolver::new(collaborators, settings),
            )
            .register(
                ViewName::ResponsesTopbarLeft,
                ResponsesTopbarResolver::new(collaborators),
            )
            .register(
                ViewName::SurveyTopbarRight,
                RightSurveyTopbarResolver::new(collaborators, settings),
            )
            .build()
    }

    pub fn get(&self, view: ViewName) -> Option<&dyn ViewDataResolver> {
        self.resolvers.get(&view).map(|r| &**r)
    }

    pub fn views(&self) -> impl Iterator<Item = ViewName> + '_ {
        self.resolvers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl core::fmt::Debug for ResolverTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResolverTable")
            .field("views", &self.resolvers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Default)]
pub struct ResolverTableBuilder {
    resolvers: BTreeMap<ViewName, Box<dyn ViewDataResolver>>,
}

impl ResolverTableBuilder {
    /// Registering a view twice keeps the last resolver.
    pub fn register<R>(mut self, view: ViewName, resolver: R) -> Self
    where
        R: ViewDataResolver + 'static,
    {
        self.resolvers.insert(view, Box::new(resolver));
        self
    }

    pub fn build(self) -> ResolverTable {
        ResolverTable {
            resolvers: self.resolvers,
        }
    }
}
