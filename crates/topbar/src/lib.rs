//! `surveybar-topbar`: configuration-to-viewdata resolution for the survey
//! administration topbar.
//!
//! A [`TopbarConfig`] is built per render from a declarative configuration.
//! It names the main/left/right views and, through a [`ResolverTable`],
//! gathers permission flags and survey facts for the views that need them.
//! The engine is read-only; all collaborators are injected.

pub mod clock;
pub mod config;
pub mod facts;
pub mod locale;
pub mod request;
pub mod resolver;
pub mod settings;
pub mod view;

#[cfg(test)]
mod testing;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ResolvedTopbar, TopbarConfig};
pub use facts::{InMemorySurveyFacts, SurveyFacts, SurveyFactsProvider, SurveyRecord};
pub use locale::{CatalogTranslator, IdentityTranslator, Translator};
pub use request::{BaseUrlGenerator, ReferrerPolicy, RequestContext, StaticRequest, UrlGenerator};
pub use resolver::{Collaborators, ResolverTable, ViewDataResolver};
pub use settings::TopbarSettings;
pub use view::ViewName;
