//! Data for the right side of the survey bar (`surveyTopbarRight_view`).

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use surveybar_core::data::object;
use surveybar_core::{DataBag, SurveyId, TopbarResult};

use crate::request::{ReferrerPolicy, RequestContext, UrlGenerator};
use crate::settings::TopbarSettings;

use super::{Collaborators, ViewDataResolver};

/// Route of the response browser, the fallback return target.
pub fn browse_responses_route(sid: SurveyId) -> String {
    format!("admin/responses/sa/browse/surveyid/{sid}")
}

/// Computes where the close button navigates to.
pub struct RightSurveyTopbarResolver {
    request: Arc<dyn RequestContext>,
    urls: Arc<dyn UrlGenerator>,
    policy: ReferrerPolicy,
}

impl RightSurveyTopbarResolver {
    pub fn new(collaborators: &Collaborators, settings: &TopbarSettings) -> Self {
        Self::with_policy(collaborators, ReferrerPolicy::from_settings(settings))
    }

    pub fn with_policy(collaborators: &Collaborators, policy: ReferrerPolicy) -> Self {
        Self {
            request: collaborators.request.clone(),
            urls: collaborators.urls.clone(),
            policy,
        }
    }

    /// The request's referrer when the policy trusts it, else `default`.
    fn referrer_or(&self, default: String) -> TopbarResult<String> {
        match self.request.referrer()? {
            Some(referrer) if self.policy.allows(&referrer) => Ok(referrer),
            Some(referrer) => {
                warn!(referrer = %referrer, "untrusted referrer ignored for close URL");
                Ok(default)
            }
            None => Ok(default),
        }
    }
}

impl ViewDataResolver for RightSurveyTopbarResolver {
    fn resolve(&self, sid: Option<SurveyId>) -> TopbarResult<DataBag> {
        let Some(sid) = sid else {
            debug!("no survey id; close URL skipped");
            return Ok(DataBag::new());
        };

        let default = self.urls.create_url(&browse_responses_route(sid));
        let close_url = self.referrer_or(default)?;

        Ok(object(json!({ "closeUrl": close_url })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{BaseUrlGenerator, StaticRequest};
    use crate::testing::{Unreachable, sid};

    fn resolver(request: StaticRequest, settings: &TopbarSettings) -> RightSurveyTopbarResolver {
        let collab = Collaborators::new(
            Arc::new(Unreachable),
            Arc::new(Unreachable),
            Arc::new(Unreachable),
            Arc::new(request),
            Arc::new(BaseUrlGenerator::new(settings.base_url.clone())),
        );
        RightSurveyTopbarResolver::new(&collab, settings)
    }

    fn settings() -> TopbarSettings {
        TopbarSettings::default().with_base_url("https://surveys.example.org/index.php")
    }

    #[test]
    fn falls_back_to_response_browser_without_referrer() {
        let bag = resolver(StaticRequest::new(), &settings())
            .resolve(Some(sid(31)))
            .unwrap();

        assert_eq!(
            bag["closeUrl"],
            json!("https://surveys.example.org/index.php/admin/responses/sa/browse/surveyid/31")
        );
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn trusted_referrer_wins() {
        let referrer = "https://surveys.example.org/index.php/surveyAdministration/view/surveyid/31";
        let bag = resolver(StaticRequest::with_referrer(referrer), &settings())
            .resolve(Some(sid(31)))
            .unwrap();

        assert_eq!(bag["closeUrl"], json!(referrer));
    }

    #[test]
    fn relative_referrer_is_trusted() {
        let bag = resolver(StaticRequest::with_referrer("/admin/index"), &settings())
            .resolve(Some(sid(31)))
            .unwrap();

        assert_eq!(bag["closeUrl"], json!("/admin/index"));
    }

    #[test]
    fn foreign_referrer_is_replaced_by_default() {
        let bag = resolver(StaticRequest::with_referrer("https://phish.example.net/login"), &settings())
            .resolve(Some(sid(32)))
            .unwrap();

        assert_eq!(
            bag["closeUrl"],
            json!("https://surveys.example.org/index.php/admin/responses/sa/browse/surveyid/32")
        );
    }

    #[test]
    fn whitespace_smuggled_host_falls_back_to_default() {
        let bag = resolver(StaticRequest::with_referrer("/\t/phish.example.net/login"), &settings())
            .resolve(Some(sid(33)))
            .unwrap();

        assert_eq!(
            bag["closeUrl"],
            json!("https://surveys.example.org/index.php/admin/responses/sa/browse/surveyid/33")
        );
    }

    #[test]
    fn referrer_with_explicit_default_port_is_kept() {
        let referrer = "https://surveys.example.org:443/index.php/admin/index";
        let bag = resolver(StaticRequest::with_referrer(referrer), &settings())
            .resolve(Some(sid(34)))
            .unwrap();

        assert_eq!(bag["closeUrl"], json!(referrer));
    }
}
