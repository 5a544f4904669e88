//! Request-side collaborators: referrer lookup, URL generation, and the
//! policy deciding whether a referrer is a safe return target.

use std::sync::Arc;

use url::{Origin, ParseError, Url};

use surveybar_core::TopbarResult;

use crate::settings::TopbarSettings;

/// Read access to the request currently being rendered.
pub trait RequestContext: Send + Sync {
    /// The `Referer` header, if the client sent one.
    fn referrer(&self) -> TopbarResult<Option<String>>;
}

impl<R> RequestContext for Arc<R>
where
    R: RequestContext + ?Sized,
{
    fn referrer(&self) -> TopbarResult<Option<String>> {
        (**self).referrer()
    }
}

/// Fixed request snapshot for tests/dev.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRequest {
    referrer: Option<String>,
}

impl StaticRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_referrer(referrer: impl Into<String>) -> Self {
        Self {
            referrer: Some(referrer.into()),
        }
    }
}

impl RequestContext for StaticRequest {
    fn referrer(&self) -> TopbarResult<Option<String>> {
        Ok(self.referrer.clone().filter(|r| !r.trim().is_empty()))
    }
}

/// Builds application URLs from route paths.
pub trait UrlGenerator: Send + Sync {
    fn create_url(&self, route: &str) -> String;
}

impl<U> UrlGenerator for Arc<U>
where
    U: UrlGenerator + ?Sized,
{
    fn create_url(&self, route: &str) -> String {
        (**self).create_url(route)
    }
}

/// Joins routes onto a fixed base (`https://host/index.php`, `/app`, or empty).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseUrlGenerator {
    base_url: String,
}

impl BaseUrlGenerator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl UrlGenerator for BaseUrlGenerator {
    fn create_url(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }
}

/// Stand-in site for resolving relative referrers when no absolute base URL
/// is configured. Only ever compared against itself.
const RELATIVE_BASE: &str = "http://relative.invalid/";

/// Decides whether a referrer may be used as a navigation target.
///
/// Referrers are parsed the way a browser would (tabs and newlines dropped,
/// `\` read as `/`, default ports elided). Accepted:
/// - relative references that resolve onto the site they are relative to
///   (`/admin/...`; not `//host` in any spelling)
/// - absolute http(s) URLs without credentials whose origin is on the
///   allow-list
#[derive(Debug, Clone)]
pub struct ReferrerPolicy {
    base: Option<Url>,
    allowed_origins: Vec<Origin>,
}

impl Default for ReferrerPolicy {
    fn default() -> Self {
        Self::relative_only()
    }
}

impl ReferrerPolicy {
    /// Only relative references are accepted.
    pub fn relative_only() -> Self {
        Self {
            base: None,
            allowed_origins: Vec::new(),
        }
    }

    /// Trust `origin` (any http(s) URL on it). Other input is ignored.
    pub fn allow_origin(mut self, origin: &str) -> Self {
        if let Some(url) = web_url(origin) {
            let origin = url.origin();
            if !self.allowed_origins.contains(&origin) {
                self.allowed_origins.push(origin);
            }
        }
        self
    }

    /// The base URL's own origin plus every configured extra origin.
    ///
    /// A path-only base (`/app`) leaves relative references as the only
    /// same-site form.
    pub fn from_settings(settings: &TopbarSettings) -> Self {
        let mut policy = settings
            .allowed_referrer_origins
            .iter()
            .map(String::as_str)
            .fold(Self::relative_only(), Self::allow_origin);

        if let Some(base) = web_url(&settings.base_url) {
            policy = policy.allow_origin(base.as_str());
            policy.base = Some(base);
        }
        policy
    }

    pub fn allows(&self, referrer: &str) -> bool {
        let referrer = referrer.trim();
        if referrer.is_empty() {
            return false;
        }
        match Url::parse(referrer) {
            Ok(url) => is_web(&url) && self.allowed_origins.contains(&url.origin()),
            Err(ParseError::RelativeUrlWithoutBase) => self.stays_on_site(referrer),
            Err(_) => false,
        }
    }

    fn stays_on_site(&self, referrer: &str) -> bool {
        let Some(base) = self.base.clone().or_else(|| Url::parse(RELATIVE_BASE).ok()) else {
            return false;
        };
        base.join(referrer)
            .is_ok_and(|url| is_web(&url) && url.origin() == base.origin())
    }
}

/// Parse `raw` as an absolute http(s) URL without credentials.
fn web_url(raw: &str) -> Option<Url> {
    Url::parse(raw.trim()).ok().filter(is_web)
}

fn is_web(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.username().is_empty() && url.password().is_none()
}
