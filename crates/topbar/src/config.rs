//! Topbar configuration and view-data resolution.

use serde::Serialize;
use tracing::{debug, debug_span};

use surveybar_core::data::{flag, is_set, object, overlay, string_value};
use surveybar_core::{Configuration, DataBag, SurveyId, TopbarResult};

use crate::resolver::ResolverTable;
use crate::view::ViewName;

/// Topbar element id used when the configuration names none.
pub const DEFAULT_TOPBAR_ID: &str = "surveybarid";

/// Any of these being truthy turns on the default right-side view.
pub const RIGHT_SIDE_BUTTON_FLAGS: [&str; 4] = [
    "showSaveButton",
    "showCloseButton",
    "showImportButton",
    "showExportButton",
];

/// Configuration keys with special meaning.
pub mod keys {
    pub const NAME: &str = "name";
    pub const TOPBAR_ID: &str = "topbarId";
    pub const LEFT_SIDE_VIEW: &str = "leftSideView";
    pub const RIGHT_SIDE_VIEW: &str = "rightSideView";
    pub const SID: &str = "sid";
    /// Sub-configuration inside a page view context.
    pub const TOP_BAR: &str = "topBar";
}

/// Declarative topbar setup for one render.
///
/// Built once per request from a caller-supplied configuration; the view
/// names are derived at construction and the configuration is kept verbatim
/// so it can be merged over resolver output.
#[derive(Debug, Clone, PartialEq)]
pub struct TopbarConfig {
    view_name: String,
    id: String,
    left_side_view: String,
    right_side_view: String,
    data: Configuration,
}

impl Default for TopbarConfig {
    fn default() -> Self {
        Self::new(Configuration::new())
    }
}

impl TopbarConfig {
    /// Recognized keys: `name`, `topbarId`, `leftSideView`, `rightSideView`,
    /// the four `show*Button` flags and `sid`. Everything else passes through.
    pub fn new(config: Configuration) -> Self {
        let view_name =
            string_value(&config, keys::NAME).unwrap_or_else(|| ViewName::SurveyTopbar.as_str().to_string());
        let id = string_value(&config, keys::TOPBAR_ID).unwrap_or_else(|| DEFAULT_TOPBAR_ID.to_string());
        let left_side_view = string_value(&config, keys::LEFT_SIDE_VIEW).unwrap_or_default();

        let right_side_view = if is_set(&config, keys::RIGHT_SIDE_VIEW) {
            string_value(&config, keys::RIGHT_SIDE_VIEW).unwrap_or_default()
        } else if RIGHT_SIDE_BUTTON_FLAGS.iter().any(|f| flag(&config, f)) {
            ViewName::SurveyTopbarRight.as_str().to_string()
        } else {
            String::new()
        };

        Self {
            view_name,
            id,
            left_side_view,
            right_side_view,
            data: config,
        }
    }

    /// Build from a page view context holding a `topBar` sub-configuration.
    ///
    /// The context's top-level `sid` fills in for a missing/empty `topBar.sid`;
    /// an explicit one is kept.
    pub fn from_view_context(ctx: &Configuration) -> Self {
        let mut config = ctx
            .get(keys::TOP_BAR)
            .cloned()
            .map(object)
            .unwrap_or_default();

        if SurveyId::from_value(config.get(keys::SID)).is_none() && is_set(ctx, keys::SID) {
            if let Some(sid) = ctx.get(keys::SID) {
                config.insert(keys::SID.to_string(), sid.clone());
            }
        }

        Self::new(config)
    }

    /// Data for `view`: resolver output overlaid with the configuration.
    ///
    /// An empty or unresolvable view name yields the configuration alone, as
    /// does a resolver returning nothing. Collaborator failures propagate.
    pub fn resolve(&self, table: &ResolverTable, view: &str) -> TopbarResult<DataBag> {
        let sid = self.survey_id();
        let span = debug_span!("topbar.resolve", view, sid = ?sid.map(|s| s.get()));
        let _guard = span.enter();

        if view.is_empty() {
            return Ok(self.data.clone());
        }

        let resolver = match view.parse::<ViewName>() {
            Ok(name) => table.get(name),
            Err(err) => {
                debug!(error = %err, "no resolver; using configuration only");
                None
            }
        };
        let Some(resolver) = resolver else {
            return Ok(self.data.clone());
        };

        let extra = resolver.resolve(sid)?;
        if extra.is_empty() {
            Ok(self.data.clone())
        } else {
            debug!(fields = extra.len(), "resolver data merged");
            Ok(overlay(extra, &self.data))
        }
    }

    pub fn left_side_data(&self, table: &ResolverTable) -> TopbarResult<DataBag> {
        self.resolve(table, &self.left_side_view)
    }

    pub fn right_side_data(&self, table: &ResolverTable) -> TopbarResult<DataBag> {
        self.resolve(table, &self.right_side_view)
    }

    /// Data for the main view.
    pub fn data(&self, table: &ResolverTable) -> TopbarResult<DataBag> {
        self.resolve(table, &self.view_name)
    }

    /// Resolve the main view and every non-empty side view in one pass.
    pub fn resolve_all(&self, table: &ResolverTable) -> TopbarResult<ResolvedTopbar> {
        let side = |view: &str| -> TopbarResult<Option<DataBag>> {
            if view.is_empty() {
                Ok(None)
            } else {
                self.resolve(table, view).map(Some)
            }
        };

        Ok(ResolvedTopbar {
            id: self.id.clone(),
            view_name: self.view_name.clone(),
            data: self.data(table)?,
            left_side_view: self.left_side_view.clone(),
            left_side_data: side(&self.left_side_view)?,
            right_side_view: self.right_side_view.clone(),
            right_side_data: side(&self.right_side_view)?,
        })
    }

    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn left_side_view(&self) -> &str {
        &self.left_side_view
    }

    pub fn right_side_view(&self) -> &str {
        &self.right_side_view
    }

    pub fn configuration(&self) -> &Configuration {
        &self.data
    }

    /// The normalized subject id (`None` for missing/empty/zero).
    pub fn survey_id(&self) -> Option<SurveyId> {
        SurveyId::from_value(self.data.get(keys::SID))
    }
}

/// Everything a template needs to draw one topbar.
///
/// Side data is `None` when the side has no view (nothing to render).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTopbar {
    pub id: String,
    pub view_name: String,
    pub data: DataBag,
    pub left_side_view: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_side_data: Option<DataBag>,
    pub right_side_view: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_side_data: Option<DataBag>,
}
