//! Permission gateway contract (read-only capability checks).

use std::sync::Arc;

use surveybar_core::{SurveyId, TopbarResult};

use crate::Capability;

/// Answers "does the current user hold `capability` on survey `sid`".
///
/// Implementations are backed by whatever policy source the host application
/// uses. Backend failures surface as `TopbarError::PermissionBackend` and
/// abort the render; there is no retry at this layer.
pub trait PermissionGateway: Send + Sync {
    fn has_permission(&self, sid: SurveyId, capability: &Capability) -> TopbarResult<bool>;

    /// `true` as soon as one of `capabilities` is held. Later pairs are not
    /// queried once a grant is found.
    fn has_any(&self, sid: SurveyId, capabilities: &[Capability]) -> TopbarResult<bool> {
        for capability in capabilities {
            if self.has_permission(sid, capability)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<G> PermissionGateway for Arc<G>
where
    G: PermissionGateway + ?Sized,
{
    fn has_permission(&self, sid: SurveyId, capability: &Capability) -> TopbarResult<bool> {
        (**self).has_permission(sid, capability)
    }
}
