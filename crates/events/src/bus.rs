//! Plugin hook dispatch abstraction (mechanics only).
//!
//! The topbar engine raises a handful of named hooks while it assembles view
//! data and collects whatever fields listeners contribute. The bus makes no
//! assumptions about how listeners are discovered or ordered beyond what each
//! implementation documents.

use std::sync::Arc;

use surveybar_core::{DataBag, TopbarResult};

use crate::HookEvent;

/// Synchronous plugin hook bus.
///
/// `dispatch` blocks until every listener has run and returns the merged
/// contribution fields. A field no listener touched is simply absent; callers
/// decide the default. A failing listener aborts the dispatch with
/// `TopbarError::Hook`.
///
/// The trait requires `Send + Sync` so one bus can serve concurrent renders.
pub trait PluginHookBus: Send + Sync {
    fn dispatch(&self, event: &HookEvent) -> TopbarResult<DataBag>;
}

impl<B> PluginHookBus for Arc<B>
where
    B: PluginHookBus + ?Sized,
{
    fn dispatch(&self, event: &HookEvent) -> TopbarResult<DataBag> {
        (**self).dispatch(event)
    }
}

/// Bus with no listeners: every dispatch contributes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHookBus;

impl PluginHookBus for NoopHookBus {
    fn dispatch(&self, _event: &HookEvent) -> TopbarResult<DataBag> {
        Ok(DataBag::new())
    }
}
