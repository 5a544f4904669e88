//! Plugin hooks raised during topbar assembly.

pub mod bus;
pub mod hook;
pub mod in_memory_bus;

pub use bus::{NoopHookBus, PluginHookBus};
pub use hook::{BEFORE_SURVEY_BAR_RENDER, BEFORE_TOOLS_MENU_RENDER, HookEvent};
pub use in_memory_bus::{HookListener, InMemoryHookBus};
