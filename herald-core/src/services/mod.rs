pub mod dispatch;
pub mod recipients;
pub mod renderer;

pub use dispatch::{DispatchService, NotifyOptions, TemplateOverrides};
pub use recipients::RecipientResolver;
pub use renderer::MessageRenderer;
