//! Per-request dependency resolution with URL-scoped overrides.
//!
//! Hosts register a [`Provider`] per type name on a [`ContainerBuilder`], build
//! a [`Container`] around an `Arc<dyn OverridesRegistry>`, then open one
//! [`ResolutionSession`] per request URL. The session's [`ResolutionGuard`]
//! swaps requested types for their URL-specific replacements, at most once per
//! type, so a replacement may depend on the type it replaces.
//!
//! `I` is the host's value type, typically `Arc<dyn SomeTrait>`.
//!
//! [`OverridesRegistry`]: subst_overrides::OverridesRegistry

mod container;
mod error;
mod guard;
mod provider;
mod session;

pub use container::{Container, ContainerBuilder};
pub use error::{BuildError, ResolveError};
pub use guard::{ResolutionGuard, Selection};
pub use provider::{Dependencies, Provider};
pub use session::ResolutionSession;
