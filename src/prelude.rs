//! Convenience re-exports for embedders. Each module keeps a small,
//! deliberately narrow public surface rather than one all-encompassing
//! facade; this is the one module that gathers the handful of types most
//! callers need into a single `use`.

pub use crate::context::EvaluationContext;
pub use crate::error::Error;
pub use crate::executor::{Executor, ExecutorOptions};
pub use crate::scene::Scene;
