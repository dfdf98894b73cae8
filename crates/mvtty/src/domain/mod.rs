//! Pure domain model: platforms, forms, command construction and job
//! messages. Nothing here touches the terminal or spawns processes.

pub mod command;
pub mod form;
pub mod job;
pub mod platform;

pub use command::{
    Action, AndroidAction, CommandError, IosAction, MvtCommand, SECRET_MASK, UtilityAction,
};
pub use form::{Field, FieldId, FieldKind, Focus, Form};
pub use job::{Job, JobKind, JobLine, JobStep, JobSummary, LineKind, StepOutcome};
pub use platform::Platform;
