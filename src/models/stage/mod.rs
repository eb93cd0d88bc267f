mod transitions;
mod types;


pub use types::{ParseStageRoleError, StageRole};
