pub mod category;
pub mod record;
pub mod stage;

pub use category::Category;
pub use record::{GitLink, NoteLink, ProjectRecord, RECORD_FILE};
pub use stage::StageRole;
