pub mod projects;
pub mod record_file;

// Re-export the metadata store
pub use record_file::{read_record, record_path, write_record};

// Re-export project lookup helpers
pub use projects::{
    create_starter_file, ensure_base_structure, find_project_by_id, generate_project_id,
    list_projects, resolve_project_path, stage_root,
};
