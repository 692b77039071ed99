//! Near catalog project listings stored on the social contract

pub mod project;

pub use project::{
    build_project_args, project_call, CatalogEntry, CatalogRecord, ProjectArgs, ProjectParams,
    SET_METHOD, SOCIAL_CONTRACT,
};
