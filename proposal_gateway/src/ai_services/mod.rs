// Draft generation services backed by hosted workflow apps

pub mod wordware;

pub use wordware::{
    extract_complete_output, DraftOutcome, ProjectDraftInputs, ProposalDraftInputs, WordwareClient,
};
