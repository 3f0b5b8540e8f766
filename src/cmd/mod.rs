/// Snapshot statistics command.
pub mod info;
/// Single-root recursive print command.
pub mod print;
/// Type table dump command.
pub mod types;
/// Root summary listing command.
pub mod values;
