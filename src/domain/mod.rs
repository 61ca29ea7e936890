pub mod company;
pub mod directory;

pub use company::{CompanyRecord, ScoringResult, LINKEDIN_PLACEHOLDER};
pub use directory::{find_by_name, DirectoryEntry};
