pub mod directory;
pub mod hierarchy;
pub mod position;
pub mod report;
pub mod session;

pub use directory::DirectoryStore;
pub use hierarchy::HierarchyStore;
pub use position::PositionStore;
pub use report::ReportStore;
pub use session::SessionStore;
