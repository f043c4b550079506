//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Tree mutations run inside
//! a single transaction so a failed write leaves prior state intact.

pub mod activity_repo;
pub mod file_repo;
pub mod project_file_repo;
pub mod project_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use file_repo::FileRepo;
pub use project_file_repo::ProjectFileRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
