//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity.

pub mod article;
pub mod asset;
pub mod category;
pub mod ebook;
pub mod fact;
pub mod message;
pub mod newsletter;
pub mod partner;
pub mod project;
pub mod staff;
pub mod subscriber;
pub mod user;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use asset::{AssetRepository, SqlxAssetRepository};
pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use ebook::{EbookRepository, SqlxEbookRepository};
pub use fact::{FactRepository, SqlxFactRepository};
pub use message::{
    DirectorMessageRepository, MinisterMessageRepository, SqlxDirectorMessageRepository,
    SqlxMinisterMessageRepository,
};
pub use newsletter::{NewsletterRepository, SqlxNewsletterRepository};
pub use partner::{PartnerRepository, SqlxPartnerRepository};
pub use project::{ProjectRepository, SqlxProjectRepository};
pub use staff::{SqlxStaffRepository, StaffRepository};
pub use subscriber::{SqlxSubscriberRepository, SubscriberRepository};
pub use user::{SqlxUserRepository, UserRepository};
