//! Data models
//!
//! This module contains all data structures used throughout the Tandem
//! backend. Models represent database entities (bilingual content records,
//! users, subscribers) plus shared pagination/language query types.

mod article;
mod asset;
mod category;
mod common;
mod ebook;
mod fact;
mod message;
mod newsletter;
mod partner;
mod project;
mod staff;
mod subscriber;
mod user;

pub use article::{Article, ArticleFilter, CreateArticleInput, UpdateArticleInput};
pub use asset::Asset;
pub use category::{Category, CreateCategoryInput, UpdateCategoryInput};
pub use common::{Lang, ListParams, PagedResult};
pub use ebook::Ebook;
pub use fact::Fact;
pub use message::{DirectorMessage, DirectorMessageInput, MinisterMessage, MinisterMessageInput};
pub use newsletter::Newsletter;
pub use partner::Partner;
pub use project::Project;
pub use staff::Staff;
pub use subscriber::{Subscriber, SubscriberStatus};
pub use user::{User, UserRole, UserStatus};
