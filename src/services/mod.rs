//! Services layer - Business logic
//!
//! This module contains all business logic services for the Tandem
//! backend. Services are responsible for:
//! - Implementing business rules
//! - Coordinating between repositories, cache, and outbound mail
//! - Handling validation and error cases

pub mod article;
pub mod category;
pub mod email;
pub mod message;
pub mod password;
pub mod rate_limiter;
pub mod subscriber;
pub mod token;
pub mod user;

pub use article::{generate_slug, ArticleService, ArticleServiceError};
pub use category::{CategoryService, CategoryServiceError};
pub use email::{ContactMessage, Mailer};
pub use message::{MessageService, MessageServiceError};
pub use password::{hash_password, verify_password};
pub use rate_limiter::RateLimiter;
pub use subscriber::{SubscribeOutcome, SubscriberService, SubscriberServiceError};
pub use token::{decode_token, issue_token, Claims};
pub use user::{SigninInput, SignupInput, UserService, UserServiceError};
