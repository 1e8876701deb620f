//! WordPress REST API publishing for translated recipes.
//!
//! [`WordPressClient`] authenticates with an application password and
//! covers posts, media uploads, categories and tags. Public methods report
//! outcomes through result structs rather than `Err`, so a batch of
//! publishes can continue past individual failures.

pub mod client;
pub mod error;
pub mod types;

pub use client::WordPressClient;
pub use error::PublisherError;
pub use types::{
    ConnectionStatus, MediaResult, NewPost, PostStatus, PublishResult, SeoFields, Term,
    TermResult, WpPost,
};
