//! Request and response types for the resource registry API.
//!
//! This crate encodes the HTTP contract of the `resource` entity as Rust
//! types: the media types exchanged on the wire, the JSON:API error
//! document, and the static route table that binds each action to its
//! method, path and declared responses.
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | POST | `/resource` | [`RegisterResourceMedia`] → [`RegisterResourceResponseMedia`] |
//! | GET | `/resource/{resourceId}` | → [`ResourceMedia`] |
//! | DELETE | `/resource/{resourceId}` | → `204` |

pub mod action;
pub mod error;
pub mod media;

pub use action::{
    Action, Method, Param, Response, ACTIONS, BASE_PATH, DEFAULT_MEDIA, RESOURCE_ID_PARAM,
};
pub use error::{JsonApiError, JsonApiErrors};
pub use media::{
    MediaType, RegisterResourceMedia, RegisterResourceResponseMedia, ResourceMedia,
    ValidationError,
};
