//! The route table for the `resource` entity.
//!
//! Every action binds one HTTP method and path to a payload media type and
//! the set of responses a handler may emit. The server registers its routes
//! from the same paths, and the conformance suite checks every observed
//! status against [`Action::declares`].

use std::fmt;

use crate::error::JsonApiErrors;
use crate::media::{MediaType, RegisterResourceMedia, RegisterResourceResponseMedia, ResourceMedia};

/// Base path shared by every action.
pub const BASE_PATH: &str = "/resource";

/// Name of the path parameter that carries the resource identifier.
pub const RESOURCE_ID_PARAM: &str = "resourceId";

/// HTTP method of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A string path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub description: &'static str,
}

/// One declared response: a status code and the media type of its body.
///
/// `media` is `None` for responses without a body (204, 307).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub media: Option<&'static str>,
}

const fn with_body(status: u16, media: &'static str) -> Response {
    Response {
        status,
        media: Some(media),
    }
}

const fn empty(status: u16) -> Response {
    Response {
        status,
        media: None,
    }
}

/// One HTTP route bound to one request/response contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub name: &'static str,
    pub method: Method,
    /// Route template in `{param}` form, including [`BASE_PATH`].
    pub path: &'static str,
    pub description: &'static str,
    pub params: &'static [Param],
    pub payload: Option<&'static str>,
    pub responses: &'static [Response],
}

const ERRORS: &str = JsonApiErrors::IDENTIFIER;

pub const REGISTER: Action = Action {
    name: "register",
    method: Method::Post,
    path: "/resource",
    description: "Register a new resource",
    params: &[],
    payload: Some(RegisterResourceMedia::IDENTIFIER),
    responses: &[
        jsonapi(401),
        with_body(201, RegisterResourceResponseMedia::IDENTIFIER),
        jsonapi(500),
        jsonapi(400),
        jsonapi(404),
    ],
};

pub const READ: Action = Action {
    name: "read",
    method: Method::Get,
    path: "/resource/{resourceId}",
    description: "Read a specific resource",
    params: &[Param {
        name: RESOURCE_ID_PARAM,
        description: "The identifier of the resource to read",
    }],
    payload: None,
    responses: &[
        with_body(200, ResourceMedia::IDENTIFIER),
        jsonapi(401),
        empty(307),
        jsonapi(500),
        jsonapi(400),
        jsonapi(404),
    ],
};

pub const DELETE: Action = Action {
    name: "delete",
    method: Method::Delete,
    path: "/resource/{resourceId}",
    description: "Delete a resource",
    params: &[Param {
        name: RESOURCE_ID_PARAM,
        description: "Identifier of the resource to delete",
    }],
    payload: None,
    responses: &[
        jsonapi(401),
        empty(307),
        jsonapi(500),
        jsonapi(400),
        jsonapi(404),
        empty(204),
    ],
};

/// An error response carrying a JSON:API body.
const fn jsonapi(status: u16) -> Response {
    with_body(status, ERRORS)
}

/// Every action of the `resource` entity, in declaration order.
pub const ACTIONS: &[Action] = &[REGISTER, READ, DELETE];

/// Media type of successful responses that do not name one.
pub const DEFAULT_MEDIA: &str = ResourceMedia::IDENTIFIER;

impl Action {
    /// Look up an action by name.
    pub fn find(name: &str) -> Option<&'static Action> {
        ACTIONS.iter().find(|a| a.name == name)
    }

    /// Whether a handler for this action may emit `status`.
    pub fn declares(&self, status: u16) -> bool {
        self.responses.iter().any(|r| r.status == status)
    }

    /// The declared response for `status`, if any.
    pub fn response(&self, status: u16) -> Option<&Response> {
        self.responses.iter().find(|r| r.status == status)
    }

    /// Render the concrete request path for `resource_id`.
    ///
    /// The identifier is percent-encoded as a single path segment. Actions
    /// without a `{resourceId}` parameter return their path unchanged.
    pub fn url_path(&self, resource_id: &str) -> String {
        let placeholder = format!("{{{RESOURCE_ID_PARAM}}}");
        self.path
            .replace(&placeholder, &urlencoding::encode(resource_id))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<8} {:<7} {}", self.name, self.method, self.path)
    }
}
