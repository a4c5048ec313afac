//! `resourcectl` — command-line client for the resource registry.
//!
//! Subcommands map one-to-one onto the registry's actions:
//!
//! - **`register`** — `POST /resource`, prints the new identifier.
//! - **`read`** — `GET /resource/{resourceId}`, prints the resource as JSON.
//! - **`delete`** — `DELETE /resource/{resourceId}`.
//! - **`routes`** — print the route table without contacting a server.
//!
//! Exit codes: 0 on success, 1 when the registry answers with an error
//! status, 2 on local failures (bad arguments, connection errors).

use std::process;

use clap::{Parser, Subcommand};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use resource_registry_api::{
    action, JsonApiErrors, MediaType, RegisterResourceMedia, RegisterResourceResponseMedia,
    ResourceMedia, ACTIONS,
};

/// resourcectl — resource registry CLI
#[derive(Parser)]
#[command(name = "resourcectl", version, about, long_about = None)]
struct Cli {
    /// Base URL of the registry.
    #[arg(long, env = "RESOURCECTL_URL", default_value = "http://127.0.0.1:8089")]
    url: String,

    /// Bearer token sent in the Authorization header.
    #[arg(long, env = "RESOURCECTL_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new resource and print its identifier.
    ///
    /// Examples:
    ///   resourcectl register -t area
    ///   resourcectl register -t area --parent 0192f5c4-... --id my-area
    Register {
        /// The type of resource.
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        resource_type: String,

        /// The parent resource (of the same type) to which this resource belongs.
        #[arg(long, value_name = "ID")]
        parent: Option<String>,

        /// The identifier for this resource. Generated by the server if omitted.
        #[arg(long, value_name = "ID")]
        id: Option<String>,
    },

    /// Read a resource and print it as JSON.
    Read {
        /// The identifier of the resource to read.
        resource_id: String,
    },

    /// Delete a resource.
    Delete {
        /// Identifier of the resource to delete.
        resource_id: String,
    },

    /// Print the route table.
    Routes,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Routes => print_routes(),

        Command::Register {
            resource_type,
            parent,
            id,
        } => {
            let remote = Remote::new(&cli.url, cli.token);
            let payload = RegisterResourceMedia {
                resource_type: Some(resource_type),
                parent_resource_id: parent,
                resource_id: id,
            };
            let body = serde_json::to_vec(&payload)
                .unwrap_or_else(|e| fatal(&format!("failed to encode payload: {e}")));
            let req = remote
                .request(Method::POST, action::REGISTER.path)
                .header(CONTENT_TYPE, RegisterResourceMedia::IDENTIFIER)
                .header(ACCEPT, RegisterResourceResponseMedia::IDENTIFIER)
                .body(body);
            let created: RegisterResourceResponseMedia = expect_success(send(req))
                .json()
                .unwrap_or_else(|e| fatal(&format!("invalid response body: {e}")));
            println!("{}", created.resource_id.unwrap_or_default());
        }

        Command::Read { resource_id } => {
            let remote = Remote::new(&cli.url, cli.token);
            let req = remote
                .request(Method::GET, &action::READ.url_path(&resource_id))
                .header(ACCEPT, ResourceMedia::IDENTIFIER);
            let resource: ResourceMedia = expect_success(send(req))
                .json()
                .unwrap_or_else(|e| fatal(&format!("invalid response body: {e}")));
            let pretty = serde_json::to_string_pretty(&resource)
                .unwrap_or_else(|e| fatal(&format!("failed to render resource: {e}")));
            println!("{pretty}");
        }

        Command::Delete { resource_id } => {
            let remote = Remote::new(&cli.url, cli.token);
            let req = remote.request(Method::DELETE, &action::DELETE.url_path(&resource_id));
            expect_success(send(req));
            println!("deleted {resource_id}");
        }
    }
}

/// A registry endpoint plus the credentials sent with every request.
struct Remote {
    client: Client,
    base: String,
    token: Option<String>,
}

impl Remote {
    fn new(url: &str, token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| fatal(&format!("failed to build HTTP client: {e}")));
        Self {
            client,
            base: url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, format!("{}{path}", self.base));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

/// Print every action with its declared responses.
fn print_routes() {
    for action in ACTIONS {
        println!("{action}");
        println!("    {}", action.description);
        for param in action.params {
            println!("    param {}: {}", param.name, param.description);
        }
        if let Some(payload) = action.payload {
            println!("    payload {payload}");
        }
        for r in action.responses {
            match r.media {
                Some(media) => println!("    {} {media}", r.status),
                None => println!("    {}", r.status),
            }
        }
    }
}

fn send(req: RequestBuilder) -> Response {
    req.send()
        .unwrap_or_else(|e| fatal(&format!("request failed: {e}")))
}

/// Return the response if its status is a success; otherwise print the
/// JSON:API error detail and exit 1.
fn expect_success(resp: Response) -> Response {
    let status = resp.status();
    if status.is_success() {
        return resp;
    }
    let detail = resp
        .json::<JsonApiErrors>()
        .ok()
        .and_then(|doc| doc.first_detail().map(str::to_string))
        .unwrap_or_default();
    if detail.is_empty() {
        eprintln!("resourcectl: {status}");
    } else {
        eprintln!("resourcectl: {status}: {detail}");
    }
    process::exit(1);
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("resourcectl: {msg}");
    process::exit(2);
}
