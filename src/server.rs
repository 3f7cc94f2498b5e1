//! HTTP front end: routes requests to the [Renderer] and turns results and
//! errors into responses.

use crate::request::{DEFAULT_HEIGHT, DEFAULT_TEXT, DEFAULT_WIDTH, QUERY_PARAMETERS};
use crate::{encode_png, PlaceholderError, RenderRequest, Renderer, PNG_CONTENT_TYPE};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tiny_http::{Header, Method, Response};

pub const PLACEHOLDER_PATH: &str = "/placeholder";

/// A response, independent of the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub allow: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Reply {
    fn ok(content_type: &'static str, body: Vec<u8>) -> Reply {
        Reply {
            status: 200,
            content_type,
            allow: None,
            body,
        }
    }

    fn text(status: u16, message: impl Into<String>) -> Reply {
        Reply {
            status,
            content_type: "text/plain; charset=utf-8",
            allow: None,
            body: message.into().into_bytes(),
        }
    }

    fn from_error(err: &PlaceholderError) -> Reply {
        if err.is_client_error() {
            warn!("rejected request: {err}");
        } else {
            error!("failed to render placeholder: {err}");
        }
        Reply::text(err.status_code(), err.to_string())
    }

    fn into_response(self) -> Response<std::io::Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body).with_status_code(self.status);
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], self.content_type.as_bytes()) {
            response = response.with_header(header);
        }
        if let Some(allow) = self.allow {
            if let Ok(header) = Header::from_bytes(&b"Allow"[..], allow.as_bytes()) {
                response = response.with_header(header);
            }
        }
        response
    }
}

/// Render the placeholder described by a query string and encode it as PNG
pub fn render_png(renderer: &Renderer, query: &str) -> Result<Vec<u8>, PlaceholderError> {
    let request = RenderRequest::from_query(query)?;
    let canvas = renderer.render_placeholder(&request)?;
    encode_png(&canvas)
}

/// Dispatch a request by method and URL (path plus optional query)
pub fn route(renderer: &Renderer, method: &Method, url: &str) -> Reply {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    match (method, path) {
        (Method::Get, PLACEHOLDER_PATH) => match render_png(renderer, query) {
            Ok(png) => Reply::ok(PNG_CONTENT_TYPE, png),
            Err(err) => Reply::from_error(&err),
        },
        (Method::Get, "/") => api_description(renderer),
        (_, PLACEHOLDER_PATH) | (_, "/") => Reply {
            allow: Some("GET"),
            ..Reply::text(405, "method not allowed")
        },
        _ => Reply::text(404, "not found"),
    }
}

#[derive(Serialize)]
struct ApiDescription {
    title: &'static str,
    version: &'static str,
    description: &'static str,
    endpoints: Vec<Endpoint>,
}

#[derive(Serialize)]
struct Endpoint {
    method: &'static str,
    path: &'static str,
    produces: &'static str,
    max_dimension: u32,
    parameters: Vec<Parameter>,
}

#[derive(Serialize)]
struct Parameter {
    name: &'static str,
    aliases: &'static [&'static str],
    #[serde(rename = "type")]
    kind: &'static str,
    default: String,
    description: &'static str,
}

fn api_description(renderer: &Renderer) -> Reply {
    let details: [(&str, String, &str); 6] = [
        ("integer", DEFAULT_WIDTH.to_string(), "Width of the image"),
        ("integer", DEFAULT_HEIGHT.to_string(), "Height of the image"),
        ("string", DEFAULT_TEXT.to_string(), "Text to display"),
        (
            "number",
            "0".to_string(),
            "Font size of the text; 0 fits the text to the image",
        ),
        (
            "colour",
            "#FFFFFF".to_string(),
            "Background colour as #RRGGBB, #RRGGBBAA or rgb(r,g,b)",
        ),
        (
            "colour",
            "#000000".to_string(),
            "Text colour as #RRGGBB, #RRGGBBAA or rgb(r,g,b)",
        ),
    ];

    let parameters = QUERY_PARAMETERS
        .iter()
        .zip(details)
        .map(|(&names, (kind, default, description))| Parameter {
            name: names[0],
            aliases: &names[1..],
            kind,
            default,
            description,
        })
        .collect();

    let description = ApiDescription {
        title: "Placeholder API",
        version: env!("CARGO_PKG_VERSION"),
        description: "Generates placeholder images with specified dimensions, text, and colours.",
        endpoints: vec![Endpoint {
            method: "GET",
            path: PLACEHOLDER_PATH,
            produces: PNG_CONTENT_TYPE,
            max_dimension: renderer.canvases().max_dimension(),
            parameters,
        }],
    };

    match serde_json::to_vec_pretty(&description) {
        Ok(body) => Reply::ok("application/json", body),
        Err(err) => Reply::text(500, format!("failed to describe the API: {err}")),
    }
}

fn handle(renderer: &Renderer, request: tiny_http::Request) {
    let started = Instant::now();
    let reply = route(renderer, request.method(), request.url());
    debug!(
        "{} {} -> {} ({} bytes) in {:?}",
        request.method(),
        request.url(),
        reply.status,
        reply.body.len(),
        started.elapsed()
    );

    if let Err(err) = request.respond(reply.into_response()) {
        warn!("failed to send response: {err}");
    }
}

/// A bound HTTP listener plus the renderer its workers share
pub struct PlaceholderServer {
    http: Arc<tiny_http::Server>,
    renderer: Arc<Renderer>,
}

impl PlaceholderServer {
    pub fn bind(addr: &str, renderer: Arc<Renderer>) -> Result<PlaceholderServer, PlaceholderError> {
        let http = tiny_http::Server::http(addr).map_err(|err| PlaceholderError::Bind {
            addr: addr.to_string(),
            reason: err.to_string(),
        })?;

        Ok(PlaceholderServer {
            http: Arc::new(http),
            renderer,
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// Serve requests on `workers` threads until the listener fails
    pub fn run(self, workers: usize) -> Result<(), PlaceholderError> {
        let handles = (0..workers.max(1))
            .map(|index| {
                let http = self.http.clone();
                let renderer = self.renderer.clone();
                thread::Builder::new()
                    .name(format!("worker-{index}"))
                    .spawn(move || loop {
                        match http.recv() {
                            Ok(request) => handle(&renderer, request),
                            Err(err) => {
                                error!("failed to receive request: {err}");
                                break;
                            }
                        }
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for worker in handles {
            if worker.join().is_err() {
                error!("a worker thread panicked");
            }
        }

        Ok(())
    }
}

/// Destinations whose routes reveal the outward-facing address: the public
/// internet first, then the private LAN ranges for hosts without a default route
const ROUTE_TARGETS: [Ipv4Addr; 4] = [
    Ipv4Addr::new(8, 8, 8, 8),
    Ipv4Addr::new(10, 255, 255, 255),
    Ipv4Addr::new(172, 31, 255, 255),
    Ipv4Addr::new(192, 168, 255, 255),
];

/// The address other machines on the network most likely reach this host on.
///
/// Interfaces are not enumerated; instead the kernel is asked which source
/// address it would use for each of [ROUTE_TARGETS]. Hosts with no route to
/// any of them get `None`.
pub fn local_ipv4() -> Option<Ipv4Addr> {
    ROUTE_TARGETS.into_iter().find_map(route_source)
}

/// Source address of the route to `target`, unless it is loopback or unspecified.
/// Connecting a UDP socket only selects a route; nothing is sent.
fn route_source(target: Ipv4Addr) -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((target, 80)).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}

/// Log where the server can be reached
pub fn announce(bound: Option<SocketAddr>, port: u16) {
    let host = match (bound, local_ipv4()) {
        (Some(addr), _) if !addr.ip().is_unspecified() => addr.ip().to_string(),
        (_, Some(ip)) => ip.to_string(),
        (Some(addr), None) => addr.ip().to_string(),
        (None, None) => Ipv4Addr::LOCALHOST.to_string(),
    };
    let port = bound.map(|addr| addr.port()).unwrap_or(port);
    info!("Server started at http://{host}:{port}{PLACEHOLDER_PATH}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::dejavu;
    use crate::RendererConfig;

    fn renderer() -> Renderer {
        Renderer::new(dejavu(), RendererConfig::default())
    }

    #[test]
    fn serves_png() {
        let reply = route(&renderer(), &Method::Get, "/placeholder?w=120&h=60");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "image/png");
        let image = image::load_from_memory(&reply.body).unwrap();
        assert_eq!((image.width(), image.height()), (120, 60));
    }

    #[test]
    fn maps_validation_errors_to_400() {
        let renderer = renderer();
        for url in [
            "/placeholder?width=2000",
            "/placeholder?bg_color=notacolor",
            "/placeholder?width=abc",
            "/placeholder?height=0",
        ] {
            let reply = route(&renderer, &Method::Get, url);
            assert_eq!(reply.status, 400, "{url}");
            assert!(reply.content_type.starts_with("text/plain"));
        }
    }

    #[test]
    fn maps_rendering_errors_to_500() {
        let reply = route(&renderer(), &Method::Get, "/placeholder?font_size=4000");
        assert_eq!(reply.status, 500);
    }

    #[test]
    fn unknown_paths_and_methods() {
        let renderer = renderer();
        assert_eq!(route(&renderer, &Method::Get, "/nope").status, 404);
        let reply = route(&renderer, &Method::Post, "/placeholder");
        assert_eq!(reply.status, 405);
        assert_eq!(reply.allow, Some("GET"));
    }

    #[test]
    fn root_describes_the_api() {
        let reply = route(&renderer(), &Method::Get, "/");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "application/json");

        let doc: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        let endpoint = &doc["endpoints"][0];
        assert_eq!(endpoint["path"], "/placeholder");
        assert_eq!(endpoint["max_dimension"], 1920);
        let names: Vec<&str> = endpoint["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            ["width", "height", "text", "font_size", "bg_color", "font_color"]
        );
        assert_eq!(endpoint["parameters"][0]["aliases"][0], "w");
    }

    #[test]
    fn loopback_routes_are_not_announced() {
        assert_eq!(route_source(Ipv4Addr::LOCALHOST), None);
        if let Some(ip) = local_ipv4() {
            assert!(!ip.is_loopback() && !ip.is_unspecified());
        }
    }
}
