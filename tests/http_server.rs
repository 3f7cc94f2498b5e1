use placeholder_gen::server::PlaceholderServer;
use placeholder_gen::{Font, Renderer, RendererConfig};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;

fn start_server() -> SocketAddr {
    let bytes = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/DejaVuSans.ttf"));
    let font = Font::load(bytes.to_vec()).expect("can load font");
    let renderer = Arc::new(Renderer::new(Arc::new(font), RendererConfig::default()));

    let server = PlaceholderServer::bind("127.0.0.1:0", renderer).expect("can bind");
    let addr = server.local_addr().expect("bound to an ip address");
    std::thread::spawn(move || server.run(2));
    addr
}

fn get(addr: SocketAddr, path: &str) -> (String, Vec<u8>) {
    let mut stream = TcpStream::connect(addr).unwrap();
    write!(
        stream,
        "GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
    )
    .unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    let split = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has headers");
    let head = String::from_utf8_lossy(&response[..split]).to_string();
    (head, response[split + 4..].to_vec())
}

#[test_log::test]
fn serves_placeholders_over_http() {
    let addr = start_server();

    let (head, body) = get(addr, "/placeholder?w=64&h=32&text=Hi");
    assert!(head.starts_with("HTTP/1.1 200"), "{head}");
    assert!(head.to_ascii_lowercase().contains("content-type: image/png"));
    let image = image::load_from_memory(&body).unwrap();
    assert_eq!((image.width(), image.height()), (64, 32));

    let (head, _) = get(addr, "/placeholder?width=4000");
    assert!(head.starts_with("HTTP/1.1 400"), "{head}");

    let (head, body) = get(addr, "/");
    assert!(head.starts_with("HTTP/1.1 200"), "{head}");
    let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(doc["endpoints"][0]["path"], "/placeholder");

    let (head, _) = get(addr, "/missing");
    assert!(head.starts_with("HTTP/1.1 404"), "{head}");
}
