//! Mock F-Pass backend for testing
//!
//! A small threaded HTTP server that answers the F-Pass REST routes with
//! fixture data, so the client, the session lifecycle and the payment flows
//! can be exercised without a real backend.
//!
//! - Fixture routes answer the common endpoints under `/api`
//! - Tests add or override routes with [`MockBackend::route`]; the most
//!   recently added route for a method and path wins
//! - Every request is recorded (method, path, query, headers, body) for
//!   assertions

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use serde_json::{json, Value as JsonValue};

pub const FIXTURE_TOKEN: &str = "test-token";

/// A canned response for one method and path
#[derive(Debug, Clone)]
pub struct MockRoute {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl MockRoute {
    pub fn json(method: &str, path: &str, status: u16, body: JsonValue) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            status,
            content_type: "application/json; charset=utf-8".to_string(),
            body: body.to_string(),
        }
    }

    pub fn text(method: &str, path: &str, status: u16, body: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            status,
            content_type: "text/plain".to_string(),
            body: body.to_string(),
        }
    }
}

/// A request as the server saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Header names are lowercased
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn json(&self) -> JsonValue {
        serde_json::from_str(&self.body).unwrap_or(JsonValue::Null)
    }
}

#[derive(Default)]
struct Shared {
    routes: Mutex<Vec<MockRoute>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock F-Pass server for testing
pub struct MockBackend {
    port: u16,
    running: Arc<AtomicBool>,
    shared: Arc<Shared>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockBackend {
    /// Start on a random port with the fixture routes installed
    pub fn start() -> std::io::Result<Self> {
        let server = Self::empty()?;
        for route in fixture_routes() {
            server.route(route);
        }
        Ok(server)
    }

    /// Start on a random port with no routes; everything answers 404
    pub fn empty() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let shared = Arc::new(Shared::default());

        // Non-blocking so the accept loop can notice shutdown
        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let shared_clone = shared.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let shared = shared_clone.clone();
                        thread::spawn(move || handle_connection(stream, &shared));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            shared,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL including the `/api` prefix, as the client expects it
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/api", self.port)
    }

    /// Add a route; it takes precedence over earlier ones for the same method and path
    pub fn route(&self, route: MockRoute) {
        if let Ok(mut routes) = self.shared.routes.lock() {
            routes.push(route);
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests().pop()
    }

    /// Requests made to `path`, any method
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, shared: &Shared) {
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));

    let Some(request) = read_request(&mut stream) else {
        send_response(&mut stream, 400, "application/json", r#"{"error":"Invalid request"}"#);
        return;
    };

    let route = shared.routes.lock().ok().and_then(|routes| {
        routes
            .iter()
            .rev()
            .find(|r| r.method == request.method && r.path == request.path)
            .cloned()
    });

    if let Ok(mut requests) = shared.requests.lock() {
        requests.push(request);
    }

    match route {
        Some(route) => send_response(&mut stream, route.status, &route.content_type, &route.body),
        None => send_response(
            &mut stream,
            404,
            "application/json",
            r#"{"error":"Endpoint not found"}"#,
        ),
    }
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut raw = Vec::new();
    let mut buffer = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        raw.extend_from_slice(&buffer[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
    let mut lines = head.lines();
    let mut parts = lines.next()?.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = raw[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buffer[..n]);
    }

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (target, None),
    };

    Some(RecordedRequest {
        method,
        path,
        query,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    })
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}

fn send_response(stream: &mut TcpStream, status: u16, content_type: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text(status),
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

// Fixture data

pub fn fixture_user() -> JsonValue {
    json!({
        "id": 1,
        "first_name": "Alice",
        "last_name": "Cooper",
        "email": "alice@example.com",
        "phone": "+254700000001",
        "country": "Kenya",
        "role": "user",
        "status": "active"
    })
}

pub fn fixture_admin() -> JsonValue {
    json!({
        "id": 99,
        "first_name": "Ada",
        "last_name": "Admin",
        "email": "admin@fpass.io",
        "role": "admin",
        "status": "active"
    })
}

pub fn fixture_wallet(balance: f64) -> JsonValue {
    json!({
        "id": 10,
        "wallet_id": "FP-1001",
        "balance": balance,
        "currency": "USD",
        "status": "active"
    })
}

pub fn fixture_transactions() -> JsonValue {
    let now = Utc::now().to_rfc3339();
    json!([
        {
            "transaction_id": "TX-1",
            "sender_id": 1,
            "receiver_id": 2,
            "sender_name": "Alice Cooper",
            "receiver_name": "Bob Marley",
            "amount": 100,
            "fee": 1.5,
            "type": "transfer",
            "status": "completed",
            "created_at": now
        },
        {
            "transaction_id": "TX-2",
            "sender_id": 2,
            "receiver_id": 1,
            "sender_name": "Bob Marley",
            "receiver_name": "Alice Cooper",
            "amount": "40.00",
            "fee": "0.60",
            "type": "transfer",
            "status": "completed",
            "created_at": now
        },
        {
            "id": 3,
            "sender_id": null,
            "receiver_id": 1,
            "receiver_name": "Alice Cooper",
            "amount": 500,
            "type": "add_funds",
            "status": "completed",
            "created_at": now
        }
    ])
}

pub fn fixture_beneficiaries() -> JsonValue {
    json!([
        { "id": 1, "name": "Bob Marley", "tag": "family", "wallet_id": "FP-2002" },
        { "id": 2, "name": "Carol King", "tag": "landlord", "wallet_id": "FP-3003" }
    ])
}

fn fixture_routes() -> Vec<MockRoute> {
    let session = json!({ "access_token": FIXTURE_TOKEN, "user": fixture_user() });
    let transactions = fixture_transactions();

    vec![
        MockRoute::json("POST", "/api/auth/login", 200, session.clone()),
        MockRoute::json(
            "POST",
            "/api/auth/register",
            201,
            json!({ "success": true, "token": FIXTURE_TOKEN, "user": fixture_user() }),
        ),
        MockRoute::json("GET", "/api/auth/me", 200, json!({ "user": fixture_user() })),
        MockRoute::json("GET", "/api/users/profile", 200, json!({ "user": fixture_user() })),
        MockRoute::json("PUT", "/api/users/profile", 200, json!({ "user": fixture_user() })),
        MockRoute::json(
            "POST",
            "/api/users/change-password",
            200,
            json!({ "success": true, "message": "Password updated" }),
        ),
        MockRoute::json("GET", "/api/users", 200, json!({ "users": [fixture_user()] })),
        MockRoute::json(
            "GET",
            "/api/wallet",
            200,
            json!({ "success": true, "wallet": fixture_wallet(1250.5) }),
        ),
        MockRoute::json(
            "POST",
            "/api/wallet/add-funds",
            200,
            json!({ "success": true, "message": "Funds added", "wallet": fixture_wallet(1350.5) }),
        ),
        MockRoute::json(
            "POST",
            "/api/transactions/send",
            200,
            json!({ "success": true, "message": "Transfer successful", "transaction": transactions[0] }),
        ),
        MockRoute::json(
            "GET",
            "/api/transactions",
            200,
            json!({ "transactions": transactions }),
        ),
        MockRoute::json(
            "GET",
            "/api/transactions/TX-1",
            200,
            json!({ "transaction": transactions[0] }),
        ),
        MockRoute::json(
            "GET",
            "/api/beneficiaries",
            200,
            json!({ "beneficiaries": fixture_beneficiaries() }),
        ),
        MockRoute::json(
            "POST",
            "/api/beneficiaries",
            201,
            json!({ "beneficiary": { "id": 3, "name": "Dan Brown", "tag": null, "wallet_id": "FP-4004" } }),
        ),
        MockRoute::json(
            "GET",
            "/api/admin/stats",
            200,
            json!({
                "total_users": 10,
                "active_users": 8,
                "total_transactions": 40,
                "total_revenue": 60,
                "total_wallet_balance": "12500.00"
            }),
        ),
        MockRoute::json(
            "GET",
            "/api/admin/users",
            200,
            json!({ "users": [fixture_user(), fixture_admin()] }),
        ),
        MockRoute::json(
            "GET",
            "/api/admin/wallets",
            200,
            json!({ "wallets": [
                {
                    "id": 10, "wallet_id": "FP-1001", "balance": 1250.5, "currency": "USD",
                    "status": "active",
                    "user": { "first_name": "Alice", "last_name": "Cooper", "email": "alice@example.com" }
                },
                {
                    "id": 11, "wallet_id": "FP-2002", "balance": "749.50", "currency": "USD",
                    "status": "frozen",
                    "user": { "first_name": "Bob", "last_name": "Marley", "email": "bob@example.com" }
                }
            ] }),
        ),
        MockRoute::json(
            "POST",
            "/api/admin/wallets/10/adjust",
            200,
            json!({ "success": true, "wallet": fixture_wallet(1300.5) }),
        ),
        MockRoute::json(
            "GET",
            "/api/admin/transactions",
            200,
            json!({ "transactions": transactions }),
        ),
    ]
}
