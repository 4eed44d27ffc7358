// * Shared test harness: a local mock 3x-ui panel and robot webhook on an ephemeral port
#![allow(dead_code)]

use hyper::header::{HeaderMap, COOKIE, SET_COOKIE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "s3cret";
pub const SESSION_COOKIE: &str = "3x-ui";
pub const FRESH_TOKEN: &str = "fresh-token";

// * How the mock panel and webhook answer
#[derive(Debug, Clone)]
pub struct Behaviour {
    pub login_accepts: bool,
    pub login_status: u16,
    // * Raw body that replaces the normal login reply
    pub login_body: Option<String>,
    // * Cookie values the inbound list accepts
    pub accepted_tokens: Vec<String>,
    // * Status for authorized list requests
    pub list_status: u16,
    // * Status for the very first list request, whatever its cookies
    pub first_list_status: Option<u16>,
    pub inbounds: Value,
    pub webhook_status: u16,
    pub webhook_body: String,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            login_accepts: true,
            login_status: 200,
            login_body: None,
            accepted_tokens: vec![FRESH_TOKEN.to_string()],
            list_status: 200,
            first_list_status: None,
            inbounds: json!([
                {"id": 1, "remark": "tokyo", "up": 1536, "down": 1048576, "enable": true},
                {"id": 2, "remark": "", "up": 0, "down": 0, "enable": false},
            ]),
            webhook_status: 200,
            webhook_body: r#"{"errcode":0,"errmsg":"ok"}"#.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Recorded {
    pub logins: AtomicUsize,
    pub lists: AtomicUsize,
    pub webhooks: AtomicUsize,
    pub last_list_headers: Mutex<Option<HeaderMap>>,
    pub last_login_form: Mutex<Option<String>>,
    pub last_webhook_payload: Mutex<Option<Value>>,
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub recorded: Arc<Recorded>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockServer {
    pub async fn start(behaviour: Behaviour) -> Self {
        let recorded = Arc::new(Recorded::default());
        let behaviour = Arc::new(behaviour);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let svc_recorded = recorded.clone();
        let make_svc = make_service_fn(move |_conn| {
            let recorded = svc_recorded.clone();
            let behaviour = behaviour.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |req| {
                    handle(recorded.clone(), behaviour.clone(), req)
                }))
            }
        });

        let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_svc);
        let addr = server.local_addr();

        tokio::spawn(async move {
            let _ = server
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Self {
            addr,
            recorded,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn webhook_url(&self) -> String {
        format!("http://{}/robot/send?access_token=test", self.addr)
    }

    pub fn logins(&self) -> usize {
        self.recorded.logins.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.recorded.lists.load(Ordering::SeqCst)
    }

    pub fn webhooks(&self) -> usize {
        self.recorded.webhooks.load(Ordering::SeqCst)
    }

    pub fn last_list_headers(&self) -> HeaderMap {
        self.recorded
            .last_list_headers
            .lock()
            .unwrap()
            .clone()
            .expect("no inbound list request recorded")
    }

    pub fn last_webhook_payload(&self) -> Value {
        self.recorded
            .last_webhook_payload
            .lock()
            .unwrap()
            .clone()
            .expect("no webhook request recorded")
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle(
    recorded: Arc<Recorded>,
    behaviour: Arc<Behaviour>,
    req: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = hyper::body::to_bytes(body).await.unwrap_or_default();
    let body = String::from_utf8_lossy(&body).to_string();

    let response = match (parts.method, parts.uri.path()) {
        (Method::POST, "/login") => {
            recorded.logins.fetch_add(1, Ordering::SeqCst);
            *recorded.last_login_form.lock().unwrap() = Some(body.clone());

            let creds_ok = body.contains(&format!("username={}", USERNAME))
                && body.contains(&format!("password={}", PASSWORD));
            if behaviour.login_status != 200 {
                Response::builder()
                    .status(behaviour.login_status)
                    .body(Body::from("bad gateway"))
                    .unwrap()
            } else if let Some(raw) = &behaviour.login_body {
                Response::builder()
                    .status(200)
                    .header(SET_COOKIE, format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, FRESH_TOKEN))
                    .body(Body::from(raw.clone()))
                    .unwrap()
            } else if behaviour.login_accepts && creds_ok {
                Response::builder()
                    .status(200)
                    .header(SET_COOKIE, format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, FRESH_TOKEN))
                    .body(Body::from(json!({"success": true, "msg": "Login Successfully"}).to_string()))
                    .unwrap()
            } else {
                json_response(200, json!({"success": false, "msg": "Invalid username or password"}))
            }
        }
        (Method::POST, "/panel/inbound/list") => {
            let seen = recorded.lists.fetch_add(1, Ordering::SeqCst);
            *recorded.last_list_headers.lock().unwrap() = Some(parts.headers.clone());

            if let (0, Some(status)) = (seen, behaviour.first_list_status) {
                Response::builder()
                    .status(status)
                    .body(Body::from("upstream error"))
                    .unwrap()
            } else if !is_authorized(&parts.headers, &behaviour.accepted_tokens) {
                json_response(200, json!({"success": false, "msg": "login expired", "obj": null}))
            } else if behaviour.list_status != 200 {
                Response::builder()
                    .status(behaviour.list_status)
                    .body(Body::from("upstream error"))
                    .unwrap()
            } else {
                json_response(200, json!({"success": true, "msg": "", "obj": behaviour.inbounds}))
            }
        }
        (Method::POST, "/robot/send") => {
            recorded.webhooks.fetch_add(1, Ordering::SeqCst);
            *recorded.last_webhook_payload.lock().unwrap() = serde_json::from_str(&body).ok();

            Response::builder()
                .status(behaviour.webhook_status)
                .header("Content-Type", "application/json")
                .body(Body::from(behaviour.webhook_body.clone()))
                .unwrap()
        }
        _ => Response::builder().status(404).body(Body::from("Not Found")).unwrap(),
    };

    Ok(response)
}

fn is_authorized(headers: &HeaderMap, accepted: &[String]) -> bool {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == SESSION_COOKIE && accepted.iter().any(|t| t == value))
}

fn json_response(status: u16, body: Value) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// * Writes a config document for `server`, optionally with saved cookies
pub fn write_config(server: &MockServer, saved_token: Option<&str>) -> tempfile::NamedTempFile {
    let mut doc = json!({
        "base_url": server.base_url(),
        "username": USERNAME,
        "password": PASSWORD,
        "dingtalk_webhook": server.webhook_url(),
    });
    if let Some(token) = saved_token {
        let mut jar = serde_json::Map::new();
        jar.insert(SESSION_COOKIE.to_string(), json!(token));
        doc["cookies"] = Value::Object(jar);
        doc["cookie_timestamp"] = json!(1_700_000_000.0);
    }

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string_pretty(&doc).unwrap().as_bytes())
        .unwrap();
    file
}

// * Keeps reqwest from routing 127.0.0.1 through a proxy from the environment
pub fn clear_proxy_env() {
    for key in ["HTTP_PROXY", "HTTPS_PROXY", "ALL_PROXY", "http_proxy", "https_proxy", "all_proxy"] {
        std::env::remove_var(key);
    }
}
