use release_actions::github::{GitHubApi, HttpGitHub};
use release_actions::ReleaseActionError;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone)]
struct SeenRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl SeenRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serves one canned response per connection, in order, and records what it saw.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, Arc<Mutex<Vec<SeenRequest>>>, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_server = Arc::clone(&seen);

    let handle = thread::spawn(move || {
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut headers = Vec::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    headers.push((name.trim().to_string(), value.trim().to_string()));
                }
            }

            let length = headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.parse::<usize>().ok())
                .unwrap_or(0);
            let mut body_bytes = vec![0; length];
            reader.read_exact(&mut body_bytes).unwrap();

            seen_by_server.lock().unwrap().push(SeenRequest {
                request_line: request_line.trim_end().to_string(),
                headers,
                body: String::from_utf8(body_bytes).unwrap(),
            });

            let response = format!(
                "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
    });

    (base, seen, handle)
}

#[test]
fn test_list_comments_sends_auth_and_parses_wrapped_payload() {
    let (base, seen, handle) = serve(vec![(
        200,
        r#"{"comments":[{"id":1,"body":"Upgrade from v1"},{"id":2,"body":"hi"}]}"#,
    )]);
    let client = HttpGitHub::new(base, "331334");

    let comments = client.list_comments("fubar/repo", "1").unwrap();
    handle.join().unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].id, 1);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].request_line, "GET /repos/fubar/repo/issues/1/comments HTTP/1.1");
    assert_eq!(seen[0].header("authorization"), Some("Bearer 331334"));
    assert_eq!(seen[0].header("content-type"), Some("application/json"));
}

#[test]
fn test_list_comments_accepts_bare_array() {
    let (base, _seen, handle) = serve(vec![(200, r#"[{"id":5,"body":null}]"#)]);
    let client = HttpGitHub::new(base, "t");

    let comments = client.list_comments("o/r", "3").unwrap();
    handle.join().unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].body, "");
}

#[test]
fn test_create_comment_posts_json_body() {
    let (base, seen, handle) = serve(vec![(201, r#"{"id":77}"#)]);
    let client = HttpGitHub::new(base, "t");

    client
        .create_comment("fubar/repo", "1", "fubar comment")
        .unwrap();
    handle.join().unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].request_line, "POST /repos/fubar/repo/issues/1/comments HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(body, serde_json::json!({ "body": "fubar comment" }));
}

#[test]
fn test_delete_comment_targets_comment_id() {
    let (base, seen, handle) = serve(vec![(204, "")]);
    let client = HttpGitHub::new(base, "t");

    client.delete_comment("fubar/repo", 3).unwrap();
    handle.join().unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].request_line, "DELETE /repos/fubar/repo/issues/comments/3 HTTP/1.1");
}

#[test]
fn test_error_status_becomes_api_error() {
    let (base, _seen, handle) = serve(vec![(403, r#"{"message":"Resource not accessible"}"#)]);
    let client = HttpGitHub::new(base, "t");

    let err = client.create_comment("o/r", "1", "x").unwrap_err();
    handle.join().unwrap();

    assert!(matches!(err, ReleaseActionError::Api { status: 403, method: "POST", .. }));
}

#[test]
fn test_unreachable_host_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = HttpGitHub::new(base, "t");
    let err = client.list_comments("o/r", "1").unwrap_err();
    assert!(matches!(err, ReleaseActionError::Http(_)));
}
