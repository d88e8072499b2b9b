use reqhelper::payloads::SignIn;
use reqhelper::{RequestOptions, Session};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_multipart_single_field() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let session = Session::for_tests();
    let exchange = session
        .send_multipart(
            "POST",
            &server.uri(),
            "/upload",
            "json",
            b"payload",
            &RequestOptions::new(),
        )
        .await;
    assert_eq!(exchange.status(), 201);

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .expect("content type");
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("Content-Disposition: form-data; name=\"json\""));
    assert!(body.contains("payload"));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_multipart_content_type_overrides_caller_header() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"data":"stored"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let options = RequestOptions::new()
        .with_header("Content-Type", "application/json")
        .with_header("X-Request-Id", "42");

    let session = Session::for_tests();
    let exchange = session
        .send_multipart_json::<SignIn>(
            "POST",
            &server.uri(),
            "/upload",
            "json",
            br#"{"a":1}"#,
            &options,
        )
        .await;
    assert_eq!(exchange.decoded.map(|s| s.data), Some("stored".to_string()));

    let requests = server.received_requests().await.expect("requests");
    let content_types: Vec<_> = requests[0].headers.get_all("content-type").iter().collect();
    assert_eq!(content_types.len(), 1);
    assert!(content_types[0]
        .to_str()
        .expect("ascii")
        .starts_with("multipart/form-data; boundary="));
    assert_eq!(
        requests[0].headers.get("x-request-id").map(|v| v.as_bytes()),
        Some(&b"42"[..])
    );
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_multipart_value_bytes_sent_unchanged() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let value = [0x66, 0xff, 0xfe, 0x67];
    let session = Session::for_tests();
    session
        .send_multipart(
            "POST",
            &server.uri(),
            "/upload",
            "f",
            &value,
            &RequestOptions::new(),
        )
        .await;

    let requests = server.received_requests().await.expect("requests");
    let body = &requests[0].body;
    assert!(body.windows(value.len()).any(|window| window == value));

    let text = String::from_utf8_lossy(body);
    assert!(text.contains("Content-Disposition: form-data; name=\"f\""));
    assert!(!text.contains("filename="));
}
