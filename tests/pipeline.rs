//! End-to-end tests for the request pipeline.
//!
//! Every test drives a [`Session`] against a local `httptest` server, so no
//! real network access is needed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use httptest::{all_of, matchers::*, responders::*, Expectation, Server};
use reqkit::config::{DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT};
use reqkit::{
    CookieJar, ErrorKind, ExternalContent, KnownHeader, MemoryCookieJar, Method, MultipartForm,
    PostBodyKind, RequestConfig, RequestError, RequestState, Session,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;

fn url(server: &Server, path: &str) -> String {
    server.url(path).to_string()
}

#[tokio::test]
async fn test_json_body_sets_kind_and_content_type() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/items"),
            request::headers(contains(("content-type", "application/json;charset=utf-8"))),
            request::body(json_decoded(eq(json!({"name": "reqkit", "n": 2})))),
        ])
        .respond_with(status_code(201).body("created")),
    );

    let mut config = RequestConfig::new().with_json(json!({"name": "reqkit", "n": 2}));
    let response = Session::new()
        .post(&url(&server, "/items"), &mut config)
        .await
        .expect("request should succeed");

    assert_eq!(config.post_body_kind, Some(PostBodyKind::Json));
    assert_eq!(response.status_code(), 201);
    assert_eq!(response.text(), "created");
    assert_eq!(response.state(), RequestState::Completed);
}

#[tokio::test]
async fn test_external_content_wins_over_json() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("PUT", "/doc"),
            request::headers(contains(("content-type", "application/xml"))),
            request::body("<doc/>"),
        ])
        .respond_with(status_code(204)),
    );

    let mut config = RequestConfig::new()
        .with_json(json!({"ignored": true}))
        .with_external_content(ExternalContent::new(
            b"<doc/>".to_vec(),
            Some("application/xml".into()),
        ));
    let response = Session::new()
        .put(&url(&server, "/doc"), &mut config)
        .await
        .unwrap();

    assert_eq!(config.post_body_kind, Some(PostBodyKind::ExternalContent));
    assert_eq!(response.status_code(), 204);
    assert!(response.content().is_empty());
}

#[tokio::test]
async fn test_get_params_are_appended_to_query() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/search"),
            request::query(url_decoded(contains(("b", "1")))),
            request::query(url_decoded(contains(("q", "a b")))),
        ])
        .respond_with(status_code(200).body("ok")),
    );

    let target = format!("{}?b=1", url(&server, "/search"));
    let mut config = RequestConfig::new().with_param("q", "a b");
    let response = Session::new().get(&target, &mut config).await.unwrap();

    assert_eq!(response.status_code(), 200);
    assert_eq!(config.post_body_kind, Some(PostBodyKind::None));
}

#[tokio::test]
async fn test_post_params_become_form_body() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/form"),
            request::headers(contains((
                "content-type",
                "application/x-www-form-urlencoded;charset=utf-8"
            ))),
            request::body("a=1&b=x+y"),
        ])
        .respond_with(status_code(200)),
    );

    let mut config = RequestConfig::new()
        .with_param("a", "1")
        .with_param("b", "x y");
    let response = Session::new()
        .post(&url(&server, "/form"), &mut config)
        .await
        .unwrap();
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_multipart_body() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/upload"),
            request::headers(contains((
                "content-type",
                "multipart/form-data; boundary=XyZ"
            ))),
            request::body(matches("name=\"file\"; filename=\"a.txt\"")),
        ])
        .respond_with(status_code(200)),
    );

    let form = MultipartForm::with_boundary("XyZ")
        .text("title", "hello")
        .file("file", "a.txt", Some("text/plain".into()), b"abc".to_vec());
    let mut config = RequestConfig::new().with_multipart(form);
    let response = Session::new()
        .post(&url(&server, "/upload"), &mut config)
        .await
        .unwrap();
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_default_headers_injected_but_never_overwritten() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/defaults"),
            request::headers(contains(("user-agent", DEFAULT_USER_AGENT))),
            request::headers(contains(("accept-language", DEFAULT_ACCEPT_LANGUAGE))),
        ])
        .respond_with(status_code(200)),
    );
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/custom"),
            request::headers(contains(("user-agent", "tester/2.0"))),
            request::headers(contains(("x-trace", "7"))),
        ])
        .respond_with(status_code(200)),
    );

    let session = Session::new();
    let mut config = RequestConfig::new();
    session
        .get(&url(&server, "/defaults"), &mut config)
        .await
        .unwrap();

    let mut config = RequestConfig::new()
        .with_header(KnownHeader::UserAgent, "tester/2.0")
        .with_custom_header("X-Trace", "7");
    session
        .get(&url(&server, "/custom"), &mut config)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_plain_text_resolves_to_utf8() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/plain")).respond_with(
            status_code(200)
                .insert_header("Content-Type", "text/plain")
                .body("héllo"),
        ),
    );

    let mut config = RequestConfig::new();
    let response = Session::new()
        .get(&url(&server, "/plain"), &mut config)
        .await
        .unwrap();
    assert_eq!(response.text_encoding(), encoding_rs::UTF_8);
    assert_eq!(response.text(), "héllo");
    assert_eq!(response.content_type(), "text/plain");
}

#[tokio::test]
async fn test_html_meta_charset_overrides_default() {
    let (gbk_body, _, _) =
        encoding_rs::GBK.encode("<html><head><meta charset=\"gb2312\"></head><body>名字</body></html>");
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/gbk")).respond_with(
            status_code(200)
                .insert_header("Content-Type", "text/html")
                .body(gbk_body.into_owned()),
        ),
    );

    let mut config = RequestConfig::new();
    let response = Session::new()
        .get(&url(&server, "/gbk"), &mut config)
        .await
        .unwrap();
    assert_eq!(response.text_encoding(), encoding_rs::GBK);
    assert!(response.text().contains("名字"));
}

#[tokio::test]
async fn test_error_status_raises_or_passes_through() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/missing"))
            .times(2)
            .respond_with(status_code(404).body("Not Found")),
    );

    let session = Session::new();
    let mut config = RequestConfig::new();
    let err = session
        .get(&url(&server, "/missing"), &mut config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpStatusCodeError);
    assert_eq!(err.status_code(), Some(404));

    let mut config = RequestConfig::new().with_throw_on_error_status(false);
    let response = session
        .get(&url(&server, "/missing"), &mut config)
        .await
        .unwrap();
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.text(), "Not Found");
}

#[tokio::test]
async fn test_callback_receives_error_and_caller_gets_faulted_sentinel() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/boom"))
            .respond_with(status_code(500).body("internal")),
    );

    let seen: Arc<Mutex<Vec<(ErrorKind, Option<u16>)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let session = Session::new().with_error_callback(move |e: &RequestError| {
        sink.lock().unwrap().push((e.kind(), e.status_code()));
    });

    let mut config = RequestConfig::new();
    let response = session
        .get(&url(&server, "/boom"), &mut config)
        .await
        .expect("callback mode never returns Err");

    assert_eq!(response.state(), RequestState::Faulted);
    assert_eq!(response.status_code(), 0);
    assert!(response.content().is_empty());
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(ErrorKind::HttpStatusCodeError, Some(500))]
    );
}

#[tokio::test]
async fn test_timer_expiry_yields_timed_out_sentinel() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/slow"))
            .times(..)
            .respond_with(delay_and_then(
                Duration::from_secs(2),
                status_code(200).body("late"),
            )),
    );

    let mut config = RequestConfig::new().with_timeout_millis(100);
    let response = Session::new()
        .get(&url(&server, "/slow"), &mut config)
        .await
        .expect("a timer timeout is not an error");

    assert_eq!(response.state(), RequestState::TimedOut);
    assert_eq!(response.status_code(), 0);
    assert!(response.content().is_empty());
}

fn stalled_server(path: &'static str) -> Server {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", path))
            .times(..)
            .respond_with(delay_and_then(Duration::from_secs(3), status_code(200))),
    );
    server
}

#[tokio::test]
async fn test_transport_timeout_raises_when_enabled() {
    let server = stalled_server("/stall");

    let mut config = RequestConfig::new()
        .with_timeout_millis(2_000)
        .with_transport_timeout_millis(100);
    let err = Session::new()
        .get(&url(&server, "/stall"), &mut config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpRequestTimeout);
}

#[tokio::test]
async fn test_transport_timeout_suppressed_yields_timed_out_sentinel() {
    let server = stalled_server("/stall");

    let mut config = RequestConfig::new()
        .with_timeout_millis(2_000)
        .with_transport_timeout_millis(100)
        .with_throw_on_timeout(false);
    let started = std::time::Instant::now();
    let response = Session::new()
        .get(&url(&server, "/stall"), &mut config)
        .await
        .unwrap();
    assert_eq!(response.state(), RequestState::TimedOut);
    assert_eq!(response.status_code(), 0);
    // The transport gave up well before the executor timer.
    assert!(started.elapsed() < Duration::from_millis(1_500));
}

#[tokio::test]
async fn test_cancel_while_waiting_is_user_cancelled() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/hang"))
            .times(..)
            .respond_with(delay_and_then(Duration::from_secs(2), status_code(200))),
    );

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let mut config = RequestConfig::new()
        .with_timeout_millis(5_000)
        .with_cancel_token(token);
    let err = Session::new()
        .get(&url(&server, "/hang"), &mut config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UserCancelled);
}

#[tokio::test]
async fn test_cookies_flow_through_the_jar() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/login")).respond_with(
            status_code(200)
                .append_header("Set-Cookie", "sid=abc123; Path=/; HttpOnly")
                .body("welcome"),
        ),
    );
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/me"),
            request::headers(contains(("cookie", "sid=abc123"))),
        ])
        .respond_with(status_code(200)),
    );
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/api"),
            request::headers(contains(("cookie", "sid=abc123"))),
        ])
        .respond_with(status_code(200)),
    );

    let jar = MemoryCookieJar::shared();
    let session = Session::new();

    let mut config = RequestConfig::new().with_cookie_jar(jar.clone());
    let response = session
        .get(&url(&server, "/login"), &mut config)
        .await
        .unwrap();
    assert_eq!(jar.all_cookies().len(), 1);
    assert_eq!(response.cookie_jar().all_cookies()[0].name, "sid");

    let mut config = RequestConfig::new().with_cookie_jar(jar.clone());
    session.get(&url(&server, "/me"), &mut config).await.unwrap();

    let mut config = RequestConfig::new()
        .with_cookie_jar(jar)
        .with_raw_body(b"ping".to_vec());
    session.post(&url(&server, "/api"), &mut config).await.unwrap();
}

#[tokio::test]
async fn test_head_request_sends_no_body() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("HEAD", "/h"),
            request::body(""),
        ])
        .respond_with(status_code(200)),
    );

    let mut config = RequestConfig::new().with_raw_body(b"dropped".to_vec());
    let response = Session::new()
        .head(&url(&server, "/h"), &mut config)
        .await
        .unwrap();
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_head_request_carries_params_in_query() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("HEAD", "/h"),
            request::query(url_decoded(contains(("id", "42")))),
            request::body(""),
        ])
        .respond_with(status_code(200)),
    );

    let mut config = RequestConfig::new().with_param("id", "42");
    let response = Session::new()
        .head(&url(&server, "/h"), &mut config)
        .await
        .unwrap();
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_concurrent_requests_share_a_session() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/n"))
            .times(8)
            .respond_with(status_code(200).body("n")),
    );

    let session = Session::new();
    let target = url(&server, "/n");
    let mut handles = Vec::new();
    for _ in 0..8 {
        let session = session.clone();
        let target = target.clone();
        handles.push(tokio::spawn(async move {
            let mut config = RequestConfig::new();
            session.get(&target, &mut config).await
        }));
    }
    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.text(), "n");
    }
}

#[tokio::test]
async fn test_free_function_request() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("DELETE", "/r/1"))
            .respond_with(status_code(202)),
    );

    let mut config = RequestConfig::new();
    let response = reqkit::request(Method::DELETE, &url(&server, "/r/1"), &mut config)
        .await
        .unwrap();
    assert_eq!(response.status_code(), 202);
}
