use std::sync::Once;

use article_engine::{api_endpoint, ArticleCreator, CreateError, CreatorSettings, MediaWikiCreator};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(article_logging::initialize_for_tests);
}

fn creator_for(server: &MockServer) -> CreatorSettings {
    CreatorSettings::new(api_endpoint(&server.uri()).unwrap())
}

async fn mount_csrf_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("type", "csrf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": { "tokens": { "csrftoken": "edit-token+\\" } }
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_edit_response(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string_contains("action=edit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn successful_edit_creates_article() {
    init_logging();
    let server = MockServer::start().await;
    mount_csrf_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string_contains("action=edit"))
        .and(body_string_contains("title=Page+One"))
        .and(body_string_contains("createonly=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "edit": { "result": "Success", "title": "Page One" }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let creator = MediaWikiCreator::new(creator_for(&server)).unwrap();

    assert!(creator.create_article("Page One", "hello").await.unwrap());
    // The edit token is cached after the first article.
    assert!(creator.create_article("Page One", "again").await.unwrap());
}

#[tokio::test]
async fn existing_article_is_a_handled_rejection() {
    init_logging();
    let server = MockServer::start().await;
    mount_csrf_token(&server, 1).await;
    mount_edit_response(
        &server,
        json!({ "error": { "code": "articleexists", "info": "The article already exists." } }),
    )
    .await;

    let creator = MediaWikiCreator::new(creator_for(&server)).unwrap();

    assert!(!creator.create_article("Taken", "x").await.unwrap());
}

#[tokio::test]
async fn unknown_api_error_is_fatal() {
    init_logging();
    let server = MockServer::start().await;
    mount_csrf_token(&server, 1).await;
    mount_edit_response(
        &server,
        json!({ "error": { "code": "permissiondenied", "info": "You do not have permission." } }),
    )
    .await;

    let creator = MediaWikiCreator::new(creator_for(&server)).unwrap();
    let err = creator.create_article("Page", "x").await.unwrap_err();

    match err {
        CreateError::Api { code, info } => {
            assert_eq!(code, "permissiondenied");
            assert!(info.contains("permission"));
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_status_error_is_fatal() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let creator = MediaWikiCreator::new(creator_for(&server)).unwrap();
    let err = creator.create_article("Page", "x").await.unwrap_err();

    assert!(matches!(err, CreateError::Status(503)));
}

#[tokio::test]
async fn malformed_body_is_fatal() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let creator = MediaWikiCreator::new(creator_for(&server)).unwrap();
    let err = creator.create_article("Page", "x").await.unwrap_err();

    assert!(matches!(err, CreateError::MalformedResponse(_)));
}

#[tokio::test]
async fn logs_in_once_before_the_first_edit() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("type", "login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": { "tokens": { "logintoken": "login-token+\\" } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string_contains("action=login"))
        .and(body_string_contains("lgname=Bot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": { "result": "Success", "lgusername": "Bot" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_csrf_token(&server, 1).await;
    mount_edit_response(&server, json!({ "edit": { "result": "Success" } })).await;

    let settings = creator_for(&server).with_credentials("Bot", "secret");
    let creator = MediaWikiCreator::new(settings).unwrap();

    assert!(creator.create_article("First", "a").await.unwrap());
    assert!(creator.create_article("Second", "b").await.unwrap());
}

#[tokio::test]
async fn rejected_login_is_fatal() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("type", "login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": { "tokens": { "logintoken": "t" } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string_contains("action=login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": { "result": "Failed", "reason": "Incorrect password entered." }
        })))
        .mount(&server)
        .await;

    let settings = creator_for(&server).with_credentials("Bot", "wrong");
    let creator = MediaWikiCreator::new(settings).unwrap();
    let err = creator.create_article("Page", "x").await.unwrap_err();

    match err {
        CreateError::Login(reason) => assert_eq!(reason, "Incorrect password entered."),
        other => panic!("expected login error, got {other:?}"),
    }
}

#[tokio::test]
async fn expired_token_is_refreshed_once() {
    init_logging();
    let server = MockServer::start().await;
    mount_csrf_token(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string_contains("action=edit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "code": "badtoken", "info": "Invalid CSRF token." }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_edit_response(&server, json!({ "edit": { "result": "Success" } })).await;

    let creator = MediaWikiCreator::new(creator_for(&server)).unwrap();

    assert!(creator.create_article("Page", "x").await.unwrap());
}
