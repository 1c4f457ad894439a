//! Tests for the theme API client against a mock HTTP server.

use assert_matches::assert_matches;
use chrono::Utc;
use serde_json::{json, Value};
use storefront_client::{ThemeApiClient, ThemeApiError};
use storefront_core::blocks::BlockKind;
use storefront_core::editor::{EditorError, EditorState, ThemeEditor};
use storefront_core::theme::{ColorRole, ReplaceTheme, Theme, ThemeDocument};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const TOKEN: &str = "test-token";

fn sample_theme(is_active: bool, version: i32) -> Theme {
    let now = Utc::now();
    Theme {
        id: 5,
        store_id: Some(9),
        is_active,
        is_preset: false,
        version,
        document: ThemeDocument {
            name: "Summer".into(),
            ..ThemeDocument::default()
        },
        created_at: now,
        updated_at: now,
    }
}

fn envelope(theme: &Theme) -> Value {
    json!({ "data": theme })
}

fn client_for(server: &MockServer) -> ThemeApiClient {
    ThemeApiClient::new(format!("{}/api/v1/", server.uri()), TOKEN)
}

/// Echoes a PATCH body back as the stored theme, bumping the version.
struct EchoReplace;

impl Respond for EchoReplace {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: ReplaceTheme = serde_json::from_slice(&request.body).unwrap();
        let mut theme = sample_theme(false, 2);
        theme.document = body.document;
        ResponseTemplate::new(200).set_body_json(envelope(&theme))
    }
}

#[tokio::test]
async fn get_theme_unwraps_the_data_envelope() {
    let server = MockServer::start().await;
    let theme = sample_theme(true, 1);
    Mock::given(method("GET"))
        .and(path("/api/v1/stores/9/themes/5"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&theme)))
        .expect(1)
        .mount(&server)
        .await;

    let fetched = client_for(&server).get_theme(9, 5).await.unwrap();
    assert_eq!(fetched.id, 5);
    assert!(fetched.is_active);
    assert_eq!(fetched.document, theme.document);
}

#[tokio::test]
async fn error_body_message_surfaces_in_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/stores/9/themes/5"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Validation failed: colors.primary must be a #RRGGBB hex color",
            "code": "VALIDATION_ERROR",
        })))
        .mount(&server)
        .await;

    let body = ReplaceTheme {
        document: ThemeDocument::default(),
        expected_version: None,
    };
    let err = client_for(&server)
        .replace_theme(9, 5, &body)
        .await
        .unwrap_err();
    let (status, code, message) = assert_matches!(
        err,
        ThemeApiError::Api { status, code, message } => (status, code, message)
    );
    assert_eq!(status, 400);
    assert_eq!(code.as_deref(), Some("VALIDATION_ERROR"));
    assert!(message.contains("colors.primary"));
}

#[tokio::test]
async fn non_json_error_body_is_kept_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/stores/9/themes/5/activate"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server).activate_theme(9, 5).await.unwrap_err();
    assert_matches!(
        err,
        ThemeApiError::Api { status: 502, code: None, ref message } if message == "bad gateway"
    );
}

#[tokio::test]
async fn font_and_block_catalogs_decode() {
    let server = MockServer::start().await;
    let fonts = storefront_core::theme::font_catalog();
    Mock::given(method("GET"))
        .and(path("/api/v1/themes/meta/fonts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": fonts })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/themes/meta/blocks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": storefront_core::blocks::block_catalog()
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.font_catalog().await.unwrap(), fonts);

    let blocks = client.block_catalog().await.unwrap();
    assert_eq!(blocks.len(), BlockKind::ALL.len());
    assert!(blocks.iter().any(|b| b.kind == BlockKind::HeroBanner));
}

// ---------------------------------------------------------------------------
// Editor over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn editor_save_and_activate_goes_through_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/stores/9/themes/5"))
        .and(body_partial_json(json!({ "name": "Autumn" })))
        .respond_with(EchoReplace)
        .expect(1)
        .mount(&server)
        .await;

    let mut activated = sample_theme(true, 2);
    activated.document.name = "Autumn".into();
    Mock::given(method("POST"))
        .and(path("/api/v1/stores/9/themes/5/activate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&activated)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut editor = ThemeEditor::open(sample_theme(false, 1));
    editor.rename("Autumn").unwrap();
    editor.update_color(ColorRole::Accent, "#ea580c").unwrap();
    editor.add_block(BlockKind::Spacer);
    assert_eq!(editor.state(), EditorState::Dirty);

    let saved = editor.save(&client, true).await.unwrap();
    assert!(saved.is_active);
    assert_eq!(editor.state(), EditorState::Clean);
    assert_eq!(editor.saved().version, 2);
    assert_eq!(editor.draft().name, "Autumn");
}

#[tokio::test]
async fn failed_save_over_http_leaves_editor_dirty() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/stores/9/themes/5"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": "Conflict: theme was modified (current version 4)",
            "code": "CONFLICT",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut editor = ThemeEditor::open(sample_theme(false, 1)).with_conflict_detection(true);
    editor.rename("Stale").unwrap();

    let err = editor.save(&client, false).await.unwrap_err();
    assert_matches!(err, EditorError::Save(ref message) if message.contains("current version 4"));
    assert_eq!(editor.state(), EditorState::Dirty);
    assert_eq!(editor.draft().name, "Stale");
}
