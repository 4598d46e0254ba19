//! # Session Loading Tests

use minutes_browser::{
    errors::BrowserError,
    session::{cookie_domain, SessionOrigin, SessionSource, SESSION_COOKIE_NAME},
};
use std::io::Write;

const WEB_BASE: &str = "https://www.notion.so";

#[tokio::test]
async fn test_prefers_the_session_file() -> anyhow::Result<()> {
    // --- 1. Arrange ---
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"{{
            "cookies": [
                {{"name": "token_v2", "value": "from-file", "domain": ".notion.so", "path": "/",
                  "expires": 1900000000, "httpOnly": true, "secure": true, "sameSite": "Lax"}},
                {{"name": "notion_user_id", "value": "u-1", "domain": ".notion.so"}}
            ],
            "origins": []
        }}"#
    )?;
    let source = SessionSource::new(file.path(), Some("from-env".to_string()), WEB_BASE);

    // --- 2. Act ---
    let session = source.load().await?;

    // --- 3. Assert ---
    assert_eq!(session.origin, SessionOrigin::StateFile);
    assert_eq!(session.cookies.len(), 2);
    assert_eq!(session.cookies[0].value, "from-file");
    assert!(session.cookies[0].http_only);
    assert_eq!(session.cookies[1].path, "/");
    assert!(!session.cookies[1].secure);
    Ok(())
}

#[tokio::test]
async fn test_falls_back_to_the_token() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let source = SessionSource::new(
        dir.path().join("missing.json"),
        Some(" secret-token ".to_string()),
        WEB_BASE,
    );

    let session = source.load().await?;

    assert_eq!(session.origin, SessionOrigin::Token);
    assert_eq!(session.cookies.len(), 1);
    let cookie = &session.cookies[0];
    assert_eq!(cookie.name, SESSION_COOKIE_NAME);
    assert_eq!(cookie.value, "secret-token");
    assert_eq!(cookie.domain, ".notion.so");
    assert!(cookie.secure && cookie.http_only);
    Ok(())
}

#[tokio::test]
async fn test_unreadable_file_falls_back_to_the_token() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "not json")?;
    let source = SessionSource::new(file.path(), Some("tok".to_string()), WEB_BASE);

    let session = source.load().await?;

    assert_eq!(session.origin, SessionOrigin::Token);
    Ok(())
}

#[tokio::test]
async fn test_empty_cookie_list_falls_back_to_the_token() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, r#"{{"cookies": []}}"#)?;
    let source = SessionSource::new(file.path(), Some("tok".to_string()), WEB_BASE);

    let session = source.load().await?;

    assert_eq!(session.origin, SessionOrigin::Token);
    Ok(())
}

#[tokio::test]
async fn test_no_session_fails_immediately() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let source = SessionSource::new(dir.path().join("session.json"), Some("  ".to_string()), WEB_BASE);

    let err = source.load().await.unwrap_err();

    match err {
        BrowserError::MissingSession(message) => {
            assert!(message.contains("SESSION_TOKEN"));
            assert!(message.contains("session.json"));
        }
        other => panic!("expected MissingSession, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_cookie_domain() {
    assert_eq!(cookie_domain("https://www.notion.so"), ".notion.so");
    assert_eq!(cookie_domain("https://notes.example.com/"), ".notes.example.com");
    assert_eq!(cookie_domain("http://localhost:3000"), ".localhost");
}
