//! Loading the posts export from disk or over HTTP.
//!
//! Failure policy: any error (I/O, HTTP status, malformed JSON) is logged and
//! yields an empty list. The UI degrades to "no posts available" instead of
//! crashing, and no retry is attempted.

use std::fs;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use log::{error, info};

use crate::data::model::Post;

/// True when `source` should be fetched over HTTP rather than read from disk.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetch and parse the export, surfacing the error to the caller.
fn fetch(source: &str) -> Result<Vec<Post>> {
    let body = if is_url(source) {
        reqwest::blocking::get(source)
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .with_context(|| format!("fetching {source}"))?
    } else {
        fs::read_to_string(source).with_context(|| format!("reading {source}"))?
    };
    let posts: Vec<Post> =
        serde_json::from_str(&body).with_context(|| format!("parsing posts from {source}"))?;
    Ok(posts)
}

/// Load the posts export, degrading to an empty list on failure.
pub fn load_posts(source: &str) -> Vec<Post> {
    match fetch(source) {
        Ok(posts) => {
            info!("loaded {} post(s) from {source}", posts.len());
            posts
        }
        Err(err) => {
            error!("failed to load posts: {err:#}");
            Vec::new()
        }
    }
}

/// Start a background load. The returned channel yields exactly one message;
/// the UI polls it without blocking and stays unpopulated until it arrives.
pub fn spawn_load(source: String) -> mpsc::Receiver<Vec<Post>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(load_posts(&source));
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    const EXPORT: &str = r#"[
        {"post_id": "t3_one", "title": "First", "content": "body", "comments": []},
        {"post_id": "t3_two", "comments": [
            {"id": "t1_a", "author": "a", "text": "hi", "depth": 0}
        ]}
    ]"#;

    #[test]
    fn loads_posts_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(&path, EXPORT).unwrap();

        let posts = load_posts(path.to_str().unwrap());
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].post_id, "t3_one");
        assert_eq!(posts[1].comments.len(), 1);
    }

    #[test]
    fn missing_file_yields_empty_list() {
        let posts = load_posts("/definitely/not/a/real/path.json");
        assert!(posts.is_empty());
    }

    #[test]
    fn malformed_json_yields_empty_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(&path, "{ not json").unwrap();

        let posts = load_posts(path.to_str().unwrap());
        assert!(posts.is_empty());
    }

    #[test]
    fn recognizes_urls() {
        assert!(is_url("https://example.com/posts.json"));
        assert!(is_url("http://localhost:8000/posts.json"));
        assert!(!is_url("posts.json"));
        assert!(!is_url("/data/posts.json"));
    }

    #[test]
    fn background_load_delivers_one_message() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(&path, EXPORT).unwrap();

        let rx = spawn_load(path.to_str().unwrap().to_string());
        let posts = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(posts.len(), 2);
        // The worker sends exactly once and hangs up.
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
