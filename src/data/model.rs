use serde::Deserialize;

/// A single discussion post with its flattened comment list, as exported
/// by the scraper.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub post_id: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    /// Display label for selectors and listings. Falls back to a synthetic
    /// label built from the post id when the title is absent or blank.
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.clone(),
            _ => format!("Post {}", self.post_id),
        }
    }

    pub fn author_or_deleted(&self) -> &str {
        display_author(self.author.as_deref())
    }

    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// One comment from the export. `depth` and `parent_id` come straight from
/// the source markup; the tree transform re-derives both (see `tree::transform`).
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    /// The source's stable comment identifier.
    #[serde(alias = "thing_id")]
    pub id: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Permalink to replies that were elided from the export, when present.
    #[serde(default)]
    pub more_replies: Option<String>,
}

impl Comment {
    pub fn author_or_deleted(&self) -> &str {
        display_author(self.author.as_deref())
    }

    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

fn display_author(author: Option<&str>) -> &str {
    match author {
        Some(a) if !a.trim().is_empty() => a,
        _ => "[deleted]",
    }
}

/// First `limit` characters of `text`, with an ellipsis when truncated.
/// Splits on character boundaries, never mid-codepoint.
pub fn excerpt(text: &str, limit: usize) -> String {
    let mut out = String::new();
    for (taken, ch) in text.chars().enumerate() {
        if taken == limit {
            out.push_str("...");
            return out;
        }
        out.push(ch);
    }
    out
}
