//! `braid posts` — list the posts in an export.

use anyhow::Result;

use crate::data::loader;
use crate::data::model::Post;

pub fn run(source: &str) -> Result<()> {
    let posts = loader::load_posts(source);
    let lines = list_posts(&posts);
    if lines.is_empty() {
        println!("  No posts.");
    } else {
        for line in lines {
            println!("  {}", line);
        }
    }
    Ok(())
}

fn list_posts(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .map(|post| {
            let count = post.comments.len();
            format!(
                "{}  {}  [{} comment{}]",
                post.post_id,
                post.label(),
                count,
                if count == 1 { "" } else { "s" }
            )
        })
        .collect()
}
