//! Tweet embeds.

use super::source_url;
use crate::capability::BlockComponent;
use crate::record::Block;
use crate::render::RenderContext;
use crate::utils::html;

/// Embeds a tweet by its numeric status id. Always available.
pub struct TweetEmbed;

/// Status id from a tweet URL such as
/// `https://twitter.com/user/status/1234567890?s=20`.
pub fn tweet_id(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    let id = path.trim_end_matches('/').rsplit('/').next()?;
    (!id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())).then_some(id)
}

impl BlockComponent for TweetEmbed {
    fn render(&self, block: &Block, _cx: &RenderContext<'_>) -> String {
        let Some(src) = source_url(block) else {
            return String::new();
        };

        let link = match tweet_id(&src) {
            Some(id) => html::element(
                "a",
                &[("href", &format!("https://twitter.com/i/status/{id}"))],
                "",
            ),
            None => html::element("a", &[("href", &src)], &html::escape(&src)),
        };
        let quote = html::element("blockquote", &[("class", "twitter-tweet")], &link);
        html::element("div", &[("class", "notion-tweet")], &quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tweet_id() {
        assert_eq!(
            tweet_id("https://twitter.com/jack/status/20?s=20"),
            Some("20")
        );
        assert_eq!(tweet_id("https://x.com/a/status/1234567890/"), Some("1234567890"));
        assert_eq!(tweet_id("https://twitter.com/jack"), None);
        assert_eq!(tweet_id(""), None);
    }
}
