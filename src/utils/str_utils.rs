use itertools::Itertools;

pub trait StringExtensions {
    /// Rewrites a watch/share video link into its embeddable player form.
    /// E.g. `"https://vimeo.com/123".to_embed_url() == "https://player.vimeo.com/video/123"`
    fn to_embed_url(&self) -> String;

    /// Splits text authored with literal `\n` escapes into trimmed, non-empty lines.
    fn text_lines(&self) -> Vec<String>;
}

impl StringExtensions for str {
    fn to_embed_url(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        if self.contains("youtube.com/watch?v=") {
            return self.replacen("watch?v=", "embed/", 1);
        }
        if self.contains("vimeo.com/") && !self.contains("player.vimeo.com") {
            let video_id = self.rsplit('/').next().unwrap_or_default();
            return format!("https://player.vimeo.com/video/{}", video_id);
        }
        self.to_string()
    }

    fn text_lines(&self) -> Vec<String> {
        self.replace("\\n", "\n")
            .lines()
            .map(|x| x.trim())
            .filter(|x| !x.is_empty())
            .map(|x| x.to_string())
            .collect_vec()
    }
}

#[test]
fn test_to_embed_url() {
    assert_eq!(
        "https://www.youtube.com/watch?v=abc123".to_embed_url(),
        "https://www.youtube.com/embed/abc123"
    );
    assert_eq!(
        "https://vimeo.com/987654".to_embed_url(),
        "https://player.vimeo.com/video/987654"
    );
    assert_eq!(
        "https://player.vimeo.com/video/987654".to_embed_url(),
        "https://player.vimeo.com/video/987654"
    );
    assert_eq!("".to_embed_url(), "");
}

#[test]
fn test_text_lines() {
    assert_eq!(
        "첫 줄\\n둘째 줄\n\n  셋째 줄 ".text_lines(),
        vec!["첫 줄", "둘째 줄", "셋째 줄"]
    );
}
