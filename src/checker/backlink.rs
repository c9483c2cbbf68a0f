// src/checker/backlink.rs
// =============================================================================
// The Backlink record: one outbound reference found on a page whose target
// matched the caller's pattern.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Which element produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    /// An `<a href>` element
    Anchor,
    /// An `<img src>` element (image hotlinking)
    Image,
}

impl TagType {
    /// The HTML tag name for this kind of element
    pub fn tag_name(&self) -> &'static str {
        match self {
            TagType::Anchor => "a",
            TagType::Image => "img",
        }
    }
}

/// A single matching link or image.
///
/// Fields are private: a Backlink is built once from its source element and
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backlink {
    target: String,
    content: String,
    no_follow: bool,
    link_window: String,
    tag_type: TagType,
}

impl Backlink {
    // Builds a record for an <a href> match
    pub fn anchor(target: String, content: String, no_follow: bool, link_window: String) -> Self {
        Self {
            target,
            content,
            no_follow,
            link_window,
            tag_type: TagType::Anchor,
        }
    }

    // Builds a record for an <img src> match. Images never carry rel or target.
    pub fn image(target: String, alt: String) -> Self {
        Self {
            target,
            content: alt,
            no_follow: false,
            link_window: String::new(),
            tag_type: TagType::Image,
        }
    }

    /// The raw `href`/`src` value, exactly as written in the markup
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Anchor text or image alt text, entity-decoded and trimmed
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn no_follow(&self) -> bool {
        self.no_follow
    }

    /// The anchor's `target` attribute (`_blank`, a frame name, ...) or ""
    pub fn link_window(&self) -> &str {
        &self.link_window
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_defaults() {
        let link = Backlink::image("http://x.test/b.png".to_string(), "pic".to_string());
        assert_eq!(link.tag_type(), TagType::Image);
        assert!(!link.no_follow());
        assert_eq!(link.link_window(), "");
        assert_eq!(link.content(), "pic");
    }

    #[test]
    fn test_serializes_tag_type_as_snake_case() {
        let link = Backlink::anchor(
            "http://x.test/a".to_string(),
            "Visit".to_string(),
            true,
            "_blank".to_string(),
        );
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["tag_type"], "anchor");
        assert_eq!(json["no_follow"], true);
        assert_eq!(json["link_window"], "_blank");
        assert_eq!(TagType::Image.tag_name(), "img");
    }
}
