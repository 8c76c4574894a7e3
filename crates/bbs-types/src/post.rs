use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted post.
///
/// Only the post store produces values of this type: `created_at` is the
/// store's clock at persistence time, never the client's.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub name: String,
    pub body: String,
    /// Retrieval address of the attached image, or `""` when there is none.
    #[serde(rename = "imageurl", default)]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

/// A post that has not been persisted yet.
///
/// Carries no timestamp; the post store assigns one, see [`NewPost::into_post`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewPost {
    pub name: String,
    pub body: String,
    pub image_url: String,
}

impl NewPost {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            image_url: String::new(),
        }
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }

    /// Stamp the post with its persistence time. Intended for post store
    /// implementations.
    pub fn into_post(self, created_at: DateTime<Utc>) -> Post {
        Post {
            name: self.name,
            body: self.body,
            image_url: self.image_url,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Post {
        NewPost::new("gopher", "hello world!")
            .into_post(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap())
    }

    #[test]
    fn json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, ["body", "created_at", "imageurl", "name"]);
        assert_eq!(obj["imageurl"], "");
        assert_eq!(obj["created_at"], "2021-03-04T05:06:07Z");
    }

    #[test]
    fn deserializes_without_imageurl() {
        let post: Post = serde_json::from_str(
            r#"{"name":"a","body":"b","created_at":"2021-03-04T05:06:07Z"}"#,
        )
        .unwrap();
        assert!(!post.has_image());
    }

    #[test]
    fn new_post_builder() {
        let p = NewPost::new("dog", "bowwow").with_image_url("memory://x.jpeg");
        assert!(p.has_image());
        let post = p.into_post(Utc::now());
        assert_eq!(post.name, "dog");
        assert_eq!(post.image_url, "memory://x.jpeg");
    }
}
