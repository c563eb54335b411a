//! Post models matching the SM-Clone post documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FriendRef;

/// A comment left on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub comment: String,
}

impl Comment {
    pub fn author_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A post as returned by the feed, timeline and mutation endpoints.
///
/// Posts are created server-side; the client only ever receives them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    /// Author snapshot
    pub user: FriendRef,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_path: Option<String>,
    /// Keyed set of user ids that liked the post
    #[serde(default)]
    pub likes: BTreeMap<String, bool>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.get(user_id).copied().unwrap_or(false)
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_from_api_document() {
        let post: Post = serde_json::from_value(json!({
            "_id": "p1",
            "user": { "_id": "u1", "firstName": "Ada", "lastName": "Lovelace" },
            "description": "Hello",
            "picturePath": null,
            "likes": { "u2": true, "u3": true },
            "comments": [{ "firstName": "Charles", "lastName": "Babbage", "comment": "Nice" }],
            "createdAt": "2024-01-01T00:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(post.id, "p1");
        assert_eq!(post.user.id, "u1");
        assert_eq!(post.picture_path, None);
        assert_eq!(post.like_count(), 2);
        assert!(post.is_liked_by("u2"));
        assert!(!post.is_liked_by("u1"));
        assert_eq!(post.comments[0].author_name(), "Charles Babbage");
    }

    #[test]
    fn test_missing_likes_and_comments_default_empty() {
        let post: Post = serde_json::from_value(json!({
            "_id": "p2",
            "user": { "_id": "u1" }
        }))
        .unwrap();

        assert!(post.likes.is_empty());
        assert!(post.comments.is_empty());
        assert_eq!(post.description, "");
    }
}
