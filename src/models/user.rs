//! User models matching the SM-Clone user documents.

use serde::{Deserialize, Serialize};

/// A denormalized snapshot of another user, as embedded in friend lists,
/// post authors and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub picture_path: String,
}

impl FriendRef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Search results share the friend snapshot shape.
pub type UserSummary = FriendRef;

/// A full user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub picture_path: String,
    #[serde(default)]
    pub friends: Vec<FriendRef>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether `user_id` appears in this user's friend list.
    pub fn is_friend(&self, user_id: &str) -> bool {
        self.friends.iter().any(|friend| friend.id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_from_api_document() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "password": "hashed",
            "location": "London",
            "occupation": "Analyst",
            "picturePath": "https://img/ada.png",
            "friends": [{ "_id": "u2", "firstName": "Charles", "lastName": "Babbage" }],
            "viewedProfile": 42,
            "__v": 0
        }))
        .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(user.friends.len(), 1);
        assert_eq!(user.friends[0].occupation, "");
        assert!(user.is_friend("u2"));
        assert!(!user.is_friend("u3"));
    }

    #[test]
    fn test_friend_ref_serializes_underscore_id() {
        let friend = FriendRef {
            id: "u9".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            occupation: "Admiral".into(),
            picture_path: String::new(),
        };
        let value = serde_json::to_value(&friend).unwrap();
        assert_eq!(value["_id"], "u9");
        assert_eq!(value["firstName"], "Grace");
    }
}
