//! User API calls: registration, login, logout, profiles and friends.

use serde_json::json;

use super::SocialClient;
use crate::errors::ClientError;
use crate::gateway::{ApiRequest, Effect};
use crate::models::{FriendRef, LoginResponse, MessageResponse, User, UserSummary};
use crate::notify::Notification;
use crate::routes::Route;
use crate::session::SessionEvent;
use crate::validation::{LoginForm, RegisterForm};

impl SocialClient {
    /// POST {API_USER}/register - Create an account. Returns the server message.
    pub async fn register(&self, form: RegisterForm) -> Result<String, ClientError> {
        let request = form.into_request()?;

        let response: MessageResponse = self
            .gateway
            .execute(
                ApiRequest::post(self.user_url(&["register"])?)
                    .public()
                    .json(&request)?,
                |response: &MessageResponse| {
                    vec![Effect::Notify(Notification::success(response.message.clone()))]
                },
            )
            .await?;

        Ok(response.message)
    }

    /// POST {API_USER}/login - Sign in and move to the feed.
    pub async fn login(&self, form: LoginForm) -> Result<User, ClientError> {
        let request = form.into_request()?;

        let response: LoginResponse = self
            .gateway
            .execute(
                ApiRequest::post(self.user_url(&["login"])?)
                    .public()
                    .json(&request)?,
                |response: &LoginResponse| {
                    vec![
                        Effect::Dispatch(SessionEvent::Login {
                            user: response.user.clone(),
                            token: response.token.clone(),
                        }),
                        Effect::Notify(Notification::success("Login successful")),
                        Effect::NavigateAfter(Route::Home),
                    ]
                },
            )
            .await?;

        tracing::info!("Signed in as {}", response.user.id);
        Ok(response.user)
    }

    /// POST {API_USER}/logout - End the session on the server and locally.
    pub async fn logout(&self) -> Result<String, ClientError> {
        let response: MessageResponse = self
            .gateway
            .execute(
                ApiRequest::post(self.user_url(&["logout"])?).json(&json!({}))?,
                |response: &MessageResponse| {
                    vec![
                        Effect::Dispatch(SessionEvent::Logout),
                        Effect::Notify(Notification::info(response.message.clone())),
                        Effect::NavigateAfter(Route::Landing),
                    ]
                },
            )
            .await?;

        Ok(response.message)
    }

    /// GET {API_USER}?search=text - Find users by name.
    pub async fn search_users(&self, text: &str) -> Result<Vec<UserSummary>, ClientError> {
        self.gateway
            .fetch(ApiRequest::get(self.user_url(&[])?).query("search", text))
            .await
    }

    /// GET {API_USER}/:userId - Load a profile.
    pub async fn get_user(&self, user_id: &str) -> Result<User, ClientError> {
        self.gateway
            .fetch(ApiRequest::get(self.user_url(&[user_id])?))
            .await
    }

    /// GET {API_USER}/friendList/:userId - Load a friend list.
    ///
    /// The session's friend list is only replaced when `user_id` is the
    /// signed-in user; other users' lists stay with the caller.
    pub async fn friend_list(&self, user_id: &str) -> Result<Vec<FriendRef>, ClientError> {
        let own_list = self
            .store()
            .user()
            .is_some_and(|user| user.id == user_id);

        self.gateway
            .execute(
                ApiRequest::get(self.user_url(&["friendList", user_id])?),
                |friends: &Vec<FriendRef>| {
                    if own_list {
                        vec![Effect::Dispatch(SessionEvent::SetFriends(friends.clone()))]
                    } else {
                        Vec::new()
                    }
                },
            )
            .await
    }

    /// PATCH {API_USER}/:selfId/:friendId - Add or remove a friend.
    ///
    /// The active timeline is fetched again afterwards since its contents
    /// depend on the friend list.
    pub async fn toggle_friend(&self, friend_id: &str) -> Result<Vec<FriendRef>, ClientError> {
        let self_id = self.self_id()?;

        let friends = self
            .gateway
            .execute(
                ApiRequest::patch(self.user_url(&[self_id.as_str(), friend_id])?).json(&json!({}))?,
                |friends: &Vec<FriendRef>| {
                    vec![Effect::Dispatch(SessionEvent::SetFriends(friends.clone()))]
                },
            )
            .await?;

        if let Err(e) = self.refresh_timeline().await {
            tracing::debug!("Timeline refresh after friend change failed: {}", e);
        }
        Ok(friends)
    }
}
