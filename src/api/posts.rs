//! Post API calls: feed, timelines, new posts, likes and comments.

use serde_json::json;

use super::{SocialClient, Timeline};
use crate::errors::ClientError;
use crate::gateway::{ApiRequest, Effect};
use crate::models::{CommentRequest, NewPostRequest, Post};
use crate::notify::Notification;
use crate::session::SessionEvent;
use crate::validation::{require_text, COMMENT_EMPTY, POST_EMPTY};

impl SocialClient {
    /// GET {API_POST} - Load the feed into the session.
    pub async fn feed(&self) -> Result<Vec<Post>, ClientError> {
        self.set_timeline(Timeline::Feed);
        self.load_posts(ApiRequest::get(self.post_url(&[])?)).await
    }

    /// GET {API_POST}/:userId - Load a profile timeline into the session.
    pub async fn user_posts(&self, user_id: &str) -> Result<Vec<Post>, ClientError> {
        self.set_timeline(Timeline::Profile(user_id.to_string()));
        self.load_posts(ApiRequest::get(self.post_url(&[user_id])?))
            .await
    }

    /// Fetch whichever timeline was loaded last.
    pub async fn refresh_timeline(&self) -> Result<Vec<Post>, ClientError> {
        match self.timeline() {
            Timeline::Feed => self.feed().await,
            Timeline::Profile(user_id) => self.user_posts(&user_id).await,
        }
    }

    /// POST {API_POST}/new-post - Publish a post, then reload the feed.
    pub async fn create_post(
        &self,
        description: &str,
        picture_path: Option<String>,
    ) -> Result<Vec<Post>, ClientError> {
        require_text("description", description, POST_EMPTY)
            .map_err(|e| self.gateway.reject(e.into()))?;

        let request = NewPostRequest {
            description: description.to_string(),
            picture_path,
        };
        let posts = self
            .gateway
            .execute(
                ApiRequest::post(self.post_url(&["new-post"])?).json(&request)?,
                |posts: &Vec<Post>| {
                    vec![
                        Effect::Dispatch(SessionEvent::SetPosts(posts.clone())),
                        Effect::Notify(Notification::success("Post uploaded successfully")),
                    ]
                },
            )
            .await?;

        if let Err(e) = self.feed().await {
            tracing::debug!("Feed reload after new post failed: {}", e);
        }
        Ok(posts)
    }

    /// PATCH {API_POST}/like/:postId - Toggle the signed-in user's like.
    pub async fn like(&self, post_id: &str) -> Result<Post, ClientError> {
        self.update_post(
            ApiRequest::patch(self.post_url(&["like", post_id])?).json(&json!({}))?,
        )
        .await
    }

    /// PATCH {API_POST}/comment/:postId - Add a comment.
    pub async fn comment(&self, post_id: &str, text: &str) -> Result<Post, ClientError> {
        require_text("comment", text, COMMENT_EMPTY).map_err(|e| self.gateway.reject(e.into()))?;

        let body = CommentRequest {
            comment: text.to_string(),
        };
        self.update_post(ApiRequest::patch(self.post_url(&["comment", post_id])?).json(&body)?)
            .await
    }

    async fn load_posts(&self, request: ApiRequest) -> Result<Vec<Post>, ClientError> {
        self.gateway
            .execute(request, |posts: &Vec<Post>| {
                vec![Effect::Dispatch(SessionEvent::SetPosts(posts.clone()))]
            })
            .await
    }

    async fn update_post(&self, request: ApiRequest) -> Result<Post, ClientError> {
        self.gateway
            .execute(request, |post: &Post| {
                vec![Effect::Dispatch(SessionEvent::SetPost(post.clone()))]
            })
            .await
    }
}
