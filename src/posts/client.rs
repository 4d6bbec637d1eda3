//! Posts endpoints.

use crate::clients::{ApiClient, HttpError, RequestOptions};
use crate::model::TypeDescriptor;

use super::models::{Post, PostCreateRequest};

/// Client for the `/posts` endpoints.
///
/// Borrows an [`ApiClient`] and runs every call through its pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use botenix_client::posts::{PostCreateRequest, PostsClient};
///
/// let posts = PostsClient::new(&client);
/// let post = posts
///     .create_post(&PostCreateRequest::new("channel-id", "Deploy finished"))
///     .await?;
/// println!("created {}", post.id);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PostsClient<'c> {
    client: &'c ApiClient,
}

impl<'c> PostsClient<'c> {
    /// Creates a posts client on top of `client`.
    #[must_use]
    pub const fn new(client: &'c ApiClient) -> Self {
        Self { client }
    }

    /// Creates a post.
    ///
    /// Unset optional fields are omitted from the request body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails or the response is not a
    /// valid [`Post`].
    pub async fn create_post(&self, post: &PostCreateRequest) -> Result<Post, HttpError> {
        let options = RequestOptions::new()
            .payload(post, TypeDescriptor::one())
            .exclude_none(true)
            .response(TypeDescriptor::<Post>::one());

        Ok(self
            .client
            .post()
            .call("/posts", options)
            .await?
            .into_record()?)
    }

    /// Fetches a post by ID.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails or the response is not a
    /// valid [`Post`].
    pub async fn get_post(&self, post_id: &str) -> Result<Post, HttpError> {
        let options = RequestOptions::new().response(TypeDescriptor::<Post>::one());

        Ok(self
            .client
            .get()
            .call(&Self::post_path(post_id), options)
            .await?
            .into_record()?)
    }

    /// Deletes a post by ID.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn delete_post(&self, post_id: &str) -> Result<(), HttpError> {
        self.client.delete().send(&Self::post_path(post_id)).await?;
        Ok(())
    }

    fn post_path(post_id: &str) -> String {
        format!("/posts/{}", urlencoding::encode(post_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_path_encodes_id() {
        assert_eq!(PostsClient::post_path("abc123"), "/posts/abc123");
        assert_eq!(PostsClient::post_path("a/b c"), "/posts/a%2Fb%20c");
    }
}
