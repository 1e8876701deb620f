//! HTTP client for the WordPress REST API (`/wp-json/wp/v2`).

use std::path::Path;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use relay_core::{slugify, WordPressCredentials};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::PublisherError;
use crate::types::{
    ConnectionStatus, MediaResult, NewPost, PostStatus, PublishResult, Term, TermResult, WpPost,
};

const USER_AGENT: &str = "RecipeRelay/1.0 (WordPress Publisher)";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);
const UPDATE_TIMEOUT: Duration = Duration::from_secs(30);
const FILE_UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

const TERMS_PER_PAGE: &str = "100";
const DEFAULT_FILENAME: &str = "image.jpg";
const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Serialize)]
struct PostBody<'a> {
    title: &'a str,
    content: &'a str,
    slug: &'a str,
    status: PostStatus,
    #[serde(skip_serializing_if = "str::is_empty")]
    excerpt: &'a str,
    #[serde(skip_serializing_if = "<[u64]>::is_empty")]
    categories: &'a [u64],
    #[serde(skip_serializing_if = "<[u64]>::is_empty")]
    tags: &'a [u64],
    #[serde(skip_serializing_if = "Map::is_empty")]
    meta: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    featured_media: Option<u64>,
}

#[derive(Deserialize)]
struct MediaResponse {
    id: u64,
    #[serde(default)]
    source_url: String,
}

#[derive(Deserialize)]
struct CreatedTerm {
    id: u64,
}

#[derive(Deserialize)]
struct CurrentUser {
    #[serde(default)]
    name: Option<String>,
}

/// Authenticated client for one WordPress site.
pub struct WordPressClient {
    client: Client,
    site_url: String,
    api_base: String,
    username: String,
    app_password: String,
}

impl WordPressClient {
    /// `timeout_secs` bounds every request; lookups and uploads apply
    /// shorter per-request limits on top.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        credentials: &WordPressCredentials,
        timeout_secs: u64,
    ) -> Result<Self, PublisherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;
        let site_url = credentials.site_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            api_base: format!("{site_url}/wp-json/wp/v2"),
            site_url,
            username: credentials.username.clone(),
            app_password: credentials.app_password.clone(),
        })
    }

    #[must_use]
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{endpoint}", self.api_base))
            .basic_auth(&self.username, Some(&self.app_password))
    }

    /// Check the credentials against `users/me`.
    pub async fn test_connection(&self) -> ConnectionStatus {
        let request = self.request(Method::GET, "users/me").timeout(LOOKUP_TIMEOUT);
        match send_json::<CurrentUser>(request).await {
            Ok(user) => ConnectionStatus {
                success: true,
                user: Some(user.name.unwrap_or_else(|| "Unknown".to_string())),
                site: Some(self.site_url.clone()),
                error: None,
            },
            Err(e) => {
                tracing::warn!(site = %self.site_url, error = %e, "WordPress connection check failed");
                ConnectionStatus {
                    error: Some(e.to_string()),
                    ..ConnectionStatus::default()
                }
            }
        }
    }

    /// Create a post, re-hosting its images first.
    ///
    /// A featured image that fails to upload is logged and the post is
    /// created without one.
    pub async fn create_post(&self, post: &NewPost) -> PublishResult {
        match self.try_create_post(post).await {
            Ok(created) => {
                tracing::info!(
                    site = %self.site_url,
                    post_id = created.id,
                    slug = %post.slug,
                    status = %created.status,
                    "post created"
                );
                PublishResult {
                    success: true,
                    post_id: Some(created.id),
                    post_url: Some(created.link),
                    edit_url: Some(self.edit_url(created.id)),
                    status: Some(created.status),
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(site = %self.site_url, slug = %post.slug, error = %e, "failed to create post");
                PublishResult::failed(&e)
            }
        }
    }

    async fn try_create_post(&self, post: &NewPost) -> Result<WpPost, PublisherError> {
        let content = self
            .process_content_images(&post.content, &post.content_images)
            .await;

        let mut featured_media = None;
        if let Some(url) = post.featured_image_url.as_deref().filter(|u| !u.is_empty()) {
            let media = self.upload_image_from_url(url).await;
            if media.success {
                featured_media = media.media_id;
            } else {
                tracing::warn!(
                    url = %url,
                    error = media.error.as_deref().unwrap_or_default(),
                    "featured image upload failed; publishing without it"
                );
            }
        }

        let body = PostBody {
            title: &post.title,
            content: &content,
            slug: &post.slug,
            status: post.status,
            excerpt: &post.excerpt,
            categories: &post.categories,
            tags: &post.tags,
            meta: post.merged_meta(),
            featured_media,
        };
        send_json(self.request(Method::POST, "posts").json(&body)).await
    }

    fn edit_url(&self, post_id: u64) -> String {
        format!("{}/wp-admin/post.php?post={post_id}&action=edit", self.site_url)
    }

    /// Upload each external image and swap its URL in `content` for the
    /// media-library URL. Images that fail keep their original URL.
    async fn process_content_images(&self, content: &str, image_urls: &[String]) -> String {
        let mut content = content.to_string();
        for url in image_urls {
            if url.is_empty() || self.is_on_site(url) {
                continue;
            }
            let media = self.upload_image_from_url(url).await;
            match media.media_url {
                Some(new_url) if media.success && !new_url.is_empty() => {
                    content = content.replace(url.as_str(), &new_url);
                }
                _ => tracing::warn!(
                    url = %url,
                    error = media.error.as_deref().unwrap_or_default(),
                    "content image not re-hosted"
                ),
            }
        }
        content
    }

    /// Same host and port as the site.
    fn is_on_site(&self, url: &str) -> bool {
        let (Ok(site), Ok(candidate)) = (Url::parse(&self.site_url), Url::parse(url)) else {
            return false;
        };
        site.host_str() == candidate.host_str()
            && site.port_or_known_default() == candidate.port_or_known_default()
    }

    /// Download an image and upload it to the media library.
    pub async fn upload_image_from_url(&self, image_url: &str) -> MediaResult {
        match self.try_upload_from_url(image_url).await {
            Ok(media) => media_success(media),
            Err(e) => {
                tracing::warn!(url = %image_url, error = %e, "image upload from URL failed");
                media_failure(&e)
            }
        }
    }

    async fn try_upload_from_url(&self, image_url: &str) -> Result<MediaResponse, PublisherError> {
        let response = self
            .client
            .get(image_url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_IMAGE_TYPE)
            .to_string();
        let filename = filename_from_url(image_url);
        let bytes = response.bytes().await?;

        self.upload_media(&filename, &content_type, bytes, DOWNLOAD_TIMEOUT)
            .await
    }

    /// Upload a local image file, then set its alt text when given.
    ///
    /// A failed alt-text update is logged; the upload still counts as a
    /// success.
    pub async fn upload_file(&self, path: &Path, alt_text: &str) -> MediaResult {
        let media = match self.try_upload_file(path).await {
            Ok(media) => media,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "file upload failed");
                return media_failure(&e);
            }
        };

        if !alt_text.is_empty() {
            let request = self
                .request(Method::POST, &format!("media/{}", media.id))
                .timeout(FILE_UPLOAD_TIMEOUT)
                .json(&json!({ "alt_text": alt_text }));
            if let Err(e) = send_json::<Value>(request).await {
                tracing::warn!(media_id = media.id, error = %e, "failed to set image alt text");
            }
        }

        media_success(media)
    }

    async fn try_upload_file(&self, path: &Path) -> Result<MediaResponse, PublisherError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| PublisherError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let content_type = content_type_for(&filename);

        self.upload_media(&filename, content_type, bytes, FILE_UPLOAD_TIMEOUT)
            .await
    }

    async fn upload_media(
        &self,
        filename: &str,
        content_type: &str,
        body: impl Into<reqwest::Body>,
        timeout: Duration,
    ) -> Result<MediaResponse, PublisherError> {
        let request = self
            .request(Method::POST, "media")
            .timeout(timeout)
            .header(CONTENT_DISPOSITION, content_disposition(filename))
            .header(CONTENT_TYPE, content_type)
            .body(body);
        send_json(request).await
    }

    pub async fn get_categories(&self) -> Vec<Term> {
        self.list_terms("categories").await
    }

    pub async fn get_tags(&self) -> Vec<Term> {
        self.list_terms("tags").await
    }

    async fn list_terms(&self, taxonomy: &str) -> Vec<Term> {
        let request = self
            .request(Method::GET, taxonomy)
            .timeout(LOOKUP_TIMEOUT)
            .query(&[("per_page", TERMS_PER_PAGE)]);
        match send_json(request).await {
            Ok(terms) => terms,
            Err(e) => {
                tracing::warn!(taxonomy, error = %e, "failed to list terms");
                Vec::new()
            }
        }
    }

    /// Create a category. A missing slug is derived from the name.
    pub async fn create_category(&self, name: &str, slug: Option<&str>, parent: u64) -> TermResult {
        let body = json!({
            "name": name,
            "slug": term_slug(name, slug),
            "parent": parent,
        });
        self.create_term("categories", &body).await
    }

    /// Create a tag. A missing slug is derived from the name.
    pub async fn create_tag(&self, name: &str, slug: Option<&str>) -> TermResult {
        let body = json!({
            "name": name,
            "slug": term_slug(name, slug),
        });
        self.create_term("tags", &body).await
    }

    async fn create_term(&self, taxonomy: &str, body: &Value) -> TermResult {
        let request = self
            .request(Method::POST, taxonomy)
            .timeout(LOOKUP_TIMEOUT)
            .json(body);
        match send_json::<CreatedTerm>(request).await {
            Ok(term) => TermResult {
                success: true,
                term_id: Some(term.id),
                error: None,
            },
            Err(e) => {
                tracing::warn!(taxonomy, error = %e, "failed to create term");
                TermResult {
                    error: Some(e.to_string()),
                    ..TermResult::default()
                }
            }
        }
    }

    /// The post with this slug, if one exists. Lookup failures are logged
    /// and reported as `None`.
    pub async fn get_post_by_slug(&self, slug: &str) -> Option<WpPost> {
        let request = self
            .request(Method::GET, "posts")
            .timeout(LOOKUP_TIMEOUT)
            .query(&[("slug", slug)]);
        match send_json::<Vec<WpPost>>(request).await {
            Ok(posts) => posts.into_iter().next(),
            Err(e) => {
                tracing::warn!(slug = %slug, error = %e, "post lookup failed");
                None
            }
        }
    }

    /// Update arbitrary fields of an existing post.
    pub async fn update_post(&self, post_id: u64, fields: &Map<String, Value>) -> PublishResult {
        let request = self
            .request(Method::POST, &format!("posts/{post_id}"))
            .timeout(UPDATE_TIMEOUT)
            .json(fields);
        match send_json::<WpPost>(request).await {
            Ok(post) => {
                tracing::info!(site = %self.site_url, post_id, "post updated");
                PublishResult {
                    success: true,
                    post_id: Some(post.id),
                    post_url: Some(post.link),
                    edit_url: Some(self.edit_url(post.id)),
                    status: Some(post.status).filter(|s| !s.is_empty()),
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(site = %self.site_url, post_id, error = %e, "failed to update post");
                PublishResult::failed(&e)
            }
        }
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, PublisherError> {
    let response = request.send().await?;
    ensure_success(response).await?.json().await.map_err(Into::into)
}

async fn ensure_success(response: Response) -> Result<Response, PublisherError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PublisherError::UnexpectedStatus {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}

fn media_success(media: MediaResponse) -> MediaResult {
    MediaResult {
        success: true,
        media_id: Some(media.id),
        media_url: Some(media.source_url),
        error: None,
    }
}

fn media_failure(error: &PublisherError) -> MediaResult {
    MediaResult {
        error: Some(error.to_string()),
        ..MediaResult::default()
    }
}

fn term_slug(name: &str, slug: Option<&str>) -> String {
    slug.filter(|s| !s.is_empty())
        .map_or_else(|| slugify(name), str::to_string)
}

/// Last path segment of `url`, or a generic name when there is none.
fn filename_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// RFC 5987 `attr-char`s outside of alphanumerics.
const FILENAME_ATTR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `Content-Disposition` for a media upload.
///
/// The quoted `filename` is always plain ASCII with quotes, backslashes and
/// other characters replaced by `_`. Names that needed replacing also carry
/// the exact UTF-8 name as `filename*`.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == filename {
        format!("attachment; filename=\"{filename}\"")
    } else {
        let encoded = utf8_percent_encode(filename, FILENAME_ATTR);
        format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
    }
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => DEFAULT_IMAGE_TYPE,
    }
}
