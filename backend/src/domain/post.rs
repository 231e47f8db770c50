//! Posts and the likes, comments and views they own.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{UserId, Username};

/// Maximum post text length, in characters.
pub const POST_CONTENT_MAX: usize = 5000;
/// Maximum comment length, in characters.
pub const COMMENT_TEXT_MAX: usize = 1000;
/// Maximum image URL length, in characters.
pub const IMAGE_URL_MAX: usize = 2048;

/// Validation failures for post and comment payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    EmptyPost,
    ContentTooLong { max: usize },
    ImageUrlTooLong { max: usize },
    EmptyComment,
    CommentTooLong { max: usize },
    UnknownGenre { value: String },
}

impl PostValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyPost | Self::ContentTooLong { .. } => "content",
            Self::ImageUrlTooLong { .. } => "imageUrl",
            Self::EmptyComment | Self::CommentTooLong { .. } => "text",
            Self::UnknownGenre { .. } => "genre",
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyPost => "content_or_image_required",
            Self::EmptyComment => "missing_field",
            Self::ContentTooLong { .. }
            | Self::ImageUrlTooLong { .. }
            | Self::CommentTooLong { .. } => "too_long",
            Self::UnknownGenre { .. } => "unknown_genre",
        }
    }
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPost => write!(f, "post must contain either text content or an image"),
            Self::ContentTooLong { max } => {
                write!(f, "post content cannot exceed {max} characters")
            }
            Self::ImageUrlTooLong { max } => write!(f, "image URL cannot exceed {max} characters"),
            Self::EmptyComment => write!(f, "comment text must not be empty"),
            Self::CommentTooLong { max } => write!(f, "comment cannot exceed {max} characters"),
            Self::UnknownGenre { value } => write!(f, "unknown genre: {value}"),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Stable post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(Uuid);

impl PostId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stable comment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId(Uuid);

impl CommentId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Topic a post is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Genre {
    Technology,
    Sports,
    Music,
    Art,
    Food,
    Travel,
    Gaming,
    Fashion,
    Business,
    Health,
    #[default]
    Other,
}

impl Genre {
    /// Every genre in display order.
    pub const ALL: [Self; 11] = [
        Self::Technology,
        Self::Sports,
        Self::Music,
        Self::Art,
        Self::Food,
        Self::Travel,
        Self::Gaming,
        Self::Fashion,
        Self::Business,
        Self::Health,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Sports => "Sports",
            Self::Music => "Music",
            Self::Art => "Art",
            Self::Food => "Food",
            Self::Travel => "Travel",
            Self::Gaming => "Gaming",
            Self::Fashion => "Fashion",
            Self::Business => "Business",
            Self::Health => "Health",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = PostValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|genre| genre.as_str() == s)
            .ok_or_else(|| PostValidationError::UnknownGenre {
                value: s.to_owned(),
            })
    }
}

/// Validated body of a new post: text, an image, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    content: Option<String>,
    image_url: Option<String>,
    is_promotion: bool,
    genre: Genre,
}

impl PostDraft {
    /// Validate raw post fields. Blank text and blank URLs count as absent.
    pub fn new(
        content: Option<&str>,
        image_url: Option<&str>,
        is_promotion: bool,
        genre: Genre,
    ) -> Result<Self, PostValidationError> {
        let content = content.map(str::trim).filter(|text| !text.is_empty());
        let image_url = image_url.map(str::trim).filter(|url| !url.is_empty());

        if content.is_none() && image_url.is_none() {
            return Err(PostValidationError::EmptyPost);
        }
        if content.is_some_and(|text| text.chars().count() > POST_CONTENT_MAX) {
            return Err(PostValidationError::ContentTooLong {
                max: POST_CONTENT_MAX,
            });
        }
        if image_url.is_some_and(|url| url.chars().count() > IMAGE_URL_MAX) {
            return Err(PostValidationError::ImageUrlTooLong { max: IMAGE_URL_MAX });
        }

        Ok(Self {
            content: content.map(str::to_owned),
            image_url: image_url.map(str::to_owned),
            is_promotion,
            genre,
        })
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn is_promotion(&self) -> bool {
        self.is_promotion
    }

    pub fn genre(&self) -> Genre {
        self.genre
    }
}

/// Trimmed, non-empty comment text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    pub fn new(text: impl AsRef<str>) -> Result<Self, PostValidationError> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(PostValidationError::EmptyComment);
        }
        if text.chars().count() > COMMENT_TEXT_MAX {
            return Err(PostValidationError::CommentTooLong {
                max: COMMENT_TEXT_MAX,
            });
        }
        Ok(Self(text.to_owned()))
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Like {
    pub user_id: UserId,
    pub username: Username,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub username: Username,
    pub text: CommentText,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub user_id: UserId,
    pub viewed_at: DateTime<Utc>,
}

/// A published post with its owned child collections.
///
/// ## Invariants
/// - At least one of `content` and `image_url` is present.
/// - `likes` and `viewers` hold at most one entry per user.
/// - Child collections are kept in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub author_username: Username,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub is_promotion: bool,
    pub genre: Genre,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub viewers: Vec<PostView>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Publish a draft as a new post with empty child collections.
    pub fn publish(
        id: PostId,
        author_id: UserId,
        author_username: Username,
        draft: PostDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        let PostDraft {
            content,
            image_url,
            is_promotion,
            genre,
        } = draft;
        Self {
            id,
            author_id,
            author_username,
            content,
            image_url,
            is_promotion,
            genre,
            likes: Vec::new(),
            comments: Vec::new(),
            viewers: Vec::new(),
            created_at,
        }
    }

    /// Unique viewer count.
    pub fn views(&self) -> usize {
        self.viewers.len()
    }

    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.iter().any(|like| &like.user_id == user)
    }

    pub fn has_been_viewed_by(&self, user: &UserId) -> bool {
        self.viewers.iter().any(|view| &view.user_id == user)
    }

    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|comment| &comment.id == id)
    }
}

/// Feed filters. `None` leaves the dimension unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub author: Option<UserId>,
    pub is_promotion: Option<bool>,
    pub genre: Option<Genre>,
}

impl PostFilter {
    /// Posts written by `author`.
    pub fn by_author(author: UserId) -> Self {
        Self {
            author: Some(author),
            ..Self::default()
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.author.as_ref().is_none_or(|author| &post.author_id == author)
            && self.is_promotion.is_none_or(|flag| post.is_promotion == flag)
            && self.genre.is_none_or(|genre| post.genre == genre)
    }
}

/// Engagement totals across everything a user has posted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorStats {
    pub post_count: u64,
    pub total_likes: u64,
    pub total_views: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn author() -> UserId {
        UserId::new("11111111-1111-1111-1111-111111111111").expect("fixture id")
    }

    fn post_by(author: &UserId, genre: Genre, is_promotion: bool) -> Post {
        Post::publish(
            PostId::random(),
            author.clone(),
            Username::new("author").expect("fixture username"),
            PostDraft::new(Some("hello"), None, is_promotion, genre).expect("valid draft"),
            Utc.timestamp_opt(1, 0).single().expect("timestamp"),
        )
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("   "), None)]
    #[case(None, Some(""))]
    #[case(Some(""), Some("  "))]
    fn draft_requires_text_or_image(#[case] content: Option<&str>, #[case] image: Option<&str>) {
        assert_eq!(
            PostDraft::new(content, image, false, Genre::Other),
            Err(PostValidationError::EmptyPost)
        );
    }

    #[rstest]
    fn draft_accepts_image_only_posts() {
        let draft = PostDraft::new(None, Some(" https://img.example/cat.png "), true, Genre::Art)
            .expect("image-only draft");
        assert_eq!(draft.content(), None);
        assert_eq!(draft.image_url(), Some("https://img.example/cat.png"));
        assert!(draft.is_promotion());
        assert_eq!(draft.genre(), Genre::Art);
    }

    #[rstest]
    fn draft_rejects_overlong_content() {
        let text = "x".repeat(POST_CONTENT_MAX + 1);
        assert_eq!(
            PostDraft::new(Some(&text), None, false, Genre::Other),
            Err(PostValidationError::ContentTooLong {
                max: POST_CONTENT_MAX
            })
        );
    }

    #[rstest]
    #[case("", PostValidationError::EmptyComment)]
    #[case("  ", PostValidationError::EmptyComment)]
    fn comment_text_rejects_blank_input(#[case] raw: &str, #[case] expected: PostValidationError) {
        assert_eq!(CommentText::new(raw), Err(expected));
    }

    #[rstest]
    fn comment_text_is_capped() {
        let raw = "c".repeat(COMMENT_TEXT_MAX + 1);
        assert_eq!(
            CommentText::new(raw),
            Err(PostValidationError::CommentTooLong {
                max: COMMENT_TEXT_MAX
            })
        );
    }

    #[rstest]
    fn genre_round_trips_through_its_name() {
        for genre in Genre::ALL {
            assert_eq!(genre.as_str().parse::<Genre>(), Ok(genre));
        }
        assert!(matches!(
            "technology".parse::<Genre>(),
            Err(PostValidationError::UnknownGenre { .. })
        ));
    }

    #[rstest]
    fn filter_matches_each_dimension(author: UserId) {
        let post = post_by(&author, Genre::Music, true);

        assert!(PostFilter::default().matches(&post));
        assert!(PostFilter::by_author(author.clone()).matches(&post));
        assert!(!PostFilter::by_author(UserId::random()).matches(&post));
        let promo = PostFilter {
            is_promotion: Some(false),
            ..PostFilter::default()
        };
        assert!(!promo.matches(&post));
        let genre = PostFilter {
            genre: Some(Genre::Music),
            ..PostFilter::default()
        };
        assert!(genre.matches(&post));
    }

    #[rstest]
    fn views_count_unique_viewers(author: UserId) {
        let mut post = post_by(&author, Genre::Other, false);
        let viewer = UserId::random();
        post.viewers.push(PostView {
            user_id: viewer.clone(),
            viewed_at: post.created_at,
        });
        assert_eq!(post.views(), 1);
        assert!(post.has_been_viewed_by(&viewer));
        assert!(!post.has_been_viewed_by(&author));
    }
}
