//! User lookup, public profiles and the follow graph.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    FollowCommand, FollowRepository, PostRepository, USER_SEARCH_LIMIT, UserRepository,
    UsersQuery,
};
use crate::domain::service_support::{
    map_follow_error, map_post_error, map_user_error, require_user,
};
use crate::domain::{
    Error, Follow, FollowEntry, FollowOutcome, User, UserId, UserProfile, UserSummary,
};

/// Social graph service implementing [`UsersQuery`] and [`FollowCommand`].
#[derive(Clone)]
pub struct SocialService<U, F, P> {
    users: Arc<U>,
    follows: Arc<F>,
    posts: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<U, F, P> SocialService<U, F, P> {
    pub fn new(users: Arc<U>, follows: Arc<F>, posts: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            follows,
            posts,
            clock,
        }
    }
}

impl<U, F, P> SocialService<U, F, P>
where
    U: UserRepository,
{
    /// Join follow edges with the users on the `pick` side, keeping edge
    /// order. Edges whose user has gone are skipped.
    async fn entries_for(
        &self,
        edges: Vec<Follow>,
        pick: fn(&Follow) -> &UserId,
    ) -> Result<Vec<FollowEntry>, Error> {
        let ids: Vec<UserId> = edges.iter().map(|edge| pick(edge).clone()).collect();
        let users: HashMap<UserId, User> = self
            .users
            .find_many(&ids)
            .await
            .map_err(map_user_error)?
            .into_iter()
            .map(|user| (user.id().clone(), user))
            .collect();

        Ok(edges
            .iter()
            .filter_map(|edge| {
                users.get(pick(edge)).map(|user| FollowEntry {
                    user: user.summary(),
                    followed_at: edge.created_at,
                })
            })
            .collect())
    }
}

#[async_trait]
impl<U, F, P> UsersQuery for SocialService<U, F, P>
where
    U: UserRepository,
    F: FollowRepository,
    P: PostRepository,
{
    async fn current_user(&self, user: &UserId) -> Result<User, Error> {
        require_user(self.users.as_ref(), user).await
    }

    async fn search(&self, requester: &UserId, query: &str) -> Result<Vec<UserSummary>, Error> {
        let needle = query.trim();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let found = self
            .users
            .search(needle, requester, USER_SEARCH_LIMIT)
            .await
            .map_err(map_user_error)?;
        Ok(found.iter().map(User::summary).collect())
    }

    async fn profile(&self, user: &UserId) -> Result<UserProfile, Error> {
        let found = require_user(self.users.as_ref(), user).await?;
        let follows = self.follows.counts(user).await.map_err(map_follow_error)?;
        let stats = self
            .posts
            .author_stats(user)
            .await
            .map_err(map_post_error)?;
        Ok(UserProfile::assemble(found.summary(), follows, stats))
    }

    async fn followers(&self, user: &UserId) -> Result<Vec<FollowEntry>, Error> {
        require_user(self.users.as_ref(), user).await?;
        let edges = self
            .follows
            .followers_of(user)
            .await
            .map_err(map_follow_error)?;
        self.entries_for(edges, |edge| &edge.follower).await
    }

    async fn following(&self, user: &UserId) -> Result<Vec<FollowEntry>, Error> {
        require_user(self.users.as_ref(), user).await?;
        let edges = self
            .follows
            .followed_by(user)
            .await
            .map_err(map_follow_error)?;
        self.entries_for(edges, |edge| &edge.followee).await
    }
}

#[async_trait]
impl<U, F, P> FollowCommand for SocialService<U, F, P>
where
    U: UserRepository,
    F: FollowRepository,
    P: PostRepository,
{
    async fn toggle_follow(
        &self,
        follower: &UserId,
        target: &UserId,
    ) -> Result<FollowOutcome, Error> {
        if follower == target {
            return Err(Error::invalid_request("you cannot follow yourself"));
        }
        require_user(self.users.as_ref(), target).await?;

        let already = self
            .follows
            .exists(follower, target)
            .await
            .map_err(map_follow_error)?;
        if already {
            self.follows
                .remove(follower, target)
                .await
                .map_err(map_follow_error)?;
        } else {
            let edge = Follow {
                follower: follower.clone(),
                followee: target.clone(),
                created_at: self.clock.utc(),
            };
            self.follows.insert(&edge).await.map_err(map_follow_error)?;
        }

        let counts = self
            .follows
            .counts(target)
            .await
            .map_err(map_follow_error)?;
        debug!(%follower, %target, following = !already, "follow toggled");
        Ok(FollowOutcome {
            is_following: !already,
            follower_count: counts.followers,
        })
    }
}
