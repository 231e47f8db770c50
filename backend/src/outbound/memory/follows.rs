//! `FollowRepository` over a process-local edge list.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{FollowPersistenceError, FollowRepository};
use crate::domain::{Follow, FollowCounts, UserId};

fn poisoned() -> FollowPersistenceError {
    FollowPersistenceError::query("follow store lock poisoned")
}

#[derive(Default)]
pub struct InMemoryFollowRepository {
    edges: RwLock<Vec<Follow>>,
}

impl InMemoryFollowRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_edge(edge: &Follow, follower: &UserId, followee: &UserId) -> bool {
    &edge.follower == follower && &edge.followee == followee
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn exists(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<bool, FollowPersistenceError> {
        let edges = self.edges.read().map_err(|_| poisoned())?;
        Ok(edges.iter().any(|edge| is_edge(edge, follower, followee)))
    }

    async fn insert(&self, follow: &Follow) -> Result<bool, FollowPersistenceError> {
        let mut edges = self.edges.write().map_err(|_| poisoned())?;
        if edges
            .iter()
            .any(|edge| is_edge(edge, &follow.follower, &follow.followee))
        {
            return Ok(false);
        }
        edges.push(follow.clone());
        Ok(true)
    }

    async fn remove(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<bool, FollowPersistenceError> {
        let mut edges = self.edges.write().map_err(|_| poisoned())?;
        let before = edges.len();
        edges.retain(|edge| !is_edge(edge, follower, followee));
        Ok(edges.len() != before)
    }

    async fn followers_of(&self, user: &UserId) -> Result<Vec<Follow>, FollowPersistenceError> {
        let edges = self.edges.read().map_err(|_| poisoned())?;
        Ok(edges
            .iter()
            .filter(|edge| &edge.followee == user)
            .cloned()
            .collect())
    }

    async fn followed_by(&self, user: &UserId) -> Result<Vec<Follow>, FollowPersistenceError> {
        let edges = self.edges.read().map_err(|_| poisoned())?;
        Ok(edges
            .iter()
            .filter(|edge| &edge.follower == user)
            .cloned()
            .collect())
    }

    async fn counts(&self, user: &UserId) -> Result<FollowCounts, FollowPersistenceError> {
        let edges = self.edges.read().map_err(|_| poisoned())?;
        Ok(edges.iter().fold(FollowCounts::default(), |mut counts, edge| {
            if &edge.followee == user {
                counts.followers += 1;
            }
            if &edge.follower == user {
                counts.following += 1;
            }
            counts
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn edge(follower: &UserId, followee: &UserId) -> Follow {
        Follow {
            follower: follower.clone(),
            followee: followee.clone(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn edges_are_unique_and_counted_both_ways() {
        let (a, b, c) = (UserId::random(), UserId::random(), UserId::random());
        let repo = InMemoryFollowRepository::new();

        assert!(repo.insert(&edge(&a, &b)).await.expect("insert"));
        assert!(!repo.insert(&edge(&a, &b)).await.expect("insert"));
        assert!(repo.insert(&edge(&c, &b)).await.expect("insert"));
        assert!(repo.insert(&edge(&b, &a)).await.expect("insert"));

        let counts = repo.counts(&b).await.expect("counts");
        assert_eq!(
            counts,
            FollowCounts {
                followers: 2,
                following: 1
            }
        );
        assert!(repo.remove(&a, &b).await.expect("remove"));
        assert!(!repo.exists(&a, &b).await.expect("exists"));
        assert_eq!(repo.followers_of(&b).await.expect("list").len(), 1);
    }
}
