//! Enrollment Coordinator
//! Mission: Keep the user/category many-to-many relation consistent

use crate::auth::{models::User, user_store::UserStore};
use crate::catalog::{category_store::CategoryStore, models::Category};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Outcome of an enrollment attempt.
#[derive(Debug)]
pub enum EnrollmentOutcome {
    /// One or both sides were added; carries the refreshed records.
    Enrolled { user: User, category: Category },
    /// Both sides already held the link; nothing was mutated.
    AlreadyEnrolled,
}

/// Enrollment failures.
#[derive(Debug)]
pub enum EnrollError {
    /// User or category id does not reference an existing entity.
    NotFound,
    /// The post-write consistency check found the two sides disagreeing.
    Inconsistent(String),
    /// Underlying store failure.
    Store(anyhow::Error),
}

impl From<anyhow::Error> for EnrollError {
    fn from(err: anyhow::Error) -> Self {
        EnrollError::Store(err)
    }
}

/// Maintains the bidirectional user/category relation.
///
/// The relation is duplicated on both records (user.categories and
/// category.users); the store cannot update the two atomically, so this
/// coordinator is the only writer of either list and verifies the
/// post-write state instead.
pub struct EnrollmentCoordinator {
    users: Arc<UserStore>,
    categories: Arc<CategoryStore>,
}

impl EnrollmentCoordinator {
    pub fn new(users: Arc<UserStore>, categories: Arc<CategoryStore>) -> Self {
        Self { users, categories }
    }

    /// Enroll a user into a category, idempotently.
    ///
    /// Adds only the missing side(s), so a half-written link left behind by
    /// an earlier partial failure is repaired rather than duplicated. After
    /// writing, both records are re-read and the invariant re-checked; a
    /// mismatch surfaces as `Inconsistent` instead of silently returning a
    /// half-linked pair.
    pub fn enroll(
        &self,
        user_id: &Uuid,
        category_id: &Uuid,
    ) -> Result<EnrollmentOutcome, EnrollError> {
        let user = self.users.get_by_id(user_id)?;
        let category = self.categories.get_by_id(category_id)?;

        let (Some(mut user), Some(mut category)) = (user, category) else {
            return Err(EnrollError::NotFound);
        };

        let user_has_category = user.categories.contains(category_id);
        let category_has_user = category.users.contains(user_id);

        if user_has_category && category_has_user {
            return Ok(EnrollmentOutcome::AlreadyEnrolled);
        }

        if user_has_category != category_has_user {
            warn!(
                "Repairing half-linked enrollment: user={} category={}",
                user_id, category_id
            );
        }

        if !user_has_category {
            user.categories.push(*category_id);
            self.users.set_categories(user_id, &user.categories)?;
        }
        if !category_has_user {
            category.users.push(*user_id);
            self.categories.set_users(category_id, &category.users)?;
        }

        // Post-write verification: re-read both sides and require the
        // invariant to hold before reporting success.
        let user = self
            .users
            .get_by_id(user_id)?
            .ok_or_else(|| EnrollError::Inconsistent(format!("user {} vanished", user_id)))?;
        let category = self.categories.get_by_id(category_id)?.ok_or_else(|| {
            EnrollError::Inconsistent(format!("category {} vanished", category_id))
        })?;

        if !user.categories.contains(category_id) || !category.users.contains(user_id) {
            return Err(EnrollError::Inconsistent(format!(
                "enrollment user={} category={} is half-linked after write",
                user_id, category_id
            )));
        }

        info!(
            "Enrolled user {} into category {}",
            user.username, category.title
        );

        Ok(EnrollmentOutcome::Enrolled { user, category })
    }
}
