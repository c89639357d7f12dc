//! # Group Registry
//!
//! Owns group membership. All mutation goes through here; the fanout
//! engine only resolves members.

use courier_store::GroupStore;
use courier_types::{EngineError, Group};
use std::sync::Arc;
use tracing::info;

/// Group membership operations over the injected [`GroupStore`] port.
pub struct GroupRegistry {
    store: Arc<dyn GroupStore>,
}

impl GroupRegistry {
    /// Create a registry over a store handle.
    #[must_use]
    pub fn new(store: Arc<dyn GroupStore>) -> Self {
        Self { store }
    }

    /// Create a group with a deduplicated initial member set.
    ///
    /// Fails with [`EngineError::GroupAlreadyExists`] when the name is
    /// taken.
    pub async fn create_group(
        &self,
        group_name: &str,
        initial_members: Vec<String>,
    ) -> Result<(), EngineError> {
        require_non_empty("group_name", group_name)?;

        if self.store.find_group(group_name).await?.is_some() {
            return Err(EngineError::GroupAlreadyExists {
                group_name: group_name.to_string(),
            });
        }

        let group = Group::new(group_name, initial_members);
        let member_count = group.users.len();
        self.store.insert_group(group).await?;

        info!(group_name, member_count, "Group created");
        Ok(())
    }

    /// Set-insert a member. A no-op when the user is already a member;
    /// fails with [`EngineError::GroupNotFound`] when the group is absent.
    pub async fn add_member(&self, group_name: &str, user: &str) -> Result<(), EngineError> {
        require_non_empty("group_name", group_name)?;
        require_non_empty("user", user)?;

        if !self.store.add_member(group_name, user).await? {
            return Err(EngineError::GroupNotFound {
                group_name: group_name.to_string(),
            });
        }
        Ok(())
    }

    /// Set-remove a member. A no-op when the user is not a member; fails
    /// with [`EngineError::GroupNotFound`] when the group is absent.
    pub async fn remove_member(&self, group_name: &str, user: &str) -> Result<(), EngineError> {
        require_non_empty("group_name", group_name)?;
        require_non_empty("user", user)?;

        if !self.store.remove_member(group_name, user).await? {
            return Err(EngineError::GroupNotFound {
                group_name: group_name.to_string(),
            });
        }
        Ok(())
    }

    /// The member set as an ordered sequence; empty (not an error) when
    /// the group is absent.
    pub async fn get_members(&self, group_name: &str) -> Result<Vec<String>, EngineError> {
        Ok(self
            .store
            .find_group(group_name)
            .await?
            .map(|group| group.users)
            .unwrap_or_default())
    }

    /// Membership resolution for fanout: unlike [`Self::get_members`], an
    /// absent group is an error here, so a group send fails before any
    /// record is written.
    pub async fn resolve(&self, group_name: &str) -> Result<Vec<String>, EngineError> {
        self.store
            .find_group(group_name)
            .await?
            .map(|group| group.users)
            .ok_or_else(|| EngineError::GroupNotFound {
                group_name: group_name.to_string(),
            })
    }
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), EngineError> {
    if value.trim().is_empty() {
        return Err(EngineError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}
