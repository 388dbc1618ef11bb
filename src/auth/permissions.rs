//! Permission-list authorization
//!
//! Each annotation may carry `permissions: {action: [ids...]}`. An entry is
//! either a user id or one of the group tokens below. An action with no
//! entries is open to everyone.

use super::{Action, Authorizer, Identity};
use crate::annotations::Annotation;

/// Anyone, including anonymous callers
pub const GROUP_WORLD: &str = "group:__world__";

/// Any authenticated caller
pub const GROUP_AUTHENTICATED: &str = "group:__authenticated__";

/// Any caller from the annotation's own consumer
pub const GROUP_CONSUMER: &str = "group:__consumer__";

#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionsAuthorizer;

impl PermissionsAuthorizer {
    pub fn new() -> Self {
        Self
    }
}

impl Authorizer for PermissionsAuthorizer {
    fn authorize(
        &self,
        annotation: &Annotation,
        action: Action,
        identity: Option<&Identity>,
    ) -> bool {
        let permitted = annotation.permitted(action.as_str());

        if permitted.is_empty() || permitted.contains(&GROUP_WORLD) {
            return true;
        }

        let Some(user) = identity else {
            return false;
        };

        if permitted.contains(&GROUP_AUTHENTICATED) {
            return true;
        }

        // Nothing below crosses consumers, admins included
        if annotation.consumer() != Some(user.consumer.key.as_str()) {
            return false;
        }

        user.is_admin
            || permitted.contains(&GROUP_CONSUMER)
            || permitted.contains(&user.id.as_str())
    }
}
