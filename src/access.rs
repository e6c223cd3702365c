//! The authorization gate shared by every mutating and history operation.
//!
//! Resources describe their relationships to users through [`Protected`];
//! [`AccessGate::check`] owns every rule, so handlers and services never
//! repeat ownership conditionals inline.

use crate::identity::domain::{User, UserId};
use std::fmt;
use thiserror::Error;

/// The identity acting on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    id: UserId,
    is_admin: bool,
}

impl Actor {
    /// Creates an actor from raw parts.
    #[must_use]
    pub const fn new(id: UserId, is_admin: bool) -> Self {
        Self { id, is_admin }
    }

    /// Returns the actor's user identifier.
    #[must_use]
    pub const fn id(self) -> UserId {
        self.id
    }

    /// Returns whether the actor holds the admin flag.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        self.is_admin
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id(), user.is_admin())
    }
}

/// Access level requested on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Fetch or list; open to everyone.
    Read,
    /// Update fields, delete or change status.
    Mutate,
    /// Read the status history audit trail.
    ViewHistory,
    /// Catalogue administration (themes).
    Administer,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Read => "read",
            Self::Mutate => "mutate",
            Self::ViewHistory => "view history of",
            Self::Administer => "administer",
        };
        f.write_str(label)
    }
}

/// Relationship facts a resource exposes to the gate.
pub trait Protected {
    /// The user owning the resource for mutation purposes, if any.
    fn creator(&self) -> Option<UserId>;

    /// The user the resource is assigned to, if any.
    fn assignee(&self) -> Option<UserId> {
        None
    }
}

/// Denial returned by [`AccessGate::check`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("not allowed to {access} this resource")]
pub struct AccessDenied {
    /// The access level that was refused.
    pub access: Access,
}

/// Stateless authorization gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGate;

impl AccessGate {
    /// Decides whether `actor` may perform `access` on `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] when the rules for `access` are not met.
    /// Anonymous callers (`None`) may only read.
    pub fn check(
        actor: Option<Actor>,
        resource: &impl Protected,
        access: Access,
    ) -> Result<(), AccessDenied> {
        if Self::permits(actor, resource, access) {
            Ok(())
        } else {
            Err(AccessDenied { access })
        }
    }

    /// Returns whether the rules for `access` are met.
    #[must_use]
    pub fn permits(actor: Option<Actor>, resource: &impl Protected, access: Access) -> bool {
        if access == Access::Read {
            return true;
        }
        let Some(acting) = actor else {
            return false;
        };
        if acting.is_admin() {
            return true;
        }

        let is_creator = resource.creator() == Some(acting.id());
        match access {
            Access::Read => true,
            Access::Mutate => is_creator,
            Access::ViewHistory => is_creator || resource.assignee() == Some(acting.id()),
            Access::Administer => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Access, AccessGate, Actor, Protected};
    use crate::identity::domain::UserId;
    use rstest::rstest;

    struct Resource {
        creator: UserId,
        assignee: Option<UserId>,
    }

    impl Protected for Resource {
        fn creator(&self) -> Option<UserId> {
            Some(self.creator)
        }

        fn assignee(&self) -> Option<UserId> {
            self.assignee
        }
    }

    #[derive(Clone, Copy)]
    enum Who {
        Anonymous,
        Creator,
        Assignee,
        Stranger,
        Admin,
    }

    #[rstest]
    #[case(Who::Anonymous, Access::Read, true)]
    #[case(Who::Anonymous, Access::Mutate, false)]
    #[case(Who::Anonymous, Access::ViewHistory, false)]
    #[case(Who::Creator, Access::Mutate, true)]
    #[case(Who::Creator, Access::ViewHistory, true)]
    #[case(Who::Creator, Access::Administer, false)]
    #[case(Who::Assignee, Access::Read, true)]
    #[case(Who::Assignee, Access::Mutate, false)]
    #[case(Who::Assignee, Access::ViewHistory, true)]
    #[case(Who::Stranger, Access::Mutate, false)]
    #[case(Who::Stranger, Access::ViewHistory, false)]
    #[case(Who::Admin, Access::Mutate, true)]
    #[case(Who::Admin, Access::ViewHistory, true)]
    #[case(Who::Admin, Access::Administer, true)]
    fn gate_rules(#[case] who: Who, #[case] access: Access, #[case] expected: bool) {
        let creator = UserId::new();
        let assignee = UserId::new();
        let resource = Resource {
            creator,
            assignee: Some(assignee),
        };
        let actor = match who {
            Who::Anonymous => None,
            Who::Creator => Some(Actor::new(creator, false)),
            Who::Assignee => Some(Actor::new(assignee, false)),
            Who::Stranger => Some(Actor::new(UserId::new(), false)),
            Who::Admin => Some(Actor::new(UserId::new(), true)),
        };

        assert_eq!(AccessGate::permits(actor, &resource, access), expected);
        assert_eq!(
            AccessGate::check(actor, &resource, access).is_ok(),
            expected
        );
    }
}
