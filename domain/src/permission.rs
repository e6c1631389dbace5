//! Named permissions and how organization roles grant them.
use crate::{roles::Role, users, Id};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    UserCreate,
    UserUpdate,
    UserRead,
    UserList,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::UserCreate,
        Permission::UserUpdate,
        Permission::UserRead,
        Permission::UserList,
    ];

    pub fn codename(&self) -> &'static str {
        match self {
            Permission::UserCreate => "profiles.profile_user_create",
            Permission::UserUpdate => "profiles.profile_user_update",
            Permission::UserRead => "profiles.profile_user_read",
            Permission::UserList => "profiles.profile_user_list",
        }
    }

    /// Whether holding `role` in an organization grants this permission there.
    pub fn granted_to(&self, role: Role) -> bool {
        match role {
            Role::Admin => true,
            Role::Editor => matches!(self, Permission::UserRead | Permission::UserList),
            Role::Viewer => matches!(self, Permission::UserList),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codename())
    }
}

/// Resolves `permission` for `user` within the organization context.
///
/// Superusers hold every permission. Everybody else needs an organization context
/// and a role in it that grants the permission.
pub fn has_org_perm(
    user: &users::Model,
    organization_id: Option<Id>,
    permission: Permission,
) -> bool {
    if user.is_superuser {
        return true;
    }

    match organization_id {
        Some(organization_id) => {
            roles_in(user, organization_id).any(|role| permission.granted_to(role))
        }
        None => false,
    }
}

/// Whether `user` holds any role in `organization_id`.
pub fn is_member(user: &users::Model, organization_id: Id) -> bool {
    roles_in(user, organization_id).next().is_some()
}

/// Whether `user` is an admin of `organization_id`. Only looks at `user.roles`.
pub fn is_admin_for(user: &users::Model, organization_id: Id) -> bool {
    roles_in(user, organization_id).any(|role| role == Role::Admin)
}

fn roles_in(user: &users::Model, organization_id: Id) -> impl Iterator<Item = Role> + '_ {
    user.roles
        .iter()
        .filter(move |user_role| user_role.organization_id == organization_id)
        .map(|user_role| user_role.role)
}
