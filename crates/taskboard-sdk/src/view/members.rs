//! Member directory search and user-set helpers

use std::collections::HashSet;
use taskboard_client::{EntityRef, User, WorkspaceMember};

/// Members whose name, email or role contains `query`, ignoring case.
///
/// Members sent as bare ids can only match on role.
pub fn search_members<'a>(members: &'a [WorkspaceMember], query: &str) -> Vec<&'a WorkspaceMember> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return members.iter().collect();
    }

    members
        .iter()
        .filter(|member| {
            let by_user = member.user.populated().map_or(false, |user| {
                user.name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            });
            by_user || member.role.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Drop repeated users, keeping the first occurrence of each id
pub fn dedupe_users(users: &[EntityRef<User>]) -> Vec<EntityRef<User>> {
    let mut seen = HashSet::new();
    users
        .iter()
        .filter(|user| seen.insert(user.id().to_string()))
        .cloned()
        .collect()
}

/// Display name for a user reference
pub fn display_name(user: &EntityRef<User>) -> &str {
    match user {
        EntityRef::Populated(user) => &user.name,
        EntityRef::Id(id) => id,
    }
}
