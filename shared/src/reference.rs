//! Helpers for the application-wide reference data cache.

use crate::models::{Role, User};

/// Technicians are the users whose role is `technician`; no extra request.
pub fn technicians_from_users(users: &[User]) -> Vec<User> {
    users
        .iter()
        .filter(|u| u.role == Role::Technician)
        .cloned()
        .collect()
}

/// The cache is loading while any of its sources is.
pub fn any_loading(flags: &[bool]) -> bool {
    flags.iter().any(|loading| *loading)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            username: format!("user{id}"),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            role,
            sections: vec![],
        }
    }

    #[test]
    fn test_technicians_filtered_by_role() {
        let users = vec![
            user(1, Role::Admin),
            user(2, Role::Technician),
            user(3, Role::User),
            user(4, Role::Technician),
        ];
        let ids: Vec<i64> = technicians_from_users(&users).iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_any_loading() {
        assert!(!any_loading(&[false, false, false, false]));
        assert!(any_loading(&[false, true, false, false]));
        assert!(!any_loading(&[]));
    }
}
