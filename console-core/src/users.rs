//! User management mutations (local, optimistic).

use uuid::Uuid;

use crate::commands::Command;
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::User;

/// Champs saisis dans le formulaire utilisateur
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: String,
}

impl UserDraft {
    fn validate(&self) -> ConsoleResult<()> {
        if self.username.trim().is_empty() {
            return Err(ConsoleError::InvalidValue("username is required".into()));
        }
        if !self.email.contains('@') {
            return Err(ConsoleError::InvalidValue(format!("'{}' is not an email address", self.email)));
        }
        Ok(())
    }

    fn into_user(self, id: String) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            role: self.role,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Add(UserDraft),
    Edit { id: String, draft: UserDraft },
    Delete { id: String },
}

impl Command<Vec<User>> for UserCommand {
    fn apply(&self, users: &mut Vec<User>) -> ConsoleResult<String> {
        match self {
            UserCommand::Add(draft) => {
                draft.validate()?;
                users.push(draft.clone().into_user(Uuid::new_v4().to_string()));
                Ok(format!("User {} created", draft.username))
            }
            UserCommand::Edit { id, draft } => {
                draft.validate()?;
                let user = users
                    .iter_mut()
                    .find(|u| &u.id == id)
                    .ok_or_else(|| ConsoleError::NotFound(format!("user {}", id)))?;
                *user = draft.clone().into_user(id.clone());
                Ok(format!("User {} updated", draft.username))
            }
            UserCommand::Delete { id } => {
                let index = users
                    .iter()
                    .position(|u| &u.id == id)
                    .ok_or_else(|| ConsoleError::NotFound(format!("user {}", id)))?;
                let removed = users.remove(index);
                Ok(format!("User {} deleted", removed.username))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::run_local;
    use crate::fixtures::mock_users;

    fn draft(name: &str) -> UserDraft {
        UserDraft {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            role: "user".to_string(),
            status: "active".to_string(),
        }
    }

    #[test]
    fn test_add_assigns_fresh_id() {
        let mut users = mock_users();
        let notice = run_local(&mut users, &UserCommand::Add(draft("alice")));
        assert_eq!(notice.message, "User alice created");
        assert_eq!(users.len(), 4);
        let added = &users[3];
        assert!(Uuid::parse_str(&added.id).is_ok());
    }

    #[test]
    fn test_edit_keeps_id() {
        let mut users = mock_users();
        let notice = run_local(
            &mut users,
            &UserCommand::Edit {
                id: "2".into(),
                draft: draft("bob"),
            },
        );
        assert!(notice.is_success());
        assert_eq!(users[1].id, "2");
        assert_eq!(users[1].username, "bob");
    }

    #[test]
    fn test_delete_unknown_user() {
        let mut users = mock_users();
        let notice = run_local(&mut users, &UserCommand::Delete { id: "42".into() });
        assert_eq!(notice.message, "Not found: user 42");
        assert_eq!(users.len(), 3);

        run_local(&mut users, &UserCommand::Delete { id: "1".into() });
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.id != "1"));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut users = mock_users();
        let mut bad = draft("carol");
        bad.email = "carol".into();
        assert!(!run_local(&mut users, &UserCommand::Add(bad)).is_success());
        assert_eq!(users.len(), 3);
    }
}
