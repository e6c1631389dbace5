//! Submitted user data and the rules it has to satisfy.
//!
//! Each operation exposes its own set of [`Field`]s; values sent for fields that
//! are not part of the set are ignored by [`UserForm::clean`].
use crate::{roles::Role, validation::FieldErrors, Id};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const FULL_NAME_MAX_CHARS: usize = 128;
pub const EMAIL_MAX_CHARS: usize = 256;
pub const PASSWORD_MIN_CHARS: usize = 8;

const REQUIRED: &str = "This field is required.";
const PASSWORD_MISMATCH: &str = "Passwords don't match.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    Email,
    Password,
    NewPassword,
    ConfirmPassword,
    ChangePassword,
    Groups,
    IsActive,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::Email => "email",
            Field::Password => "password",
            Field::NewPassword => "new_password",
            Field::ConfirmPassword => "confirm_password",
            Field::ChangePassword => "change_password",
            Field::Groups => "groups",
            Field::IsActive => "is_active",
        }
    }
}

pub fn create_fields(organization_id: Option<Id>) -> Vec<Field> {
    let mut fields = vec![
        Field::FullName,
        Field::Email,
        Field::Password,
        Field::ConfirmPassword,
        Field::ChangePassword,
    ];
    if organization_id.is_some() {
        fields.push(Field::Groups);
    }
    fields
}

pub fn update_fields(organization_id: Option<Id>) -> Vec<Field> {
    let mut fields = vec![
        Field::FullName,
        Field::Email,
        Field::NewPassword,
        Field::ConfirmPassword,
    ];
    if organization_id.is_some() {
        fields.push(Field::Groups);
    }
    fields.push(Field::IsActive);
    fields
}

/// A user flagged to change their password must supply a new one; everybody else
/// may optionally do so.
pub fn self_fields(change_password: bool) -> Vec<Field> {
    vec![
        Field::FullName,
        Field::Email,
        if change_password {
            Field::Password
        } else {
            Field::NewPassword
        },
        Field::ConfirmPassword,
    ]
}

/// Raw user data as submitted by a client.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, ToSchema)]
#[schema(as = domain::user::UserForm)]
pub struct UserForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
    pub change_password: Option<bool>,
    pub groups: Option<Vec<Role>>,
    pub is_active: Option<bool>,
}

/// Values that passed validation. A field outside the operation's field set is
/// always `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CleanedUser {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub new_password: Option<String>,
    pub change_password: Option<bool>,
    pub groups: Option<Vec<Role>>,
    pub is_active: Option<bool>,
}

impl CleanedUser {
    /// The password to store, from whichever password field was filled in.
    pub fn chosen_password(&self) -> Option<&str> {
        self.password.as_deref().or(self.new_password.as_deref())
    }
}

impl UserForm {
    pub fn clean(&self, fields: &[Field]) -> Result<CleanedUser, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut cleaned = CleanedUser::default();

        for field in fields {
            match field {
                Field::FullName => {
                    cleaned.full_name = clean_text(
                        &mut errors,
                        *field,
                        self.full_name.as_deref(),
                        FULL_NAME_MAX_CHARS,
                    )
                }
                Field::Email => {
                    cleaned.email =
                        clean_text(&mut errors, *field, self.email.as_deref(), EMAIL_MAX_CHARS)
                            .and_then(|email| {
                                if EmailAddress::is_valid(&email) {
                                    Some(email)
                                } else {
                                    errors.add(field.name(), "Enter a valid email address.");
                                    None
                                }
                            })
                }
                Field::Password => {
                    cleaned.password =
                        clean_password(&mut errors, *field, self.password.as_deref(), true)
                }
                Field::NewPassword => {
                    cleaned.new_password =
                        clean_password(&mut errors, *field, self.new_password.as_deref(), false)
                }
                Field::ChangePassword => {
                    cleaned.change_password = Some(self.change_password.unwrap_or(false))
                }
                Field::Groups => match &self.groups {
                    Some(groups) if !groups.is_empty() => {
                        let mut groups = groups.clone();
                        groups.dedup();
                        cleaned.groups = Some(groups);
                    }
                    _ => errors.add(field.name(), REQUIRED),
                },
                Field::IsActive => cleaned.is_active = self.is_active,
                // Compared once every password field has been cleaned
                Field::ConfirmPassword => {}
            }
        }

        if fields.contains(&Field::ConfirmPassword) {
            if let Some(password) = cleaned.chosen_password() {
                if self.confirm_password.as_deref().unwrap_or_default() != password {
                    errors.add(Field::ConfirmPassword.name(), PASSWORD_MISMATCH);
                }
            }
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(errors)
        }
    }
}

fn clean_text(
    errors: &mut FieldErrors,
    field: Field,
    value: Option<&str>,
    max_chars: usize,
) -> Option<String> {
    let value = value.map(str::trim).unwrap_or_default();
    let chars = value.chars().count();

    if value.is_empty() {
        errors.add(field.name(), REQUIRED);
        None
    } else if chars > max_chars {
        errors.add(
            field.name(),
            format!("Ensure this value has at most {max_chars} characters (it has {chars})."),
        );
        None
    } else {
        Some(value.to_owned())
    }
}

fn clean_password(
    errors: &mut FieldErrors,
    field: Field,
    value: Option<&str>,
    required: bool,
) -> Option<String> {
    match value.filter(|password| !password.is_empty()) {
        None => {
            if required {
                errors.add(field.name(), REQUIRED);
            }
            None
        }
        Some(password) => {
            let chars = password.chars().count();
            if chars < PASSWORD_MIN_CHARS {
                errors.add(
                    field.name(),
                    format!(
                        "Ensure this value has at least {PASSWORD_MIN_CHARS} characters (it has {chars})."
                    ),
                );
                None
            } else {
                Some(password.to_owned())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_form() -> UserForm {
        UserForm {
            full_name: Some("Casey Worker".to_owned()),
            email: Some("casey@example.com".to_owned()),
            password: Some("s3cretpass".to_owned()),
            confirm_password: Some("s3cretpass".to_owned()),
            groups: Some(vec![Role::Editor]),
            ..Default::default()
        }
    }

    #[test]
    fn create_fields_include_groups_only_with_an_organization() {
        assert!(create_fields(Some(1)).contains(&Field::Groups));
        assert!(!create_fields(None).contains(&Field::Groups));
        assert!(create_fields(None).contains(&Field::ChangePassword));
    }

    #[test]
    fn update_fields_end_with_is_active() {
        assert_eq!(
            update_fields(Some(1)),
            vec![
                Field::FullName,
                Field::Email,
                Field::NewPassword,
                Field::ConfirmPassword,
                Field::Groups,
                Field::IsActive,
            ]
        );
        assert_eq!(update_fields(None).last(), Some(&Field::IsActive));
    }

    #[test]
    fn self_fields_swap_password_fields_on_change_password() {
        assert_eq!(self_fields(true)[2], Field::Password);
        assert_eq!(self_fields(false)[2], Field::NewPassword);
        assert_eq!(self_fields(false).last(), Some(&Field::ConfirmPassword));
    }

    #[test]
    fn clean_accepts_a_complete_create_form() {
        let cleaned = create_form().clean(&create_fields(Some(1))).unwrap();

        assert_eq!(cleaned.full_name.as_deref(), Some("Casey Worker"));
        assert_eq!(cleaned.chosen_password(), Some("s3cretpass"));
        assert_eq!(cleaned.change_password, Some(false));
        assert_eq!(cleaned.groups, Some(vec![Role::Editor]));
    }

    #[test]
    fn clean_reports_mismatched_confirmation_on_confirm_password() {
        let form = UserForm {
            confirm_password: Some("different1".to_owned()),
            ..create_form()
        };

        let errors = form.clean(&create_fields(Some(1))).unwrap_err();

        assert_eq!(
            errors.get("confirm_password"),
            Some(&["Passwords don't match.".to_owned()][..])
        );
        assert!(!errors.contains("password"));
    }

    #[test]
    fn clean_rejects_mismatched_new_password_on_update() {
        let form = UserForm {
            new_password: Some("brandnew99".to_owned()),
            confirm_password: Some("brandnew98".to_owned()),
            ..create_form()
        };

        let errors = form.clean(&update_fields(None)).unwrap_err();

        assert!(errors.contains("confirm_password"));
    }

    #[test]
    fn clean_allows_update_without_new_password() {
        let form = UserForm {
            password: None,
            confirm_password: None,
            is_active: Some(false),
            ..create_form()
        };

        let cleaned = form.clean(&update_fields(None)).unwrap();

        assert_eq!(cleaned.chosen_password(), None);
        assert_eq!(cleaned.is_active, Some(false));
        // Groups are not part of the field set without an organization
        assert_eq!(cleaned.groups, None);
    }

    #[test]
    fn clean_enforces_lengths_and_email_format() {
        let form = UserForm {
            full_name: Some("x".repeat(FULL_NAME_MAX_CHARS + 1)),
            email: Some("not-an-email".to_owned()),
            password: Some("short".to_owned()),
            confirm_password: Some("short".to_owned()),
            ..Default::default()
        };

        let errors = form.clean(&create_fields(None)).unwrap_err();

        assert!(errors.contains("full_name"));
        assert_eq!(
            errors.get("email"),
            Some(&["Enter a valid email address.".to_owned()][..])
        );
        assert!(errors.contains("password"));
        // An invalid password is never compared against its confirmation
        assert!(!errors.contains("confirm_password"));
    }

    #[test]
    fn clean_requires_groups_within_an_organization() {
        let form = UserForm {
            groups: Some(vec![]),
            ..create_form()
        };

        let errors = form.clean(&create_fields(Some(3))).unwrap_err();

        assert_eq!(errors.get("groups"), Some(&[REQUIRED.to_owned()][..]));
    }

    #[test]
    fn clean_requires_password_when_a_change_is_forced() {
        let form = UserForm {
            password: None,
            confirm_password: None,
            ..create_form()
        };

        let errors = form.clean(&self_fields(true)).unwrap_err();

        assert!(errors.contains("password"));
    }
}
