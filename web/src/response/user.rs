//! User detail response
//!
//! The domain layer decides whether the viewer gets an edit link; this DTO turns
//! that decision into the URL of the matching route.

use domain::user::{EditLink, UserDetail};
use domain::Id;
use serde::Serialize;
use utoipa::ToSchema;

/// A user as shown on their detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserDetailResponse {
    pub id: Id,
    pub full_name: String,
    pub email: String,

    /// Role label within the organization (only with an organization context)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,

    /// "My Profile" when viewing oneself, else "View User"
    pub title: String,

    /// Where the viewer can edit this user, or null when they cannot
    pub edit_button_url: Option<String>,
}

impl UserDetailResponse {
    pub fn new(detail: UserDetail, organization_id: Option<Id>) -> Self {
        let edit_button_url = detail.edit_link.map(|link| match link {
            EditLink::OwnProfile => "/profile/self".to_string(),
            EditLink::Update => match organization_id {
                Some(organization_id) => {
                    format!("/organizations/{organization_id}/users/{}", detail.id)
                }
                None => format!("/users/{}", detail.id),
            },
        });

        Self {
            id: detail.id,
            full_name: detail.full_name,
            email: detail.email,
            groups: detail.groups,
            title: detail.title,
            edit_button_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(edit_link: Option<EditLink>) -> UserDetail {
        UserDetail {
            id: 7,
            full_name: "Edith Editor".to_string(),
            email: "editor@acme.example".to_string(),
            groups: Some("User".to_string()),
            title: "View User".to_string(),
            edit_link,
        }
    }

    #[test]
    fn own_profile_links_to_the_self_service_form() {
        let response = UserDetailResponse::new(detail(Some(EditLink::OwnProfile)), Some(3));

        assert_eq!(response.edit_button_url.as_deref(), Some("/profile/self"));
    }

    #[test]
    fn update_link_stays_inside_the_organization() {
        let response = UserDetailResponse::new(detail(Some(EditLink::Update)), Some(3));

        assert_eq!(
            response.edit_button_url.as_deref(),
            Some("/organizations/3/users/7")
        );
    }

    #[test]
    fn update_link_without_organization_uses_top_level_route() {
        let response = UserDetailResponse::new(detail(Some(EditLink::Update)), None);

        assert_eq!(response.edit_button_url.as_deref(), Some("/users/7"));
    }

    #[test]
    fn no_link_serializes_as_null() {
        let response = UserDetailResponse::new(detail(None), Some(3));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["edit_button_url"], serde_json::Value::Null);
        assert_eq!(value["groups"], "User");
    }
}
