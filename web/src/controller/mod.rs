use serde::Serialize;

pub(crate) mod action_controller;
pub(crate) mod api_controller;
pub(crate) mod case_controller;
pub(crate) mod health_check_controller;
pub(crate) mod label_controller;
pub(crate) mod organization;
pub(crate) mod organization_controller;
pub(crate) mod partner_controller;
pub(crate) mod profile_controller;
pub(crate) mod user_controller;
pub(crate) mod user_session_controller;

/// Envelope of every JSON body returned by the API.
#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T) -> Self {
        Self {
            status_code,
            data: Some(data),
        }
    }

    pub fn no_content(status_code: u16) -> ApiResponse<()> {
        ApiResponse {
            status_code,
            data: None,
        }
    }
}
