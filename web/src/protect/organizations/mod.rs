pub(crate) mod api;
pub(crate) mod users;

use domain::Id;
use serde::Deserialize;

/// The organization segment of any route nested under
/// `/organizations/:organization_id`. Other path segments are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct OrganizationPath {
    pub(crate) organization_id: Id,
}
