pub use super::actions::Entity as Actions;
pub use super::cases::Entity as Cases;
pub use super::cases_labels::Entity as CasesLabels;
pub use super::labels::Entity as Labels;
pub use super::organizations::Entity as Organizations;
pub use super::partners::Entity as Partners;
pub use super::profiles::Entity as Profiles;
pub use super::user_roles::Entity as UserRoles;
pub use super::users::Entity as Users;
