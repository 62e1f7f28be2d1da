//! Organizations, users, and the membership join records that bind a user
//! to an organization with a role.

pub mod member;
pub mod organization;
pub mod user;

pub use member::OrganizationMember;
pub use organization::Organization;
pub use user::User;
