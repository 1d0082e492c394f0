pub use super::followers::Entity as Followers;
pub use super::posts::Entity as Posts;
pub use super::users::Entity as Users;
