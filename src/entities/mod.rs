pub mod prelude;

pub mod followers;
pub mod posts;
pub mod users;
