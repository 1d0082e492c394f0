mod feed;
mod follow;
mod post;
mod user;

pub use feed::{cmd_explore, cmd_timeline};
pub use follow::{cmd_follow, cmd_unfollow};
pub use post::cmd_post;
pub use user::{cmd_user_add, cmd_user_list};
