pub(crate) mod comment;
pub(crate) mod error;
pub(crate) mod follow;
pub(crate) mod group;
pub(crate) mod image;
pub(crate) mod permission;
pub(crate) mod post;
pub(crate) mod user;
