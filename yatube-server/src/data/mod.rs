pub(crate) mod comment_repository;
pub(crate) mod follow_repository;
pub(crate) mod group_repository;
pub(crate) mod media_store;
pub(crate) mod post_repository;
pub(crate) mod repositories;
pub(crate) mod user_repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pagination {
    pub(crate) limit: u32,
    pub(crate) offset: u32,
}
