pub(crate) mod auth_service;
pub(crate) mod comment_service;
pub(crate) mod follow_service;
pub(crate) mod group_service;
pub(crate) mod post_service;

use crate::data::Pagination;

/// Result of a list operation. `pagination` is `None` when the caller did
/// not ask for a page, in which case `items` holds the whole collection.
#[derive(Debug, Clone)]
pub(crate) struct Page<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total: i64,
    pub(crate) pagination: Option<Pagination>,
}

/// Issued by a service's `authorize_*` method, consumed by the matching write.
#[derive(Debug)]
pub(crate) struct Granted<T> {
    actor_id: i64,
    target: T,
}

impl<T> Granted<T> {
    fn new(actor_id: i64, target: T) -> Self {
        Self { actor_id, target }
    }
}

#[cfg(test)]
pub(crate) mod fakes;
