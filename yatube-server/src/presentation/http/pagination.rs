use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::Page;
use crate::data::Pagination;

#[derive(Debug, Default, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct PaginationQuery {
    /// Items per page (1..=100). Without it the whole list is returned.
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    /// Offset from the beginning, used only together with `limit`.
    pub(crate) offset: Option<u32>,
}

impl PaginationQuery {
    pub(crate) fn pagination(&self) -> Option<Pagination> {
        self.limit.map(|limit| Pagination {
            limit,
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// A plain array for unpaginated requests, an envelope otherwise.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Plain(Vec<T>),
    Paged {
        count: i64,
        limit: u32,
        offset: u32,
        results: Vec<T>,
    },
}

impl<T> Listing<T> {
    pub(crate) fn from_page<D>(page: Page<D>, map: impl FnMut(D) -> T) -> Self {
        let results = page.items.into_iter().map(map).collect();
        match page.pagination {
            Some(pagination) => Listing::Paged {
                count: page.total,
                limit: pagination.limit,
                offset: pagination.offset,
                results,
            },
            None => Listing::Plain(results),
        }
    }
}

impl<T: Serialize> IntoResponse for Listing<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
