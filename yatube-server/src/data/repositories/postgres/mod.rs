pub(crate) mod comment_repository;
pub(crate) mod follow_repository;
pub(crate) mod group_repository;
pub(crate) mod post_repository;
pub(crate) mod user_repository;

use crate::data::Pagination;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Wraps user input into an `ILIKE` pattern, escaping wildcards.
pub(crate) fn like_pattern(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let escaped = raw
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

/// `LIMIT NULL` means no limit in PostgreSQL.
pub(crate) fn limit_offset(pagination: Option<Pagination>) -> (Option<i64>, i64) {
    match pagination {
        Some(p) => (Some(i64::from(p.limit)), i64::from(p.offset)),
        None => (None, 0),
    }
}

/// Returns the violated constraint name when `err` carries the given SQLSTATE.
pub(crate) fn violated_constraint(err: &sqlx::Error, code: &str) -> Option<String> {
    if let sqlx::Error::Database(db_err) = err
        && db_err.code().as_deref() == Some(code)
    {
        return Some(db_err.constraint().unwrap_or_default().to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{like_pattern, limit_offset};
    use crate::data::Pagination;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off").as_deref(), Some("%50\\%\\_off%"));
        assert_eq!(like_pattern(" rust ").as_deref(), Some("%rust%"));
    }

    #[test]
    fn like_pattern_skips_blank_input() {
        assert!(like_pattern("   ").is_none());
    }

    #[test]
    fn limit_offset_without_pagination_is_unbounded() {
        assert_eq!(limit_offset(None), (None, 0));
        assert_eq!(
            limit_offset(Some(Pagination {
                limit: 10,
                offset: 30
            })),
            (Some(10), 30)
        );
    }
}
