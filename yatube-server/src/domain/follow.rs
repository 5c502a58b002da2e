use super::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct Follow {
    pub(crate) user_id: i64,
    pub(crate) user: String,
    pub(crate) following_id: i64,
    pub(crate) following: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CreateFollowRequest {
    /// Username of the author to follow.
    pub(crate) following: String,
}

impl CreateFollowRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let following = self.following.trim();
        if following.is_empty() || following.len() > 64 {
            return Err(DomainError::Validation {
                field: "following",
                message: "must be 1..64 chars",
            });
        }
        Ok(Self {
            following: following.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::CreateFollowRequest;

    #[test]
    fn create_follow_request_trims_username() {
        let req = CreateFollowRequest {
            following: "  leo ".to_string(),
        };
        assert_eq!(req.validate().expect("valid").following, "leo");
    }

    #[test]
    fn create_follow_request_rejects_blank_username() {
        let req = CreateFollowRequest {
            following: "   ".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
