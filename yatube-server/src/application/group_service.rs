use tracing::info;

use crate::data::group_repository::{GroupRepository, NewGroup};
use crate::domain::error::DomainError;
use crate::domain::group::{CreateGroupRequest, Group};
use crate::domain::permission::{Action, Actor, PermissionTable};

pub(crate) struct GroupService<R: GroupRepository> {
    repo: R,
}

impl<R: GroupRepository> GroupService<R> {
    const PERMISSIONS: PermissionTable = PermissionTable::GROUPS;

    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn list_groups(&self, actor: Actor) -> Result<Vec<Group>, DomainError> {
        Self::PERMISSIONS.authorize(Action::List, actor)?;
        self.repo.list_groups().await
    }

    pub(crate) async fn get_group(&self, actor: Actor, group_id: i64) -> Result<Group, DomainError> {
        Self::PERMISSIONS.authorize(Action::Retrieve, actor)?;
        self.repo
            .get_group(group_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("group id: {group_id}")))
    }

    /// Used by the `create-group` command.
    pub(crate) async fn create_group(&self, req: CreateGroupRequest) -> Result<Group, DomainError> {
        let req = req.validate()?;
        let group = self
            .repo
            .create_group(NewGroup {
                title: req.title,
                slug: req.slug,
                description: req.description,
            })
            .await?;

        info!(group_id = group.id, slug = %group.slug, "group created");
        Ok(group)
    }

    /// Used by the `delete-group` command.
    pub(crate) async fn delete_group(&self, slug: &str) -> Result<(), DomainError> {
        let slug = slug.trim();
        if !self.repo.delete_group(slug).await? {
            return Err(DomainError::NotFound(format!("group slug: {slug}")));
        }
        info!(slug, "group deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::GroupService;
    use crate::application::fakes::InMemoryDb;
    use crate::domain::error::DomainError;
    use crate::domain::group::CreateGroupRequest;
    use crate::domain::permission::Actor;

    fn request(slug: &str) -> CreateGroupRequest {
        CreateGroupRequest {
            title: " Cats ".to_string(),
            slug: slug.to_string(),
            description: "all about cats".to_string(),
        }
    }

    #[tokio::test]
    async fn groups_are_readable_anonymously() {
        let db = InMemoryDb::new();
        let cats = db.seed_group("cats");
        db.seed_group("dogs");
        let service = GroupService::new(db.clone());

        let groups = service
            .list_groups(Actor::Anonymous)
            .await
            .expect("list must succeed");
        assert_eq!(groups.len(), 2);

        let group = service
            .get_group(Actor::Anonymous, cats)
            .await
            .expect("get must succeed");
        assert_eq!(group.slug, "cats");
    }

    #[tokio::test]
    async fn get_missing_group_is_not_found() {
        let db = InMemoryDb::new();
        let err = GroupService::new(db)
            .get_group(Actor::User(1), 99)
            .await
            .expect_err("group does not exist");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_group_trims_and_stores() {
        let db = InMemoryDb::new();
        let group = GroupService::new(db.clone())
            .create_group(request("cats"))
            .await
            .expect("create must succeed");

        assert_eq!(group.title, "Cats");
        assert_eq!(db.state().groups.len(), 1);
    }

    #[tokio::test]
    async fn create_group_with_taken_slug_already_exists() {
        let db = InMemoryDb::new();
        db.seed_group("cats");

        let err = GroupService::new(db)
            .create_group(request("cats"))
            .await
            .expect_err("slug is taken");
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn create_group_with_bad_slug_skips_repository() {
        let db = InMemoryDb::new();
        let err = GroupService::new(db.clone())
            .create_group(request("no spaces"))
            .await
            .expect_err("slug is invalid");

        assert!(matches!(err, DomainError::Validation { field: "slug", .. }));
        assert_eq!(db.repo_calls(), 0);
    }

    #[tokio::test]
    async fn deleting_group_keeps_its_posts_ungrouped() {
        let db = InMemoryDb::new();
        let leo = db.seed_user("leo");
        let cats = db.seed_group("cats");
        let dogs = db.seed_group("dogs");
        let in_cats = db.seed_post(leo, "cats!");
        let in_dogs = db.seed_post(leo, "dogs!");
        {
            let mut state = db.state();
            for post in state.posts.iter_mut() {
                post.group_id = Some(if post.id == in_cats.id { cats } else { dogs });
            }
        }

        GroupService::new(db.clone())
            .delete_group(" cats ")
            .await
            .expect("delete must succeed");

        let kept = db.post(in_cats.id).expect("post must survive its group");
        assert_eq!(kept.group_id, None);
        assert_eq!(db.post(in_dogs.id).expect("untouched").group_id, Some(dogs));
        assert_eq!(db.state().groups.len(), 1);
    }

    #[tokio::test]
    async fn deleting_unknown_group_is_not_found() {
        let db = InMemoryDb::new();
        let err = GroupService::new(db)
            .delete_group("ghosts")
            .await
            .expect_err("group does not exist");
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
