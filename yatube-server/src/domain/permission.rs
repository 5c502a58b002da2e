use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Action {
    pub(crate) fn is_safe(self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Actor {
    Anonymous,
    User(i64),
}

impl Actor {
    pub(crate) fn user_id(self) -> Option<i64> {
        match self {
            Actor::Anonymous => None,
            Actor::User(id) => Some(id),
        }
    }

    pub(crate) fn is_authenticated(self) -> bool {
        matches!(self, Actor::User(_))
    }

    pub(crate) fn require_user(self) -> Result<i64, DomainError> {
        self.user_id().ok_or(DomainError::Unauthenticated)
    }
}

pub(crate) trait Owned {
    fn owner_id(&self) -> i64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Policy {
    ReadOnly,
    AuthenticatedOrReadOnly,
    Authenticated,
    OwnerOrReadOnly,
}

impl Policy {
    pub(crate) fn has_permission(self, action: Action, actor: Actor) -> bool {
        match self {
            Policy::ReadOnly => action.is_safe(),
            Policy::Authenticated => actor.is_authenticated(),
            Policy::AuthenticatedOrReadOnly | Policy::OwnerOrReadOnly => {
                action.is_safe() || actor.is_authenticated()
            }
        }
    }

    pub(crate) fn has_object_permission(self, action: Action, actor: Actor, owner_id: i64) -> bool {
        match self {
            Policy::OwnerOrReadOnly => action.is_safe() || actor.user_id() == Some(owner_id),
            other => other.has_permission(action, actor),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PermissionTable {
    pub(crate) list: Policy,
    pub(crate) retrieve: Policy,
    pub(crate) create: Policy,
    pub(crate) update: Policy,
    pub(crate) delete: Policy,
}

impl PermissionTable {
    pub(crate) const POSTS: Self = Self {
        list: Policy::OwnerOrReadOnly,
        retrieve: Policy::ReadOnly,
        create: Policy::OwnerOrReadOnly,
        update: Policy::OwnerOrReadOnly,
        delete: Policy::OwnerOrReadOnly,
    };

    pub(crate) const COMMENTS: Self = Self::POSTS;

    pub(crate) const GROUPS: Self = Self {
        list: Policy::AuthenticatedOrReadOnly,
        retrieve: Policy::AuthenticatedOrReadOnly,
        create: Policy::ReadOnly,
        update: Policy::ReadOnly,
        delete: Policy::ReadOnly,
    };

    pub(crate) const FOLLOWS: Self = Self {
        list: Policy::Authenticated,
        retrieve: Policy::Authenticated,
        create: Policy::Authenticated,
        update: Policy::ReadOnly,
        delete: Policy::ReadOnly,
    };

    pub(crate) fn policy(&self, action: Action) -> Policy {
        match action {
            Action::List => self.list,
            Action::Retrieve => self.retrieve,
            Action::Create => self.create,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }

    pub(crate) fn authorize(&self, action: Action, actor: Actor) -> Result<(), DomainError> {
        if self.policy(action).has_permission(action, actor) {
            return Ok(());
        }
        Err(denied(actor))
    }

    pub(crate) fn authorize_object<T: Owned>(
        &self,
        action: Action,
        actor: Actor,
        object: &T,
    ) -> Result<(), DomainError> {
        if self
            .policy(action)
            .has_object_permission(action, actor, object.owner_id())
        {
            return Ok(());
        }
        Err(denied(actor))
    }
}

fn denied(actor: Actor) -> DomainError {
    if actor.is_authenticated() {
        DomainError::Forbidden
    } else {
        DomainError::Unauthenticated
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, Actor, DomainError, Owned, PermissionTable, Policy};

    struct Record {
        owner: i64,
    }

    impl Owned for Record {
        fn owner_id(&self) -> i64 {
            self.owner
        }
    }

    const ALL_ACTIONS: [Action; 5] = [
        Action::List,
        Action::Retrieve,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];

    #[test]
    fn read_only_allows_only_safe_actions() {
        for action in ALL_ACTIONS {
            assert_eq!(
                Policy::ReadOnly.has_permission(action, Actor::User(1)),
                action.is_safe()
            );
        }
    }

    #[test]
    fn anonymous_mutation_is_unauthenticated() {
        let err = PermissionTable::POSTS
            .authorize(Action::Create, Actor::Anonymous)
            .expect_err("anonymous create must be rejected");
        assert!(matches!(err, DomainError::Unauthenticated));
    }

    #[test]
    fn anonymous_can_list_and_retrieve_posts() {
        let table = PermissionTable::POSTS;
        assert!(table.authorize(Action::List, Actor::Anonymous).is_ok());
        assert!(table.authorize(Action::Retrieve, Actor::Anonymous).is_ok());
        assert!(
            table
                .authorize_object(Action::Retrieve, Actor::Anonymous, &Record { owner: 5 })
                .is_ok()
        );
    }

    #[test]
    fn non_owner_update_and_delete_are_forbidden() {
        let table = PermissionTable::POSTS;
        let record = Record { owner: 1 };

        for action in [Action::Update, Action::Delete] {
            assert!(table.authorize(action, Actor::User(2)).is_ok());
            let err = table
                .authorize_object(action, Actor::User(2), &record)
                .expect_err("non-owner must be rejected");
            assert!(matches!(err, DomainError::Forbidden));
        }
    }

    #[test]
    fn owner_can_update_and_delete() {
        let table = PermissionTable::COMMENTS;
        let record = Record { owner: 7 };
        for action in [Action::Update, Action::Delete] {
            assert!(
                table
                    .authorize_object(action, Actor::User(7), &record)
                    .is_ok()
            );
        }
    }

    #[test]
    fn non_owner_can_retrieve() {
        let record = Record { owner: 1 };
        assert!(
            PermissionTable::POSTS
                .authorize_object(Action::Retrieve, Actor::User(2), &record)
                .is_ok()
        );
    }

    #[test]
    fn groups_are_read_only_even_for_authenticated_users() {
        let table = PermissionTable::GROUPS;
        assert!(table.authorize(Action::List, Actor::Anonymous).is_ok());
        let err = table
            .authorize(Action::Create, Actor::User(1))
            .expect_err("group creation is not exposed");
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[test]
    fn follows_require_authentication_for_every_action() {
        let table = PermissionTable::FOLLOWS;
        for action in [Action::List, Action::Create] {
            assert!(matches!(
                table.authorize(action, Actor::Anonymous),
                Err(DomainError::Unauthenticated)
            ));
            assert!(table.authorize(action, Actor::User(3)).is_ok());
        }
    }

    #[test]
    fn require_user_rejects_anonymous() {
        assert!(matches!(
            Actor::Anonymous.require_user(),
            Err(DomainError::Unauthenticated)
        ));
        assert_eq!(Actor::User(4).require_user().expect("user"), 4);
    }
}
