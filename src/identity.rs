use crate::models::UserIdentity;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// The narrow contract of the external identity collaborator: a readiness
/// flag and the signed-in user, if any. Storage partitioning and the
/// premium gate depend on nothing else.
pub trait IdentityProvider: Send + Sync {
    fn is_loaded(&self) -> bool;
    fn current_user(&self) -> Option<UserIdentity>;
}

/// Always loaded, never signed in. The default wiring for embedders that
/// run without an identity service.
#[derive(Debug, Default)]
pub struct GuestIdentityProvider;

impl IdentityProvider for GuestIdentityProvider {
    fn is_loaded(&self) -> bool {
        true
    }

    fn current_user(&self) -> Option<UserIdentity> {
        None
    }
}

/// Provider whose state is set programmatically. Embedders feed it the
/// session they obtained elsewhere; tests drive sign-in and sign-out.
#[derive(Debug)]
pub struct StaticIdentityProvider {
    user: Mutex<Option<UserIdentity>>,
    loaded: AtomicBool,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self {
            user: Mutex::new(None),
            loaded: AtomicBool::new(true),
        }
    }

    pub fn sign_in(&self, user: UserIdentity) {
        if let Ok(mut slot) = self.user.lock() {
            *slot = Some(user);
        }
        self.loaded.store(true, Ordering::SeqCst);
    }

    pub fn sign_out(&self) {
        if let Ok(mut slot) = self.user.lock() {
            *slot = None;
        }
    }

    pub fn set_loaded(&self, loaded: bool) {
        self.loaded.store(loaded, Ordering::SeqCst);
    }
}

impl Default for StaticIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    fn current_user(&self) -> Option<UserIdentity> {
        self.user.lock().map(|slot| slot.clone()).unwrap_or(None)
    }
}

#[cfg(test)]
mod tests {
    use super::{GuestIdentityProvider, IdentityProvider, StaticIdentityProvider};
    use crate::models::UserIdentity;
    use crate::persistence::Partition;

    fn user(id: &str) -> UserIdentity {
        UserIdentity {
            id: id.to_string(),
            email: Some(format!("{id}@example.com")),
            premium: false,
            member_since: None,
        }
    }

    #[test]
    fn guest_provider_is_loaded_and_anonymous() {
        let provider = GuestIdentityProvider;
        assert!(provider.is_loaded());
        assert!(provider.current_user().is_none());
    }

    #[test]
    fn static_provider_tracks_sign_in_and_out() {
        let provider = StaticIdentityProvider::new();
        assert!(provider.current_user().is_none());

        provider.sign_in(user("user_a"));
        assert_eq!(provider.current_user().map(|u| u.id), Some("user_a".to_string()));

        provider.sign_out();
        assert!(provider.current_user().is_none());
    }

    #[test]
    fn partitions_follow_the_identity() {
        let signed_in = Partition::for_user(Some(&user("user_a")));
        assert_eq!(signed_in.tasks_key(), "tasks_user_a");
        assert_eq!(signed_in.folders_key(), "folders_user_a");

        let guest = Partition::for_user(None);
        assert_eq!(guest.tasks_key(), "tasks_guest");
        assert_eq!(guest.folders_key(), "folders_guest");
    }
}
