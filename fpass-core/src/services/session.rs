//! Session manager - the single owner of persisted session state
//!
//! All reads and writes of the token, user and wallet snapshot go through
//! here. The request helper reads the token, the normalizer calls
//! [`SessionManager::expire`] on a 401, and views subscribe to
//! [`SessionEvent`]s to learn when a session starts or ends.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::domain::result::{Error, Result};
use crate::domain::{
    AuthState, EndReason, Session, SessionEvent, User, Wallet, ACCESS_TOKEN_KEY,
    DEFAULT_CURRENCY, SESSION_KEYS, USER_KEY, WALLET_KEY,
};
use crate::ports::SessionStore;

const EVENT_CAPACITY: usize = 16;

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    /// Guards the lifecycle state; held across store writes so they never interleave
    state: Mutex<AuthState>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Create a manager over `store`
    ///
    /// A persisted token counts as an authenticated session until the backend
    /// says otherwise.
    pub fn new(store: Arc<dyn SessionStore>) -> Result<Self> {
        let initial = match store.get(ACCESS_TOKEN_KEY) {
            Ok(Some(_)) => AuthState::Authenticated,
            Ok(None) => AuthState::Unauthenticated,
            Err(e) => {
                warn!(error = %e, "session store unreadable, starting logged out");
                AuthState::Unauthenticated
            }
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            store,
            state: Mutex::new(initial),
            events,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, AuthState>> {
        self.state
            .lock()
            .map_err(|e| Error::Other(format!("Session lock poisoned: {}", e)))
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Listen for session start/end events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.lock()
            .map(|s| *s)
            .unwrap_or(AuthState::Unauthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    /// Bearer token, if one is persisted
    pub fn token(&self) -> Result<Option<String>> {
        let _guard = self.lock()?;
        self.store.get(ACCESS_TOKEN_KEY)
    }

    /// Cached user from the last login or profile fetch
    pub fn user(&self) -> Result<Option<User>> {
        let _guard = self.lock()?;
        self.read_json(USER_KEY)
    }

    /// Cached wallet snapshot
    pub fn wallet(&self) -> Result<Option<Wallet>> {
        let _guard = self.lock()?;
        self.read_json(WALLET_KEY)
    }

    /// Currency of the cached wallet, for amounts shown outside a wallet view
    pub fn currency(&self) -> String {
        match self.wallet() {
            Ok(Some(wallet)) => wallet.currency,
            _ => DEFAULT_CURRENCY.to_string(),
        }
    }

    /// Token and user together, when both are persisted
    pub fn session(&self) -> Result<Option<Session>> {
        let _guard = self.lock()?;
        let token = match self.store.get(ACCESS_TOKEN_KEY)? {
            Some(token) => token,
            None => return Ok(None),
        };
        Ok(self
            .read_json::<User>(USER_KEY)?
            .map(|user| Session { token, user }))
    }

    /// A value that no longer parses reads as absent so callers refetch it
    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "ignoring unreadable cached value");
                Ok(None)
            }
        }
    }

    /// Credentials submitted; nothing is persisted yet
    pub fn begin_login(&self) -> Result<()> {
        *self.lock()? = AuthState::Authenticating;
        Ok(())
    }

    /// Backend rejected the credentials
    pub fn abort_login(&self) -> Result<()> {
        let mut state = self.lock()?;
        if *state == AuthState::Authenticating {
            *state = AuthState::Unauthenticated;
        }
        Ok(())
    }

    /// Persist the token and user and enter the authenticated state
    pub fn establish(&self, session: &Session) -> Result<()> {
        let mut state = self.lock()?;
        self.store.set(ACCESS_TOKEN_KEY, &session.token)?;
        self.store
            .set(USER_KEY, &serde_json::to_string(&session.user)?)?;
        *state = AuthState::Authenticated;
        drop(state);

        info!(user_id = %session.user.id, "session established");
        self.publish(SessionEvent::Started {
            user_id: session.user.id.clone(),
        });
        Ok(())
    }

    /// Replace the cached user
    pub fn store_user(&self, user: &User) -> Result<()> {
        let _guard = self.lock()?;
        self.store.set(USER_KEY, &serde_json::to_string(user)?)
    }

    /// Replace the cached wallet snapshot
    pub fn store_wallet(&self, wallet: &Wallet) -> Result<()> {
        let _guard = self.lock()?;
        self.store.set(WALLET_KEY, &serde_json::to_string(wallet)?)
    }

    /// Clear every session key and leave the authenticated state
    ///
    /// `Ended` is published for an explicit logout, and for an expiry only when
    /// a session was actually live (a 401 on the login call itself is just a
    /// rejected login).
    pub fn end(&self, reason: EndReason) -> Result<()> {
        let mut state = self.lock()?;
        let previous = *state;
        self.store.remove_all(&SESSION_KEYS)?;
        *state = AuthState::Unauthenticated;
        drop(state);

        let announce = match reason {
            EndReason::Logout => true,
            EndReason::Expired => previous == AuthState::Authenticated,
        };
        debug!(?reason, ?previous, "session ended");
        if announce {
            self.publish(SessionEvent::Ended(reason));
        }
        Ok(())
    }

    /// Tear down after a 401
    pub fn expire(&self) -> Result<()> {
        self.end(EndReason::Expired)
    }

    pub fn logout(&self) -> Result<()> {
        self.end(EndReason::Logout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemorySessionStore;
    use rust_decimal::Decimal;

    fn manager() -> (Arc<MemorySessionStore>, SessionManager) {
        let store = Arc::new(MemorySessionStore::new());
        let manager = SessionManager::new(store.clone()).unwrap();
        (store, manager)
    }

    fn session() -> Session {
        Session {
            token: "tok-1".to_string(),
            user: User::new("7", "alice@example.com"),
        }
    }

    #[test]
    fn test_starts_unauthenticated_without_token() {
        let (_, manager) = manager();
        assert_eq!(manager.state(), AuthState::Unauthenticated);
        assert!(manager.session().unwrap().is_none());
    }

    #[test]
    fn test_persisted_token_restores_authenticated() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        let manager = SessionManager::new(store).unwrap();
        assert!(manager.is_authenticated());
    }

    #[test]
    fn test_establish_persists_and_announces() {
        let (store, manager) = manager();
        let mut events = manager.subscribe();

        manager.begin_login().unwrap();
        assert_eq!(manager.state(), AuthState::Authenticating);
        manager.establish(&session()).unwrap();

        assert!(manager.is_authenticated());
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
        assert_eq!(manager.user().unwrap().unwrap().email, "alice@example.com");
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::Started {
                user_id: "7".to_string()
            }
        );
    }

    #[test]
    fn test_abort_login_persists_nothing() {
        let (store, manager) = manager();
        manager.begin_login().unwrap();
        manager.abort_login().unwrap();

        assert_eq!(manager.state(), AuthState::Unauthenticated);
        assert!(store.is_empty());
    }

    #[test]
    fn test_expire_clears_all_keys() {
        let (store, manager) = manager();
        manager.establish(&session()).unwrap();
        manager
            .store_wallet(&Wallet::new("W1", Decimal::new(1000, 2)))
            .unwrap();
        let mut events = manager.subscribe();

        manager.expire().unwrap();

        assert!(store.is_empty());
        assert_eq!(manager.state(), AuthState::Unauthenticated);
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::Ended(EndReason::Expired)
        );
    }

    #[test]
    fn test_expire_during_login_is_silent() {
        let (_, manager) = manager();
        let mut events = manager.subscribe();
        manager.begin_login().unwrap();

        manager.expire().unwrap();

        assert!(events.try_recv().is_err());
    }

    struct UnreadableStore;

    impl SessionStore for UnreadableStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Other("disk on fire".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Ok(())
        }

        fn remove_all(&self, _keys: &[&str]) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unreadable_store_starts_logged_out() {
        let manager = SessionManager::new(Arc::new(UnreadableStore)).unwrap();
        assert_eq!(manager.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_garbled_cached_values_read_as_absent() {
        let (store, manager) = manager();
        store.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        store.set(USER_KEY, "{broken").unwrap();
        store.set(WALLET_KEY, "[1, 2").unwrap();

        assert!(manager.user().unwrap().is_none());
        assert!(manager.wallet().unwrap().is_none());
        assert!(manager.session().unwrap().is_none());
    }

    #[test]
    fn test_currency_follows_cached_wallet() {
        let (_, manager) = manager();
        assert_eq!(manager.currency(), "USD");

        let mut wallet = Wallet::new("W1", Decimal::ONE);
        wallet.currency = "KES".to_string();
        manager.store_wallet(&wallet).unwrap();
        assert_eq!(manager.currency(), "KES");
    }

    #[test]
    fn test_wallet_snapshot_round_trips_through_store() {
        let (_, manager) = manager();
        let wallet = Wallet::new("W1", Decimal::new(125050, 2));
        manager.store_wallet(&wallet).unwrap();
        assert_eq!(manager.wallet().unwrap().unwrap().balance, wallet.balance);
    }
}
