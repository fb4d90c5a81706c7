use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A registration awaiting email confirmation. The password is stored
/// already hashed; the plain text never outlives the register request.
#[derive(Debug, Clone)]
pub struct PendingRegistration {
    pub password_hash: String,
    pub code: String,
}

struct Entry {
    registration: PendingRegistration,
    expires_at: Instant,
}

pub enum ConfirmOutcome {
    /// No registration for this account, or it was already consumed.
    Missing,
    Expired,
    CodeMismatch,
    Confirmed(PendingRegistration),
}

/// Short-lived store for registrations started but not yet confirmed.
/// Entries expire after the TTL; expiry is checked lazily on access.
pub struct PendingRegistrations {
    ttl: Duration,
    inner: Mutex<HashMap<String, Entry>>,
}

impl PendingRegistrations {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Store a pending registration, replacing any previous attempt for the
    /// same account and dropping entries that have already expired.
    pub fn insert(&self, account: &str, registration: PendingRegistration) {
        let now = Instant::now();
        let mut map = self.inner.lock().unwrap();
        map.retain(|_, entry| entry.expires_at > now);
        map.insert(
            account.to_string(),
            Entry {
                registration,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Check the confirmation code for an account. A matching code consumes
    /// the entry; an expired entry is removed; a wrong code leaves it in
    /// place so the user may retry.
    pub fn confirm(&self, account: &str, code: &str) -> ConfirmOutcome {
        let now = Instant::now();
        let mut map = self.inner.lock().unwrap();

        let Some(entry) = map.remove(account) else {
            return ConfirmOutcome::Missing;
        };

        if entry.expires_at <= now {
            return ConfirmOutcome::Expired;
        }

        if entry.registration.code != code {
            map.insert(account.to_string(), entry);
            return ConfirmOutcome::CodeMismatch;
        }

        ConfirmOutcome::Confirmed(entry.registration)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(code: &str) -> PendingRegistration {
        PendingRegistration {
            password_hash: "$argon2id$stub".to_string(),
            code: code.to_string(),
        }
    }

    #[test]
    fn confirm_consumes_entry() {
        let store = PendingRegistrations::new(Duration::from_secs(300));
        store.insert("a@example.com", registration("123456"));

        assert!(matches!(
            store.confirm("a@example.com", "123456"),
            ConfirmOutcome::Confirmed(_)
        ));
        assert!(matches!(
            store.confirm("a@example.com", "123456"),
            ConfirmOutcome::Missing
        ));
    }

    #[test]
    fn wrong_code_keeps_entry() {
        let store = PendingRegistrations::new(Duration::from_secs(300));
        store.insert("a@example.com", registration("123456"));

        assert!(matches!(
            store.confirm("a@example.com", "000000"),
            ConfirmOutcome::CodeMismatch
        ));
        assert!(matches!(
            store.confirm("a@example.com", "123456"),
            ConfirmOutcome::Confirmed(_)
        ));
    }

    #[test]
    fn expired_entry_reported_and_purged() {
        let store = PendingRegistrations::new(Duration::ZERO);
        store.insert("a@example.com", registration("123456"));

        assert!(matches!(
            store.confirm("a@example.com", "123456"),
            ConfirmOutcome::Expired
        ));
        assert!(matches!(
            store.confirm("a@example.com", "123456"),
            ConfirmOutcome::Missing
        ));
    }

    #[test]
    fn insert_purges_expired_entries() {
        let store = PendingRegistrations::new(Duration::ZERO);
        store.insert("old@example.com", registration("111111"));
        store.insert("new@example.com", registration("222222"));
        assert_eq!(store.len(), 1);
    }
}
