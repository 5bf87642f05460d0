//! Ordered login lifecycle observers.
//!
//! Observers are invoked in registration order. Registering a new observer
//! never displaces an earlier one, unlike callback-slot reassignment.

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::AuthError;
use crate::session::Session;

/// Login lifecycle notifications. All methods default to no-ops.
pub trait AuthObserver {
    fn on_login(&self, _session: &Session) {}
    fn on_login_error(&self, _error: &AuthError) {}
    fn on_logout(&self) {}
}

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    observers: RefCell<Vec<Rc<dyn AuthObserver>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, observer: Rc<dyn AuthObserver>) {
        self.observers.borrow_mut().push(observer);
    }

    pub fn notify_login(&self, session: &Session) {
        for observer in self.observers.borrow().iter() {
            observer.on_login(session);
        }
    }

    pub fn notify_login_error(&self, error: &AuthError) {
        for observer in self.observers.borrow().iter() {
            observer.on_login_error(error);
        }
    }

    pub fn notify_logout(&self) {
        for observer in self.observers.borrow().iter() {
            observer.on_logout();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Credential;

    struct Labelled {
        label: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl AuthObserver for Labelled {
        fn on_login(&self, _session: &Session) {
            self.log.borrow_mut().push(format!("{}:login", self.label));
        }

        fn on_logout(&self) {
            self.log.borrow_mut().push(format!("{}:logout", self.label));
        }
    }

    #[test]
    fn test_observers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = ObserverRegistry::new();
        registry.add(Rc::new(Labelled {
            label: "first",
            log: log.clone(),
        }));
        registry.add(Rc::new(Labelled {
            label: "second",
            log: log.clone(),
        }));

        let session = Session {
            wallet: "0xabc".to_string(),
            credential: Credential::WalletSignature("0xsig".to_string()),
            is_permittee: false,
            profile: None,
        };
        registry.notify_login(&session);
        registry.notify_logout();

        assert_eq!(
            *log.borrow(),
            vec!["first:login", "second:login", "first:logout", "second:logout"]
        );
    }
}
