use globprof_core::State;

/// A state transform applied on every `mutate()`. Must be total.
pub type Mutation = Box<dyn Fn(State) -> State>;

/// A read-only observer of the state.
pub type Listener = Box<dyn Fn(&State)>;

/// Ordered list of mutations, applied as a left fold.
#[derive(Default)]
pub struct MutationRegistry {
    mutations: Vec<Mutation>,
}

impl MutationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, f: F)
    where
        F: Fn(State) -> State + 'static,
    {
        self.mutations.push(Box::new(f));
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// `f_n(...f_1(state))`, in registration order.
    pub fn apply(&self, state: State) -> State {
        self.mutations.iter().fold(state, |acc, m| m(acc))
    }
}

/// Ordered list of listeners. Only fired through an explicit `notify`.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, f: F)
    where
        F: Fn(&State) + 'static,
    {
        self.listeners.push(Box::new(f));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify(&self, state: &State) {
        for l in &self.listeners {
            l(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn empty_registry_is_identity() {
        let reg = MutationRegistry::new();
        let mut s = State::new();
        s.insert("k".into(), Value::from(1));
        assert_eq!(reg.apply(s.clone()), s);
        assert!(reg.is_empty());
    }

    #[test]
    fn mutations_see_previous_output() {
        let mut reg = MutationRegistry::new();
        reg.register(|mut s| {
            s.insert("trail".into(), Value::from("a"));
            s
        });
        reg.register(|mut s| {
            let prev = s.get("trail").and_then(Value::as_str).unwrap_or("").to_string();
            s.insert("trail".into(), Value::from(prev + "b"));
            s
        });
        let out = reg.apply(State::new());
        assert_eq!(out["trail"], "ab");
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn listeners_fire_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut reg = ListenerRegistry::new();
        for id in 0..3 {
            let seen = Rc::clone(&seen);
            reg.register(move |s: &State| seen.borrow_mut().push((id, s.len())));
        }
        reg.notify(&State::new());
        assert_eq!(*seen.borrow(), vec![(0, 0), (1, 0), (2, 0)]);
    }
}
