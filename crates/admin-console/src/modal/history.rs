use crate::abstract_trait::{HistoryTrait, NavigationMode, NavigatorTrait};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;
use url::Url;

struct Stack {
    entries: Vec<Url>,
    index: usize,
    navigations: usize,
}

/// History stack kept in memory, with browser-style back/forward.
pub struct MemoryHistory {
    stack: Mutex<Stack>,
}

impl MemoryHistory {
    pub fn new(start: Url) -> Self {
        Self {
            stack: Mutex::new(Stack {
                entries: vec![start],
                index: 0,
                navigations: 0,
            }),
        }
    }

    pub fn parse(start: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(start)?))
    }

    fn lock(&self) -> MutexGuard<'_, Stack> {
        self.stack.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn back(&self) -> bool {
        let mut stack = self.lock();
        if stack.index == 0 {
            return false;
        }
        stack.index -= 1;
        true
    }

    pub fn forward(&self) -> bool {
        let mut stack = self.lock();
        if stack.index + 1 >= stack.entries.len() {
            return false;
        }
        stack.index += 1;
        true
    }

    /// Number of entries on the stack, never below one.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Number of committed navigations, pushes and replaces alike.
    pub fn navigations(&self) -> usize {
        self.lock().navigations
    }
}

impl HistoryTrait for MemoryHistory {
    fn current(&self) -> Url {
        let stack = self.lock();
        stack.entries[stack.index].clone()
    }

    fn commit(&self, mode: NavigationMode, edit: &mut dyn FnMut(&mut Url)) {
        let mut stack = self.lock();
        let index = stack.index;
        let mut next = stack.entries[index].clone();
        edit(&mut next);

        match mode {
            NavigationMode::Push => {
                stack.entries.truncate(index + 1);
                stack.entries.push(next);
                stack.index += 1;
            }
            NavigationMode::Replace => stack.entries[index] = next,
        }
        stack.navigations += 1;
    }
}

impl NavigatorTrait for MemoryHistory {
    fn navigate(&self, to: &str) {
        let next = match self.current().join(to) {
            Ok(next) => next,
            Err(e) => {
                warn!("Ignoring navigation to {to}: {e}");
                return;
            }
        };
        self.commit(NavigationMode::Push, &mut |url: &mut Url| *url = next.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_truncates_forward_entries() {
        let history = MemoryHistory::parse("http://console.local/sites").unwrap();
        history.navigate("/alarms");
        history.navigate("/samples");

        assert!(history.back());
        assert!(history.back());
        assert!(!history.back());
        assert_eq!(history.current().path(), "/sites");

        history.navigate("/users");
        assert_eq!(history.len(), 2);
        assert!(!history.forward());
        assert_eq!(history.current().path(), "/users");
    }

    #[test]
    fn unparseable_target_leaves_history_untouched() {
        let history = MemoryHistory::parse("http://console.local/sites").unwrap();

        history.navigate("http://[::1");

        assert_eq!(history.len(), 1);
        assert_eq!(history.navigations(), 0);
        assert!(!history.back());
        assert_eq!(history.current().path(), "/sites");
    }
}
