use std::sync::Arc;
use url::Url;

pub type DynHistory = Arc<dyn HistoryTrait + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    Push,
    Replace,
}

/// The navigable location shared by every URL-state writer on a page.
pub trait HistoryTrait {
    fn current(&self) -> Url;

    /// Applies `edit` to the latest location and commits the result as one
    /// navigation. No other write may land between the read and the commit.
    fn commit(&self, mode: NavigationMode, edit: &mut dyn FnMut(&mut Url));
}
