/// Performs a page navigation. Used by the route guard to redirect.
pub trait NavigatorTrait {
    fn navigate(&self, to: &str);
}
