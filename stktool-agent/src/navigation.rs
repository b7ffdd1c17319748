//! Navigation stack model
//!
//! An ordered stack of pages with a fixed root. The topmost page is the one
//! on screen and the root can never be popped.

#[derive(Debug, Clone)]
pub struct NavStack<P> {
    root: P,
    pages: Vec<P>,
}

impl<P: PartialEq> NavStack<P> {
    pub fn new(root: P) -> Self {
        Self {
            root,
            pages: Vec::new(),
        }
    }

    /// The visible page
    pub fn visible(&self) -> &P {
        self.pages.last().unwrap_or(&self.root)
    }

    /// Number of pages including the root
    pub fn depth(&self) -> usize {
        self.pages.len() + 1
    }

    pub fn contains(&self, page: &P) -> bool {
        *page == self.root || self.pages.contains(page)
    }

    pub fn push(&mut self, page: P) {
        self.pages.push(page);
    }

    /// Pop the visible page; does nothing at the root
    pub fn pop(&mut self) -> Option<P> {
        self.pages.pop()
    }

    /// Pop everything above the root, topmost first
    pub fn pop_to_root(&mut self) -> Vec<P> {
        let mut popped = std::mem::take(&mut self.pages);
        popped.reverse();
        popped
    }

    /// Remove a page wherever it sits in the stack; the root is never removed
    pub fn remove(&mut self, page: &P) -> Option<P> {
        let index = self.pages.iter().position(|p| p == page)?;
        Some(self.pages.remove(index))
    }
}
