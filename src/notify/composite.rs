//! Observer that fans an update out to named children.

use super::observer::Observer;

/// Groups named child observers behind a single subscription.
///
/// Every active child receives each update even when an earlier child fails;
/// failures are reported together as one error.
pub struct CompositeObserver<E> {
    id: String,
    active: bool,
    children: Vec<(String, Box<dyn Observer<E>>)>,
}

impl<E> CompositeObserver<E> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: true,
            children: Vec::new(),
        }
    }

    /// Add a child under `name`. Returns `false` if the name is taken.
    pub fn add(&mut self, name: impl Into<String>, observer: Box<dyn Observer<E>>) -> bool {
        let name = name.into();
        if self.children.iter().any(|(n, _)| *n == name) {
            return false;
        }
        self.children.push((name, observer));
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Observer<E>>> {
        let idx = self.children.iter().position(|(n, _)| n == name)?;
        Some(self.children.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Observer<E>> {
        self.children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, o)| o.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn activate_all(&mut self) {
        for (_, child) in &mut self.children {
            child.set_active(true);
        }
    }

    pub fn deactivate_all(&mut self) {
        for (_, child) in &mut self.children {
            child.set_active(false);
        }
    }
}

impl<E> Observer<E> for CompositeObserver<E> {
    fn id(&self) -> &str {
        &self.id
    }

    fn update(&mut self, event: &E) -> anyhow::Result<()> {
        let total = self.children.len();
        let mut failed: Vec<String> = Vec::new();
        for (name, child) in &mut self.children {
            if !child.is_active() {
                continue;
            }
            if let Err(e) = child.update(event) {
                tracing::debug!(composite = %self.id, child = %name, error = %e, "child observer failed");
                failed.push(name.clone());
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "{} of {} children failed: {}",
                failed.len(),
                total,
                failed.join(", ")
            )
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
