//! Lifecycle hooks
//!
//! An embedding application can adjust annotations right after they are
//! created and right before an update is persisted.

use std::fmt;
use std::sync::Arc;

use super::types::Annotation;

/// Callback invoked with a mutable annotation
pub type AnnotationHook = Arc<dyn Fn(&mut Annotation) + Send + Sync>;

/// Optional callback slots, empty by default
#[derive(Clone, Default)]
pub struct LifecycleHooks {
    on_create: Option<AnnotationHook>,
    on_before_update: Option<AnnotationHook>,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run after an annotation is first saved; the store saves it again afterwards
    pub fn with_on_create<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Annotation) + Send + Sync + 'static,
    {
        self.on_create = Some(Arc::new(hook));
        self
    }

    /// Run on the merged annotation before an update is saved
    pub fn with_on_before_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Annotation) + Send + Sync + 'static,
    {
        self.on_before_update = Some(Arc::new(hook));
        self
    }

    /// Returns `true` if a hook ran
    pub fn after_create(&self, annotation: &mut Annotation) -> bool {
        match &self.on_create {
            Some(hook) => {
                hook(annotation);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if a hook ran
    pub fn before_update(&self, annotation: &mut Annotation) -> bool {
        match &self.on_before_update {
            Some(hook) => {
                hook(annotation);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("on_create", &self.on_create.is_some())
            .field("on_before_update", &self.on_before_update.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hooks_are_noops() {
        let hooks = LifecycleHooks::default();
        let mut ann = Annotation::new();
        ann.insert("text", "hi");

        assert!(!hooks.after_create(&mut ann));
        assert!(!hooks.before_update(&mut ann));
        assert_eq!(ann.as_map().len(), 1);
    }

    #[test]
    fn test_registered_hooks_mutate() {
        let hooks = LifecycleHooks::new()
            .with_on_create(|ann| {
                ann.insert("word_count", 1);
            })
            .with_on_before_update(|ann| {
                ann.insert("edited", true);
            });
        let mut ann = Annotation::new();

        assert!(hooks.after_create(&mut ann));
        assert!(hooks.before_update(&mut ann));
        assert_eq!(ann.get("word_count"), Some(&serde_json::json!(1)));
        assert_eq!(ann.get("edited"), Some(&serde_json::json!(true)));
    }
}
