//! Cleanup callbacks that run when the server exits.

use log::debug;

type Hook = Box<dyn FnOnce() + Send>;

/// Named cleanup callbacks, run once in reverse registration order.
///
/// Hooks run on an explicit [`ExitHooks::run`] or when the registry is
/// dropped, so an early return or `?` while starting still cleans up. A
/// crashed process runs nothing, which is how stale PID records appear.
#[derive(Default)]
pub struct ExitHooks {
    hooks: Vec<(String, Hook)>,
}

impl ExitHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.hooks.push((name.into(), Box::new(hook)));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every registered hook, most recent first.
    pub fn run(&mut self) {
        while let Some((name, hook)) = self.hooks.pop() {
            debug!("Running exit hook: {name}");
            hook();
        }
    }
}

impl Drop for ExitHooks {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for ExitHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|(name, _)| name))
            .finish()
    }
}
