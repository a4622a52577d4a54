use crate::error::ActionError;

/// Runs before the session resolves; receives the final text. Returning an
/// error keeps the session open.
pub type ExitHook = Box<dyn FnMut(&str) -> Result<(), ActionError>>;

/// Exit hooks, invoked in registration order.
#[derive(Default)]
pub struct ExitHooks {
    hooks: Vec<ExitHook>,
}

impl ExitHooks {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    pub fn push(&mut self, hook: ExitHook) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Stops at the first failing hook; later hooks do not run.
    pub fn run(&mut self, text: &str) -> Result<(), ActionError> {
        for hook in &mut self.hooks {
            hook(text)?;
        }
        Ok(())
    }
}
