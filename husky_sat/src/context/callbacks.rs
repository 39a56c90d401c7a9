/*!
Callbacks associated with a context.

Two callbacks support parallel solving:

- The *sync hook* is invoked at restart boundaries, with the trail cancelled to the root.
  The hook receives the context itself, so whoever installed the hook may import clauses or
  inspect counters, and its boolean return is read as 'stop searching'.
- The *learnt callback* is invoked for each learnt clause passing the export quality filter of
  the configuration, before the clause is attached.

Callbacks may be mutable functions.
*/

use crate::structures::literal::CLiteral;

use super::GenericContext;

/// The sync hook: receives the context at a restart boundary, returns 'stop searching'.
pub type SyncHook<C> = Box<dyn FnMut(&mut C) -> bool + Send>;

/// The learnt-clause callback: receives the literals and glue of a fresh learnt clause.
pub type CallbackLearnt = Box<dyn FnMut(&[CLiteral], u32) + Send>;

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Install the sync hook, replacing any present hook.
    pub fn set_sync_hook(&mut self, hook: SyncHook<Self>) {
        self.sync_hook = Some(hook);
    }

    /// Install the learnt-clause callback, replacing any present callback.
    pub fn set_callback_learnt(&mut self, callback: CallbackLearnt) {
        self.callback_learnt = Some(callback);
    }

    /// Invoke the learnt-clause callback, if installed and the clause passes the export
    /// filter.
    pub(crate) fn make_callback_learnt(&mut self, literals: &[CLiteral], glue: u32) {
        if glue > self.config.export_glue_limit || literals.len() > self.config.export_size_limit
        {
            return;
        }
        if let Some(callback) = &mut self.callback_learnt {
            callback(literals, glue);
            self.counters.exported_clauses += 1;
        }
    }

    /// Invoke the sync hook, if installed, returning its 'stop searching' verdict.
    ///
    /// The hook is lifted out of the context for the duration of the call, so the hook itself
    /// receives the context without aliasing.
    pub(crate) fn call_sync_hook(&mut self) -> bool {
        match self.sync_hook.take() {
            None => false,
            Some(mut hook) => {
                let stop = hook(self);
                if self.sync_hook.is_none() {
                    self.sync_hook = Some(hook);
                }
                stop
            }
        }
    }
}
