//! The surfaces the controller talks to: where the script comes from,
//! where busy state goes, and where the result lands.

pub mod capture;
pub mod editor;
pub mod lines;
pub mod terminal;

/// Source of the script text, read on demand.
pub trait EditorInput: Send + Sync {
    fn text(&self) -> String;
}

/// Busy/idle indicator. Busy also disables the trigger.
pub trait BusySignal: Send + Sync {
    fn set_busy(&self, status: &str);
    fn set_idle(&self);
}

/// Where a result, or the message explaining its absence, is shown.
pub trait OutputSink: Send + Sync {
    fn write(&self, text: &str);
}
