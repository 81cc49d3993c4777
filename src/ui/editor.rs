use anyhow::{Context, Result, bail};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::EditorInput;
use crate::consts::SCRIPT_EXTENSION;

/// Read a script file. Only `.petl` files are accepted.
pub fn read_script(path: &Path) -> Result<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(SCRIPT_EXTENSION) {
        bail!(
            "script {} requires extension .{SCRIPT_EXTENSION}",
            path.display()
        );
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// A line-oriented script buffer filled from the REPL.
#[derive(Debug, Default)]
pub struct Editor {
    buffer: Mutex<String>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    fn buffer(&self) -> MutexGuard<'_, String> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one line. Blank lines are kept; they may matter to the script.
    pub fn push_line(&self, line: &str) {
        let mut buffer = self.buffer();
        buffer.push_str(line);
        buffer.push('\n');
    }

    /// Replace the whole buffer.
    pub fn set(&self, text: &str) {
        *self.buffer() = text.to_string();
    }

    pub fn clear(&self) {
        self.buffer().clear();
    }

    pub fn line_count(&self) -> usize {
        self.buffer().lines().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }
}

impl EditorInput for Editor {
    fn text(&self) -> String {
        self.buffer().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let editor = Editor::new();
        assert!(editor.is_empty());
        assert_eq!(editor.text(), "");
        assert_eq!(editor.line_count(), 0);
    }

    #[test]
    fn push_line_keeps_line_breaks() {
        let editor = Editor::new();
        editor.push_line("x = 1");
        editor.push_line("");
        editor.push_line("print(x)");
        assert_eq!(editor.text(), "x = 1\n\nprint(x)\n");
        assert_eq!(editor.line_count(), 3);
    }

    #[test]
    fn read_script_requires_petl_extension() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("script.txt");
        std::fs::write(&txt, "1+1").unwrap();
        let err = read_script(&txt).unwrap_err();
        assert!(err.to_string().contains(".petl"));
    }

    #[test]
    fn read_script_returns_content_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.petl");
        std::fs::write(&path, "  x = 1\n\n").unwrap();
        assert_eq!(read_script(&path).unwrap(), "  x = 1\n\n");
    }

    #[test]
    fn read_script_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_script(&dir.path().join("nope.petl")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn set_replaces_and_clear_empties() {
        let editor = Editor::new();
        editor.push_line("old");
        editor.set("new");
        assert_eq!(editor.text(), "new");
        editor.clear();
        assert!(editor.is_empty());
    }
}
