use crate::config::Config;
use crate::core::error::ChatError;

use rustyline::error::ReadlineError;
use rustyline::{CompletionType, DefaultEditor, EditMode};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub const PROMPT: &str = "Enter your prompt (or 'exit' to quit): ";

/// Where the terminal loop gets its next line from.
pub trait PromptSource {
    /// `Ok(None)` means the input is finished.
    fn read_prompt(&mut self, prompt: &str) -> Result<Option<String>, ChatError>;

    /// Called once when the loop ends.
    fn finish(&mut self) -> Result<(), ChatError> {
        Ok(())
    }
}

/// Interactive line editor with persistent history
pub struct LineEditor {
    editor: DefaultEditor,
    history_path: PathBuf,
}

impl LineEditor {
    pub fn new() -> Result<Self, ChatError> {
        let config = rustyline::Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .build();

        let mut editor = DefaultEditor::with_config(config)
            .map_err(|e| ChatError::Input(format!("Failed to create line editor: {}", e)))?;

        let history_path = Config::input_history_path();
        let _ = editor.load_history(&history_path);

        Ok(Self {
            editor,
            history_path,
        })
    }

    fn save_history(&mut self) -> Result<(), ChatError> {
        if let Some(parent) = self.history_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ChatError::Input(format!("Failed to create history directory: {}", e))
                })?;
            }
        }

        self.editor
            .save_history(&self.history_path)
            .map_err(|e| ChatError::Input(format!("Failed to save history: {}", e)))
    }
}

impl PromptSource for LineEditor {
    fn read_prompt(&mut self, prompt: &str) -> Result<Option<String>, ChatError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str()).map_err(|e| {
                        ChatError::Input(format!("Failed to add history entry: {}", e))
                    })?;
                }
                Ok(Some(line))
            }
            // Ctrl-C / Ctrl-D
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(ChatError::Input(format!("Input error: {}", err))),
        }
    }

    fn finish(&mut self) -> Result<(), ChatError> {
        self.save_history()
    }
}

/// Plain line reader for piped stdin
pub struct PipedInput<R> {
    reader: R,
}

impl<R: BufRead> PipedInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> PromptSource for PipedInput<R> {
    fn read_prompt(&mut self, prompt: &str) -> Result<Option<String>, ChatError> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

pub fn is_exit_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn exit_is_case_insensitive() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("EXIT"));
        assert!(is_exit_command("  Exit \n"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("quit"));
    }

    #[test]
    fn piped_input_strips_line_endings() {
        let mut input = PipedInput::new(Cursor::new("first\r\nsecond\n\nlast"));
        assert_eq!(input.read_prompt("").unwrap().as_deref(), Some("first"));
        assert_eq!(input.read_prompt("").unwrap().as_deref(), Some("second"));
        assert_eq!(input.read_prompt("").unwrap().as_deref(), Some(""));
        assert_eq!(input.read_prompt("").unwrap().as_deref(), Some("last"));
        assert_eq!(input.read_prompt("").unwrap(), None);
    }
}
