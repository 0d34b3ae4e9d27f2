//! Console abstraction
//!
//! The interactive flow reads and writes through this trait so tests can
//! script the dialogue instead of touching stdin/stdout.

use std::io::{BufRead, Write as _};

/// Console input/output used by the interactive import flow
pub trait ConsoleIo {
    /// Write without a trailing newline
    fn write(&self, message: &str);
    /// Write a full line
    fn write_line(&self, message: &str);
    /// Read one line of input; `None` on EOF
    fn read_line(&self) -> Option<String>;
}

/// Standard console backed by stdin/stdout
#[derive(Debug, Default, Clone)]
pub struct StdConsole;

impl ConsoleIo for StdConsole {
    fn write(&self, message: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(message.as_bytes());
        let _ = stdout.flush();
    }

    fn write_line(&self, message: &str) {
        println!("{message}");
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::scripted::ScriptedConsole;
    use super::*;

    #[test]
    fn test_scripted_console_replays_inputs() {
        let console = ScriptedConsole::with_inputs(&["first", "second"]);
        assert_eq!(console.read_line().as_deref(), Some("first"));
        assert_eq!(console.read_line().as_deref(), Some("second"));
        assert_eq!(console.read_line(), None);
    }

    #[test]
    fn test_scripted_console_captures_output() {
        let console = ScriptedConsole::with_inputs(&[]);
        console.write("a");
        console.write_line("b");
        assert_eq!(console.output(), "ab\n");
    }
}
