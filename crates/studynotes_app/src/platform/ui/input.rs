//! Gesture parsing for the terminal front end.
//!
//! Each command line maps to exactly one gesture, the terminal's equivalent of
//! a UI listener.

use std::path::PathBuf;

use studynotes_core::{ArtifactKind, NoteType, UnknownNoteType};

pub const HELP: &str = "\
commands:
  upload                       click the upload area
  pick <path>                  choose a file in the picker
  drag | leave                 drag over / away from the upload area
  drop <path>                  drop a file on the upload area
  type detailed|concise|outline
  questions on|off             include practice questions
  direct on|off                compile PDF immediately (needs LaTeX on the server)
  overleaf on|off              use the external compiler
  process                      generate study notes
  compile                      compile the current job to PDF
  download latex|pdf           save an artifact into the download directory
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    UploadClick,
    Pick(Vec<PathBuf>),
    DragEnter,
    DragLeave,
    Drop(Vec<PathBuf>),
    NoteType(NoteType),
    IncludeQuestions(bool),
    CompileDirectly(bool),
    UseOverleaf(bool),
    Process,
    Compile,
    Download(ArtifactKind),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("'{command}' expects {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error(transparent)]
    NoteType(#[from] UnknownNoteType),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Gesture>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let gesture = match command.to_ascii_lowercase().as_str() {
        "upload" => Gesture::UploadClick,
        "pick" => Gesture::Pick(paths(rest)),
        "drag" => Gesture::DragEnter,
        "leave" => Gesture::DragLeave,
        "drop" => Gesture::Drop(paths(rest)),
        "type" => Gesture::NoteType(rest.parse()?),
        "questions" => Gesture::IncludeQuestions(switch("questions", rest)?),
        "direct" => Gesture::CompileDirectly(switch("direct", rest)?),
        "overleaf" => Gesture::UseOverleaf(switch("overleaf", rest)?),
        "process" => Gesture::Process,
        "compile" => Gesture::Compile,
        "download" => Gesture::Download(artifact(rest)?),
        "help" | "?" => Gesture::Help,
        "quit" | "exit" => Gesture::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Some(gesture))
}

/// The rest of the line is one path, so names with spaces need no quoting.
fn paths(rest: &str) -> Vec<PathBuf> {
    let rest = rest.trim_matches('"');
    if rest.is_empty() {
        Vec::new()
    } else {
        vec![PathBuf::from(rest)]
    }
}

fn switch(command: &'static str, rest: &str) -> Result<bool, InputError> {
    match rest.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(InputError::BadArgument {
            command,
            expected: "on or off",
        }),
    }
}

fn artifact(rest: &str) -> Result<ArtifactKind, InputError> {
    match rest.to_ascii_lowercase().as_str() {
        "latex" | "tex" => Ok(ArtifactKind::Latex),
        "pdf" => Ok(ArtifactKind::Pdf),
        _ => Err(InputError::BadArgument {
            command: "download",
            expected: "latex or pdf",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn pick_takes_rest_of_line_as_path() {
        assert_eq!(
            parse_line("pick  My Slides/week 1.pdf "),
            Ok(Some(Gesture::Pick(vec![PathBuf::from("My Slides/week 1.pdf")])))
        );
        assert_eq!(parse_line("drop"), Ok(Some(Gesture::Drop(Vec::new()))));
    }

    #[test]
    fn toggles_and_note_types_parse() {
        assert_eq!(
            parse_line("type Outline"),
            Ok(Some(Gesture::NoteType(NoteType::Outline)))
        );
        assert_eq!(
            parse_line("questions off"),
            Ok(Some(Gesture::IncludeQuestions(false)))
        );
        assert_eq!(
            parse_line("download pdf"),
            Ok(Some(Gesture::Download(ArtifactKind::Pdf)))
        );
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(
            parse_line("frobnicate"),
            Err(InputError::UnknownCommand("frobnicate".to_string()))
        );
        assert!(matches!(
            parse_line("direct maybe"),
            Err(InputError::BadArgument { command: "direct", .. })
        ));
        assert!(matches!(parse_line("type poem"), Err(InputError::NoteType(_))));
    }
}
