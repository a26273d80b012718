use std::env;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use log::LevelFilter;
use notes_logging::{notes_error, notes_info, notes_warn};
use studynotes_core::{Controller, Effect, Msg, SelectedFile};
use studynotes_engine::{EngineHandle, ReqwestNotesApi};

use super::config::{self, AppConfig, CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui::input::{self, Gesture, HELP};
use super::ui::terminal::TerminalSurface;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

type App = Controller<TerminalSurface<io::Stdout>>;

enum Input {
    Gesture(Gesture),
    Invalid(String),
    Closed,
}

pub fn run_app() -> ExitCode {
    let config_path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let (config, config_error) = match config::load(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    let destination = if config.log_to_file {
        LogDestination::File
    } else {
        LogDestination::Terminal
    };
    logging::initialize(destination, config.level().unwrap_or(LevelFilter::Info));
    if let Some(err) = config_error {
        notes_warn!("{}; using defaults", err);
    }
    if config.level().is_none() {
        notes_warn!("Unknown log level '{}'; using info", config.log_level);
    }
    notes_info!("Study-notes client starting, service at {}", config.origin);

    let api = match ReqwestNotesApi::new(config.service_settings()) {
        Ok(api) => api,
        Err(err) => {
            notes_error!("Cannot build service client: {}", err);
            eprintln!("studynotes: {err}");
            return ExitCode::FAILURE;
        }
    };
    let engine = match EngineHandle::new(Arc::new(api)) {
        Ok(engine) => engine,
        Err(err) => {
            notes_error!("Cannot start engine runtime: {}", err);
            eprintln!("studynotes: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut runner = EffectRunner::new(engine);

    let (mut app, startup) = match Controller::new(TerminalSurface::new(io::stdout())) {
        Ok(bound) => bound,
        Err(err) => {
            notes_error!("{}", err);
            eprintln!("studynotes: {err}");
            return ExitCode::FAILURE;
        }
    };
    app.surface_mut().notice(HELP);
    run_effects(&mut app, &mut runner, startup);

    let input_rx = spawn_input_reader();
    let mut input_open = true;
    loop {
        if input_open {
            match input_rx.recv_timeout(POLL_INTERVAL) {
                Ok(Input::Gesture(Gesture::Quit)) => break,
                Ok(Input::Gesture(Gesture::Help)) => app.surface_mut().notice(HELP),
                Ok(Input::Gesture(gesture)) => {
                    let (msg, problems) = gesture_msg(gesture);
                    for problem in &problems {
                        app.surface_mut().notice(problem);
                    }
                    dispatch(&mut app, &mut runner, msg);
                }
                Ok(Input::Invalid(reason)) => app.surface_mut().notice(&reason),
                Ok(Input::Closed) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                    notes_info!("Input closed; {} request(s) pending", runner.pending());
                    input_open = false;
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
            }
        } else {
            thread::sleep(POLL_INTERVAL);
        }

        while let Some(msg) = runner.next_msg() {
            dispatch(&mut app, &mut runner, msg);
        }

        // Piped input: let in-flight requests settle before leaving.
        if !input_open && runner.pending() == 0 {
            break;
        }
    }

    notes_info!("Study-notes client exiting");
    ExitCode::SUCCESS
}

fn dispatch(app: &mut App, runner: &mut EffectRunner, msg: Msg) {
    let effects = app.dispatch(msg);
    run_effects(app, runner, effects);
}

fn run_effects(app: &mut App, runner: &mut EffectRunner, effects: Vec<Effect>) {
    for effect in runner.enqueue(effects) {
        if effect == Effect::OpenFilePicker {
            app.surface_mut().notice("Choose a file: pick <path>");
        }
    }
}

fn spawn_input_reader() -> mpsc::Receiver<Input> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let input = match line {
                Ok(line) => match input::parse_line(&line) {
                    Ok(Some(gesture)) => Input::Gesture(gesture),
                    Ok(None) => continue,
                    Err(err) => Input::Invalid(err.to_string()),
                },
                Err(err) => {
                    notes_warn!("Reading input failed: {}", err);
                    break;
                }
            };
            if tx.send(input).is_err() {
                return;
            }
        }
        let _ = tx.send(Input::Closed);
    });
    rx
}

/// Maps a gesture to its message, plus any problems worth telling the user.
fn gesture_msg(gesture: Gesture) -> (Msg, Vec<String>) {
    let msg = match gesture {
        Gesture::UploadClick => Msg::UploadAreaClicked,
        Gesture::Pick(paths) => {
            let (files, problems) = load_files(&paths);
            return (Msg::FilesPicked(files), problems);
        }
        Gesture::DragEnter => Msg::DragEntered,
        Gesture::DragLeave => Msg::DragLeft,
        Gesture::Drop(paths) => {
            let (files, problems) = load_files(&paths);
            return (Msg::FilesDropped(files), problems);
        }
        Gesture::NoteType(note_type) => Msg::NoteTypeChanged(note_type),
        Gesture::IncludeQuestions(on) => Msg::IncludeQuestionsToggled(on),
        Gesture::CompileDirectly(on) => Msg::CompileDirectlyToggled(on),
        Gesture::UseOverleaf(on) => Msg::UseOverleafToggled(on),
        Gesture::Process => Msg::ProcessClicked,
        Gesture::Compile => Msg::CompileClicked,
        Gesture::Download(kind) => Msg::DownloadClicked(kind),
        Gesture::Help | Gesture::Quit => Msg::NoOp,
    };
    (msg, Vec::new())
}

/// Reads the given files into memory. Unreadable paths are skipped and reported.
fn load_files(paths: &[PathBuf]) -> (Vec<SelectedFile>, Vec<String>) {
    let mut files = Vec::new();
    let mut problems = Vec::new();
    for path in paths {
        match fs::read(path) {
            Ok(content) => files.push(SelectedFile::new(display_name(path), content)),
            Err(err) => {
                notes_warn!("Cannot read {:?}: {}", path, err);
                problems.push(format!("Cannot read {}: {err}", path.display()));
            }
        }
    }
    if paths.is_empty() {
        problems.push("No file given: pick <path>".to_string());
    }
    (files, problems)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn picked_files_are_loaded_by_base_name() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("week 3.pdf");
        fs::write(&path, b"%PDF-1.7").unwrap();
        let missing = temp.path().join("missing.pdf");

        let (Msg::FilesPicked(files), problems) =
            gesture_msg(Gesture::Pick(vec![missing.clone(), path]))
        else {
            panic!("expected FilesPicked");
        };
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "week 3.pdf");
        assert_eq!(files[0].size, 8);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with(&format!("Cannot read {}", missing.display())));
    }

    #[test]
    fn gestures_map_to_messages() {
        assert_eq!(
            gesture_msg(Gesture::UploadClick),
            (Msg::UploadAreaClicked, Vec::new())
        );
        assert_eq!(gesture_msg(Gesture::DragLeave).0, Msg::DragLeft);
        assert_eq!(
            gesture_msg(Gesture::UseOverleaf(true)).0,
            Msg::UseOverleafToggled(true)
        );
    }

    #[test]
    fn unreadable_drop_is_reported_and_selects_nothing() {
        let temp = TempDir::new().unwrap();
        let typo = temp.path().join("typo.pdf");

        let (msg, problems) = gesture_msg(Gesture::Drop(vec![typo]));
        assert_eq!(msg, Msg::FilesDropped(Vec::new()));
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("typo.pdf"));

        let (_, problems) = gesture_msg(Gesture::Pick(Vec::new()));
        assert_eq!(problems, vec!["No file given: pick <path>".to_string()]);
    }
}
