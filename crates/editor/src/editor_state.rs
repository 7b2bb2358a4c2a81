// Chunk: docs/chunks/editable_buffer - Editor state + key dispatch
// Chunk: docs/chunks/file_save - File-buffer association and Ctrl+S save
// Chunk: docs/chunks/navigation_mode - Directory navigation buffer
//!
//! Editor state: the buffers and which one receives input.
//!
//! The editor owns three buffers. Exactly one of them is active at a time,
//! selected by [`ActiveBuffer`]:
//! - the main buffer holds the file being edited,
//! - the navigation buffer holds a directory listing,
//! - the minibuffer holds the answer to a [`Prompt`].
//!
//! Key events are resolved to commands by stateless functions, one per
//! active buffer kind. Every chord is a single modifier+key step, so no
//! chord state machine is needed.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use lite_edit_buffer::{BufferError, SelectionPolicy, TextBuffer};
use lite_edit_input::{Key, KeyEvent};

/// Spaces inserted by Tab.
pub const TAB_WIDTH: usize = 4;

// =============================================================================
// Active buffer selection
// =============================================================================

/// Question being asked in the minibuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Path to write the main buffer to
    SaveAs,
    /// Path to open
    FindFile,
}

impl Prompt {
    /// Text drawn in front of the minibuffer contents.
    pub fn label(&self) -> &'static str {
        match self {
            Prompt::SaveAs => "Save as: ",
            Prompt::FindFile => "Find file: ",
        }
    }
}

/// Which buffer key events are routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveBuffer {
    #[default]
    Main,
    Navigation,
    MiniBuffer(Prompt),
}

/// Result of handling an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The event was handled by the active buffer
    Yes,
    /// The event has no binding in the active buffer
    No,
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    /// The minibuffer was submitted without any text.
    #[error("no file name given")]
    EmptyPath,
}

// =============================================================================
// Commands
// =============================================================================

/// Commands bound in the main buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Insert a printable byte at the cursor
    InsertByte(u8),
    InsertNewline,
    /// Insert [`TAB_WIDTH`] spaces
    InsertTab,
    /// Delete the byte before the cursor (Backspace)
    DeleteBackward,
    /// Delete the byte under the cursor (Delete key)
    DeleteForward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MoveToLineStart,
    MoveToLineEnd,
    SetMark,
    ClearMark,
    DeleteRegion,
    /// Write to the buffer's file, prompting for one if needed
    Save,
    /// Prompt for a file to open
    FindFile,
    /// List the directory of the current file
    Navigate,
}

/// Resolves a key event in the main buffer to a command.
pub fn resolve_command(event: &KeyEvent) -> Option<Command> {
    let mods = &event.modifiers;

    match event.key {
        // Ctrl chords (Emacs/vi flavoured motion plus file commands)
        Key::Char(ch) if mods.is_control() => match ch.to_ascii_lowercase() {
            'h' => Some(Command::MoveLeft),
            'l' => Some(Command::MoveRight),
            'k' => Some(Command::MoveUp),
            'j' => Some(Command::MoveDown),
            'a' => Some(Command::MoveToLineStart),
            'e' => Some(Command::MoveToLineEnd),
            'm' => Some(Command::SetMark),
            'g' => Some(Command::ClearMark),
            'w' => Some(Command::DeleteRegion),
            's' => Some(Command::Save),
            'o' => Some(Command::FindFile),
            ' ' => Some(Command::Navigate),
            _ => None,
        },

        // Printable ASCII (shift already applied)
        Key::Char(_) if !mods.control && !mods.alt => {
            event.key.printable_byte().map(Command::InsertByte)
        }

        Key::Return => Some(Command::InsertNewline),
        Key::Tab => Some(Command::InsertTab),
        Key::Backspace => Some(Command::DeleteBackward),
        Key::Delete => Some(Command::DeleteForward),
        Key::Left => Some(Command::MoveLeft),
        Key::Right => Some(Command::MoveRight),
        Key::Up => Some(Command::MoveUp),
        Key::Down => Some(Command::MoveDown),
        Key::Home => Some(Command::MoveToLineStart),
        Key::End => Some(Command::MoveToLineEnd),
        Key::Escape => Some(Command::ClearMark),

        _ => None,
    }
}

/// Commands bound in the navigation buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavCommand {
    Up,
    Down,
    Open,
    Leave,
}

fn resolve_nav_command(event: &KeyEvent) -> Option<NavCommand> {
    match event.key {
        Key::Char('k') | Key::Up => Some(NavCommand::Up),
        Key::Char('j') | Key::Down => Some(NavCommand::Down),
        Key::Return => Some(NavCommand::Open),
        Key::Escape => Some(NavCommand::Leave),
        _ => None,
    }
}

/// Commands bound in the minibuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptCommand {
    Insert(u8),
    DeleteBackward,
    Submit,
    Cancel,
}

fn resolve_prompt_command(event: &KeyEvent) -> Option<PromptCommand> {
    let mods = &event.modifiers;
    match event.key {
        Key::Char(_) if !mods.control && !mods.alt => {
            event.key.printable_byte().map(PromptCommand::Insert)
        }
        Key::Backspace => Some(PromptCommand::DeleteBackward),
        Key::Return => Some(PromptCommand::Submit),
        Key::Escape => Some(PromptCommand::Cancel),
        Key::Char('g') if mods.is_control() => Some(PromptCommand::Cancel),
        _ => None,
    }
}

// =============================================================================
// Editor
// =============================================================================

/// The editor's buffers and input routing.
#[derive(Debug, Default)]
pub struct Editor {
    main: TextBuffer,
    navigation: TextBuffer,
    minibuffer: TextBuffer,
    active: ActiveBuffer,
    policy: SelectionPolicy,
    /// Last error or notice, for display
    status: Option<String>,
}

impl Editor {
    /// Creates an editor with an empty, unnamed main buffer.
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            main: TextBuffer::new().with_selection_policy(policy),
            policy,
            ..Self::default()
        }
    }

    pub fn main_buffer(&self) -> &TextBuffer {
        &self.main
    }

    pub fn main_buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.main
    }

    pub fn navigation_buffer(&self) -> &TextBuffer {
        &self.navigation
    }

    pub fn minibuffer(&self) -> &TextBuffer {
        &self.minibuffer
    }

    pub fn active(&self) -> ActiveBuffer {
        self.active
    }

    /// The prompt being answered, if the minibuffer is active.
    pub fn prompt(&self) -> Option<Prompt> {
        match self.active {
            ActiveBuffer::MiniBuffer(prompt) => Some(prompt),
            _ => None,
        }
    }

    /// The buffer shown in the main view.
    ///
    /// While the minibuffer is up the main file stays on screen beneath it.
    pub fn document(&self) -> &TextBuffer {
        match self.active {
            ActiveBuffer::Navigation => &self.navigation,
            ActiveBuffer::Main | ActiveBuffer::MiniBuffer(_) => &self.main,
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    // ==================== Files ====================

    /// Opens `path`: a directory is listed in the navigation buffer, a file
    /// is loaded into the main buffer. A file that does not exist yet gives
    /// an empty main buffer that will be saved to `path`.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        let path = path.as_ref();
        if path.is_dir() {
            self.navigation.load(path)?;
            self.active = ActiveBuffer::Navigation;
            return Ok(());
        }

        match self.main.load(path) {
            Ok(()) => {
                self.status = Some(format!("Opened {}", path.display()));
            }
            Err(e) if e.io_error().map(io::Error::kind) == Some(io::ErrorKind::NotFound) => {
                let mut buffer = TextBuffer::new().with_selection_policy(self.policy);
                buffer.set_pathname(path);
                self.main = buffer;
                self.status = Some(format!("New file {}", path.display()));
            }
            Err(e) => return Err(e.into()),
        }
        self.main.set_selection_policy(self.policy);
        self.active = ActiveBuffer::Main;
        Ok(())
    }

    fn save(&mut self) -> Result<(), EditorError> {
        match self.main.pathname() {
            Some(_) => {
                self.main.save()?;
                self.report_saved();
            }
            None => self.start_prompt(Prompt::SaveAs),
        }
        Ok(())
    }

    fn report_saved(&mut self) {
        if let Some(path) = self.main.pathname() {
            info!(path = %path.display(), bytes = self.main.len(), "saved");
            self.status = Some(format!("Wrote {}", path.display()));
        }
    }

    /// Directory containing the main buffer's file, or the working directory.
    fn current_directory(&self) -> PathBuf {
        self.main
            .pathname()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    fn start_prompt(&mut self, prompt: Prompt) {
        self.minibuffer = TextBuffer::new();
        self.active = ActiveBuffer::MiniBuffer(prompt);
    }

    // ==================== Key dispatch ====================

    /// Routes a key event to the active buffer.
    ///
    /// On error the message is also kept as the status line.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<Handled, EditorError> {
        let result = match self.active {
            ActiveBuffer::Main => self.handle_main_key(event),
            ActiveBuffer::Navigation => self.handle_nav_key(event),
            ActiveBuffer::MiniBuffer(prompt) => self.handle_prompt_key(prompt, event),
        };
        if let Err(e) = &result {
            warn!(error = %e, "command failed");
            self.status = Some(e.to_string());
        }
        result
    }

    fn handle_main_key(&mut self, event: &KeyEvent) -> Result<Handled, EditorError> {
        let Some(cmd) = resolve_command(event) else {
            return Ok(Handled::No);
        };
        self.execute_command(cmd)?;
        Ok(Handled::Yes)
    }

    /// Executes a main-buffer command.
    pub fn execute_command(&mut self, cmd: Command) -> Result<(), EditorError> {
        let buffer = &mut self.main;
        match cmd {
            Command::InsertByte(b) => buffer.insert_text(&[b]),
            Command::InsertNewline => buffer.newline(),
            Command::InsertTab => buffer.insert_text(&[b' '; TAB_WIDTH]),
            Command::DeleteBackward => {
                buffer.delete_backward_char();
            }
            Command::DeleteForward => {
                buffer.delete_char();
            }
            Command::MoveLeft => buffer.backward_char(),
            Command::MoveRight => buffer.forward_char(),
            Command::MoveUp => buffer.previous_line(),
            Command::MoveDown => buffer.next_line(),
            Command::MoveToLineStart => buffer.move_beginning_of_line(),
            Command::MoveToLineEnd => buffer.move_end_of_line(),
            Command::SetMark => {
                buffer.set_mark();
                self.status = Some("Mark set".to_string());
            }
            Command::ClearMark => buffer.clear_mark(),
            Command::DeleteRegion => {
                buffer.delete_region();
            }
            Command::Save => self.save()?,
            Command::FindFile => self.start_prompt(Prompt::FindFile),
            Command::Navigate => {
                let dir = self.current_directory();
                self.navigation.load(&dir)?;
                debug!(dir = %dir.display(), "entered navigation");
                self.active = ActiveBuffer::Navigation;
            }
        }
        Ok(())
    }

    fn handle_nav_key(&mut self, event: &KeyEvent) -> Result<Handled, EditorError> {
        let Some(cmd) = resolve_nav_command(event) else {
            return Ok(Handled::No);
        };
        match cmd {
            NavCommand::Up => self.navigation.previous_line(),
            NavCommand::Down => self.navigation.next_line(),
            NavCommand::Leave => self.active = ActiveBuffer::Main,
            NavCommand::Open => {
                if let Some(target) = self.navigation.navigation_target()? {
                    self.open(target)?;
                }
            }
        }
        Ok(Handled::Yes)
    }

    fn handle_prompt_key(&mut self, prompt: Prompt, event: &KeyEvent) -> Result<Handled, EditorError> {
        let Some(cmd) = resolve_prompt_command(event) else {
            return Ok(Handled::No);
        };
        match cmd {
            PromptCommand::Insert(b) => self.minibuffer.insert_text(&[b]),
            PromptCommand::DeleteBackward => {
                self.minibuffer.delete_backward_char();
            }
            PromptCommand::Cancel => self.active = ActiveBuffer::Main,
            PromptCommand::Submit => self.submit_prompt(prompt)?,
        }
        Ok(Handled::Yes)
    }

    /// Acts on the minibuffer answer. On failure the prompt stays open so the
    /// answer can be corrected.
    fn submit_prompt(&mut self, prompt: Prompt) -> Result<(), EditorError> {
        let answer = self.minibuffer.content();
        if answer.is_empty() {
            return Err(EditorError::EmptyPath);
        }
        match prompt {
            Prompt::SaveAs => {
                self.main.save_as(&answer)?;
                self.report_saved();
                self.active = ActiveBuffer::Main;
            }
            Prompt::FindFile => self.open(&answer)?,
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
