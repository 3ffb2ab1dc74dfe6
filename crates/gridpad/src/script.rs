//! Key scripts: comma-separated input events replayed against an editor.
use anyhow::{bail, Context, Result};
use gridpad_core::{Axis, Direction, Editor, GridSize, LayoutMode, Motion};

/// One scripted input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Motion),
    Enter,
    Delete,
    Backspace,
    Mode(LayoutMode),
    Text(String),
    Scroll(Direction, usize),
    Resize(GridSize),
}

/// Parses a script such as `down,end,text:abc,enter,scroll-down:3`.
/// Empty tokens are skipped.
pub fn parse(script: &str) -> Result<Vec<Command>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| parse_token(token).with_context(|| format!("bad key '{token}'")))
        .collect()
}

fn parse_token(token: &str) -> Result<Command> {
    if let Some(text) = token.strip_prefix("text:") {
        return Ok(Command::Text(text.to_string()));
    }
    if let Some((name, arg)) = token.split_once(':') {
        let direction = match name {
            "scroll-up" => Direction::Up,
            "scroll-down" => Direction::Down,
            "scroll-left" => Direction::Left,
            "scroll-right" => Direction::Right,
            "resize" => return parse_resize(arg),
            _ => bail!("unknown command '{name}'"),
        };
        let count = arg.parse().with_context(|| format!("invalid count '{arg}'"))?;
        return Ok(Command::Scroll(direction, count));
    }

    let command = match token {
        "up" => Command::Move(Motion::Up),
        "down" => Command::Move(Motion::Down),
        "left" => Command::Move(Motion::Left),
        "right" => Command::Move(Motion::Right),
        "home" => Command::Move(Motion::Home),
        "end" => Command::Move(Motion::End),
        "pgup" => Command::Move(Motion::PageUp),
        "pgdn" => Command::Move(Motion::PageDown),
        "enter" => Command::Enter,
        "del" => Command::Delete,
        "bs" => Command::Backspace,
        "wrap" => Command::Mode(LayoutMode::Wrap),
        "fixed" => Command::Mode(LayoutMode::Fixed),
        _ => bail!("unknown key"),
    };
    Ok(command)
}

fn parse_resize(arg: &str) -> Result<Command> {
    let (columns, rows) = arg
        .split_once('x')
        .with_context(|| format!("expected COLUMNSxROWS, got '{arg}'"))?;
    let columns = columns.parse().with_context(|| format!("invalid columns '{columns}'"))?;
    let rows = rows.parse().with_context(|| format!("invalid rows '{rows}'"))?;
    Ok(Command::Resize(GridSize::new(columns, rows)))
}

/// Applies one command.
///
/// Horizontal scrolling in Wrap mode is skipped with a warning rather than
/// treated as an error.
pub fn apply(editor: &mut Editor, command: &Command) -> Result<()> {
    match command {
        Command::Move(motion) => {
            editor.navigate(*motion);
        }
        Command::Enter => {
            editor.insert_line_break()?;
        }
        Command::Delete => {
            editor.delete_forward()?;
        }
        Command::Backspace => {
            editor.backspace()?;
        }
        Command::Mode(mode) => {
            editor.switch_mode(*mode);
        }
        Command::Text(text) => {
            editor.type_text(text.as_bytes())?;
        }
        Command::Scroll(direction, count) => {
            if direction.axis() == Axis::Horizontal && editor.mode() == LayoutMode::Wrap {
                tracing::warn!("Ignoring horizontal scroll in wrap mode");
                return Ok(());
            }
            editor.scroll(*count, *direction)?;
        }
        Command::Resize(window) => {
            editor.resize(*window);
        }
    }
    Ok(())
}
