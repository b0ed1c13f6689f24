//! Instruction DSL
//!
//! The constrained vocabulary the model is allowed to drive the game with.
//! Model responses are parsed into `Action` values line by line; anything
//! outside the whitelist is rejected before a single input event is sent.
//! This is the trust boundary between generated text and the live desktop.
//!
//! One instruction per line. `#` starts a comment; blank lines are ignored.
//!
//! ```text
//! move up 1.5        # hold W for 1.5 seconds
//! press e 0.3        # hold an arbitrary key
//! tap 3              # single key tap (switch item slot)
//! click left         # mouse click
//! click right 640 360
//! cursor 640 360     # move the mouse cursor
//! scroll -2
//! wait 0.5
//! ```

pub mod backend;
pub mod executor;

pub use backend::{InputBackend, RecordingBackend, XdotoolBackend};
pub use executor::ActionExecutor;

use crate::error::PilotError;

/// Longest a single key may be held, in seconds.
const MAX_HOLD_SECS: f64 = 10.0;
/// Longest a single `wait` may pause, in seconds.
const MAX_WAIT_SECS: f64 = 30.0;
/// Largest scroll magnitude per instruction.
const MAX_SCROLL: i32 = 20;
/// Key hold duration when the instruction omits one.
const DEFAULT_HOLD_SECS: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDir {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDir {
    /// The movement key this direction maps to (WASD layout).
    pub fn key(&self) -> &'static str {
        match self {
            MoveDir::Up => "w",
            MoveDir::Down => "s",
            MoveDir::Left => "a",
            MoveDir::Right => "d",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// One whitelisted input action.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Move { dir: MoveDir, secs: f64 },
    Press { key: String, secs: f64 },
    Tap { key: String },
    Click { button: MouseButton, at: Option<(i32, i32)> },
    Cursor { x: i32, y: i32 },
    Scroll { amount: i32 },
    Wait { secs: f64 },
}

/// Parse an instruction block into actions.
///
/// Fails on the first line that is not a whitelisted instruction; the
/// caller treats that as an `ExecutionError` for the cycle.
pub fn parse_script(block: &str) -> Result<Vec<Action>, PilotError> {
    let mut actions = Vec::new();

    for (lineno, raw) in block.lines().enumerate() {
        let line = match raw.find('#') {
            Some(idx) => &raw[..idx],
            None => raw,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let action = parse_line(line)
            .map_err(|msg| PilotError::execution(format!("line {}: {}", lineno + 1, msg)))?;
        actions.push(action);
    }

    Ok(actions)
}

fn parse_line(line: &str) -> Result<Action, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (verb, args) = tokens.split_first().expect("line is non-empty");

    match verb.to_ascii_lowercase().as_str() {
        "move" => parse_move(args),
        "press" => parse_press(args),
        "tap" => match args {
            [key] => Ok(Action::Tap {
                key: normalize_key(key)?,
            }),
            _ => Err("usage: tap <key>".to_string()),
        },
        "click" => parse_click(args),
        "cursor" => match args {
            [x, y] => Ok(Action::Cursor {
                x: parse_coord(x)?,
                y: parse_coord(y)?,
            }),
            _ => Err("usage: cursor <x> <y>".to_string()),
        },
        "scroll" => match args {
            [amount] => {
                let amount: i32 = amount
                    .parse()
                    .map_err(|_| format!("bad scroll amount `{}`", amount))?;
                Ok(Action::Scroll {
                    amount: amount.clamp(-MAX_SCROLL, MAX_SCROLL),
                })
            }
            _ => Err("usage: scroll <amount>".to_string()),
        },
        "wait" => match args {
            [secs] => Ok(Action::Wait {
                secs: parse_secs(secs, MAX_WAIT_SECS)?,
            }),
            _ => Err("usage: wait <seconds>".to_string()),
        },
        other => Err(format!("unknown instruction `{}`", other)),
    }
}

fn parse_move(args: &[&str]) -> Result<Action, String> {
    let (dir, rest) = match args.split_first() {
        Some(split) => split,
        None => return Err("usage: move <up|down|left|right> [seconds]".to_string()),
    };
    let dir = match dir.to_ascii_lowercase().as_str() {
        "up" => MoveDir::Up,
        "down" => MoveDir::Down,
        "left" => MoveDir::Left,
        "right" => MoveDir::Right,
        other => return Err(format!("unknown direction `{}`", other)),
    };
    let secs = match rest {
        [] => DEFAULT_HOLD_SECS,
        [secs] => parse_secs(secs, MAX_HOLD_SECS)?,
        _ => return Err("usage: move <up|down|left|right> [seconds]".to_string()),
    };
    Ok(Action::Move { dir, secs })
}

fn parse_press(args: &[&str]) -> Result<Action, String> {
    match args {
        [key] => Ok(Action::Press {
            key: normalize_key(key)?,
            secs: DEFAULT_HOLD_SECS,
        }),
        [key, secs] => Ok(Action::Press {
            key: normalize_key(key)?,
            secs: parse_secs(secs, MAX_HOLD_SECS)?,
        }),
        _ => Err("usage: press <key> [seconds]".to_string()),
    }
}

fn parse_click(args: &[&str]) -> Result<Action, String> {
    let (button, coords) = match args {
        [] => (MouseButton::Left, &[][..]),
        ["left", rest @ ..] => (MouseButton::Left, rest),
        ["right", rest @ ..] => (MouseButton::Right, rest),
        rest => (MouseButton::Left, rest),
    };
    let at = match coords {
        [] => None,
        [x, y] => Some((parse_coord(x)?, parse_coord(y)?)),
        _ => return Err("usage: click [left|right] [<x> <y>]".to_string()),
    };
    Ok(Action::Click { button, at })
}

fn parse_secs(token: &str, max: f64) -> Result<f64, String> {
    let secs: f64 = token
        .parse()
        .map_err(|_| format!("bad duration `{}`", token))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("bad duration `{}`", token));
    }
    Ok(secs.min(max))
}

fn parse_coord(token: &str) -> Result<i32, String> {
    let v: i32 = token
        .parse()
        .map_err(|_| format!("bad coordinate `{}`", token))?;
    if v < 0 {
        return Err(format!("bad coordinate `{}`", token));
    }
    Ok(v)
}

/// Keys the model may touch, normalized to the names the input backend
/// understands. Single alphanumeric characters plus a small named set.
fn normalize_key(token: &str) -> Result<String, String> {
    let lower = token.to_ascii_lowercase();

    if lower.len() == 1 && lower.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Ok(lower);
    }

    let named = match lower.as_str() {
        "space" => "space",
        "tab" => "Tab",
        "enter" | "return" => "Return",
        "esc" | "escape" => "Escape",
        "shift" => "shift",
        "ctrl" | "control" => "ctrl",
        "alt" => "alt",
        "up" => "Up",
        "down" => "Down",
        "left" => "Left",
        "right" => "Right",
        _ => return Err(format!("key `{}` is not in the whitelist", token)),
    };
    Ok(named.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_instruction_form() {
        let script = concat!(
            "# morning routine\n",
            "move up 1.5\n",
            "press e 0.3\n",
            "tap 3\n",
            "click\n",
            "click right 640 360\n",
            "cursor 100 200\n",
            "scroll -2\n",
            "wait 0.5\n",
        );
        let actions = parse_script(script).unwrap();
        assert_eq!(actions.len(), 8);
        assert_eq!(
            actions[0],
            Action::Move {
                dir: MoveDir::Up,
                secs: 1.5
            }
        );
        assert_eq!(
            actions[4],
            Action::Click {
                button: MouseButton::Right,
                at: Some((640, 360))
            }
        );
        assert_eq!(actions[7], Action::Wait { secs: 0.5 });
    }

    #[test]
    fn move_defaults_its_hold_duration() {
        let actions = parse_script("move left").unwrap();
        assert_eq!(
            actions[0],
            Action::Move {
                dir: MoveDir::Left,
                secs: DEFAULT_HOLD_SECS
            }
        );
    }

    #[test]
    fn bare_coordinates_click_left() {
        let actions = parse_script("click 10 20").unwrap();
        assert_eq!(
            actions[0],
            Action::Click {
                button: MouseButton::Left,
                at: Some((10, 20))
            }
        );
    }

    #[test]
    fn unknown_instruction_is_rejected_with_line_number() {
        let err = parse_script("tap e\nexplode everything\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "got: {}", msg);
        assert!(msg.contains("explode"), "got: {}", msg);
    }

    #[test]
    fn unlisted_key_is_rejected() {
        assert!(parse_script("tap f13").is_err());
        assert!(parse_script("press delete 1").is_err());
    }

    #[test]
    fn named_keys_normalize() {
        let actions = parse_script("tap ESC\ntap Enter\npress SPACE 1").unwrap();
        assert_eq!(
            actions[0],
            Action::Tap {
                key: "Escape".to_string()
            }
        );
        assert_eq!(
            actions[1],
            Action::Tap {
                key: "Return".to_string()
            }
        );
    }

    #[test]
    fn durations_are_clamped() {
        let actions = parse_script("move up 9999\nwait 9999").unwrap();
        assert_eq!(
            actions[0],
            Action::Move {
                dir: MoveDir::Up,
                secs: MAX_HOLD_SECS
            }
        );
        assert_eq!(actions[1], Action::Wait { secs: MAX_WAIT_SECS });
    }

    #[test]
    fn negative_duration_is_rejected() {
        assert!(parse_script("wait -1").is_err());
        assert!(parse_script("move up -0.5").is_err());
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let actions = parse_script("\n# nothing yet\n   \ntap e # open inventory\n").unwrap();
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn empty_script_parses_to_no_actions() {
        assert!(parse_script("").unwrap().is_empty());
        assert!(parse_script("# only a comment").unwrap().is_empty());
    }
}
