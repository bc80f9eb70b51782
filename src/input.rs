use log::warn;
use std::io::{self, BufRead};
use std::sync::mpsc::Sender;

use crate::autoland::LandingMode;
use crate::channels::{PITCH, ROLL, THROTTLE, YAW};

/// One manual command from the operator. Axis commands apply a single step
/// in the frame that consumes them; uppercase axis commands use the fast
/// step, like holding shift in the original key map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Axis { idx: usize, dir: i8, fast: bool },
    AuxToggle(usize),
    ArmToggle,
    KillThrottle,
    ResetAux,
    Land(LandingMode),
    Back,
    Abort,
    Quit,
}

pub fn parse_command(line: &str) -> Option<InputEvent> {
    let axis = |idx, dir, fast| Some(InputEvent::Axis { idx, dir, fast });

    match line {
        "r+" => axis(ROLL, 1, false),
        "r-" => axis(ROLL, -1, false),
        "R+" => axis(ROLL, 1, true),
        "R-" => axis(ROLL, -1, true),
        "p+" => axis(PITCH, 1, false),
        "p-" => axis(PITCH, -1, false),
        "P+" => axis(PITCH, 1, true),
        "P-" => axis(PITCH, -1, true),
        "t+" => axis(THROTTLE, 1, false),
        "t-" => axis(THROTTLE, -1, false),
        "T+" => axis(THROTTLE, 1, true),
        "T-" => axis(THROTTLE, -1, true),
        "y+" => axis(YAW, 1, false),
        "y-" => axis(YAW, -1, false),
        "Y+" => axis(YAW, 1, true),
        "Y-" => axis(YAW, -1, true),
        "aux5" => Some(InputEvent::AuxToggle(4)),
        "aux6" => Some(InputEvent::AuxToggle(5)),
        "aux7" => Some(InputEvent::AuxToggle(6)),
        "arm" => Some(InputEvent::ArmToggle),
        "kill" => Some(InputEvent::KillThrottle),
        "reset" => Some(InputEvent::ResetAux),
        "land" => Some(InputEvent::Land(LandingMode::Fast)),
        "back" => Some(InputEvent::Back),
        "abort" => Some(InputEvent::Abort),
        "quit" => Some(InputEvent::Quit),
        other => match other.strip_prefix("land ") {
            Some(mode) => Some(InputEvent::Land(LandingMode::from_name(mode.trim()))),
            None => None,
        },
    }
}

/// Reads line commands from stdin and forwards them to the frame loop.
/// Ends when stdin closes or the receiving side is gone.
pub fn input_thread(tx: Sender<InputEvent>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("[input] read error: {}", e);
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_command(trimmed) {
            Some(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            None => warn!("[input] unknown command: {}", trimmed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_commands_parse() {
        assert_eq!(
            parse_command("r+"),
            Some(InputEvent::Axis { idx: ROLL, dir: 1, fast: false })
        );
        assert_eq!(
            parse_command("T-"),
            Some(InputEvent::Axis { idx: THROTTLE, dir: -1, fast: true })
        );
        assert_eq!(
            parse_command("y-"),
            Some(InputEvent::Axis { idx: YAW, dir: -1, fast: false })
        );
    }

    #[test]
    fn land_modes_parse_with_fast_default() {
        assert_eq!(parse_command("land"), Some(InputEvent::Land(LandingMode::Fast)));
        assert_eq!(parse_command("land slow"), Some(InputEvent::Land(LandingMode::Slow)));
        // unknown mode names silently fall back to fast
        assert_eq!(parse_command("land gently"), Some(InputEvent::Land(LandingMode::Fast)));
    }

    #[test]
    fn switch_commands_parse() {
        assert_eq!(parse_command("aux5"), Some(InputEvent::AuxToggle(4)));
        assert_eq!(parse_command("arm"), Some(InputEvent::ArmToggle));
        assert_eq!(parse_command("kill"), Some(InputEvent::KillThrottle));
        assert_eq!(parse_command("back"), Some(InputEvent::Back));
        assert_eq!(parse_command("abort"), Some(InputEvent::Abort));
    }

    #[test]
    fn junk_is_rejected() {
        assert_eq!(parse_command("x+"), None);
        assert_eq!(parse_command("aux8"), None);
        assert_eq!(parse_command("landing"), None);
    }
}
