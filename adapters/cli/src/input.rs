use std::{
    io::{self, BufRead},
    sync::mpsc::Sender,
    thread,
};

use hunters_core::Direction;
use hunters_session::PlayerCommand;

/// One parsed line of terminal input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    /// Gameplay keys, in the order they were typed.
    Commands(Vec<PlayerCommand>),
    /// Answer to a yes/no prompt.
    Answer(bool),
}

/// Parses a line into gameplay commands or a prompt answer.
///
/// `w`/`a`/`s`/`d` walk, the uppercase keys sprint, `t` lays a trap and `q`
/// forfeits. Unknown characters are skipped.
pub(crate) fn parse_line(line: &str) -> Input {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "y" | "yes" | "si" | "sí" => return Input::Answer(true),
        "n" | "no" => return Input::Answer(false),
        _ => {}
    }
    Input::Commands(trimmed.chars().filter_map(parse_key).collect())
}

fn parse_key(key: char) -> Option<PlayerCommand> {
    let direction = match key.to_ascii_lowercase() {
        'w' => Direction::Up,
        's' => Direction::Down,
        'a' => Direction::Left,
        'd' => Direction::Right,
        't' => return Some(PlayerCommand::PlaceTrap),
        'q' => return Some(PlayerCommand::Forfeit),
        _ => return None,
    };
    Some(PlayerCommand::Move {
        direction,
        sprint: key.is_ascii_uppercase(),
    })
}

/// Reads stdin on a background thread, forwarding parsed lines.
///
/// The thread exits, dropping `sender`, when stdin closes or the receiver
/// goes away.
pub(crate) fn spawn_reader(sender: Sender<Input>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-reader".to_owned())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if sender.send(parse_line(&line)).is_err() {
                    break;
                }
            }
        })
}
