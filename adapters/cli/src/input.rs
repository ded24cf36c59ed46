use geocoin_core::Direction;
use geocoin_rendering::CacheHandle;

/// Help text listing every command the prompt accepts.
pub(crate) const HELP: &str = "\
commands:
  n | s | e | w              move one cell north, south, east or west
  collect <cache>            empty a cache into your purse
  deposit <cache> <amount>   move coins from your purse into a cache
  caches                     list nearby caches
  gps on | gps off           follow the device location or move manually
  wait [fixes]               wait for location fixes while gps is on
  regen                      redraw the neighborhood
  save                       save the session
  share                      print a share code for the session
  reset                      discard all progress
  quit                       save and exit";

/// A single line typed at the prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Move(Direction),
    Collect(CacheHandle),
    Deposit { handle: CacheHandle, amount: String },
    Caches,
    Gps(bool),
    Wait(usize),
    Regenerate,
    Save,
    Share,
    Reset,
    Help,
    Quit,
}

/// Reasons a prompt line could not be understood.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum InputError {
    #[error("type `help` to list commands")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{0}` is not a cache handle")]
    InvalidHandle(String),
    #[error("`{0}` is not a number of fixes")]
    InvalidCount(String),
    #[error("`gps` expects `on` or `off`")]
    InvalidToggle,
}

const DEFAULT_WAIT_FIXES: usize = 1;

/// Parses a prompt line.
pub(crate) fn parse(line: &str) -> Result<Input, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err(InputError::Empty);
    };

    let input = match command.to_ascii_lowercase().as_str() {
        "n" | "north" => Input::Move(Direction::North),
        "s" | "south" => Input::Move(Direction::South),
        "e" | "east" => Input::Move(Direction::East),
        "w" | "west" => Input::Move(Direction::West),
        "collect" | "c" => Input::Collect(handle(words.next(), "collect")?),
        "deposit" | "d" => {
            let handle = handle(words.next(), "deposit")?;
            let amount = words.collect::<Vec<_>>().join(" ");
            if amount.is_empty() {
                return Err(InputError::MissingArgument {
                    command: "deposit",
                    expected: "an amount",
                });
            }
            Input::Deposit { handle, amount }
        }
        "caches" | "ls" => Input::Caches,
        "gps" => match words.next() {
            Some("on") => Input::Gps(true),
            Some("off") => Input::Gps(false),
            _ => return Err(InputError::InvalidToggle),
        },
        "wait" => match words.next() {
            None => Input::Wait(DEFAULT_WAIT_FIXES),
            Some(count) => Input::Wait(
                count
                    .parse()
                    .map_err(|_| InputError::InvalidCount(count.to_owned()))?,
            ),
        },
        "regen" => Input::Regenerate,
        "save" => Input::Save,
        "share" => Input::Share,
        "reset" => Input::Reset,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        _ => return Err(InputError::Unknown(command.to_owned())),
    };
    Ok(input)
}

fn handle(word: Option<&str>, command: &'static str) -> Result<CacheHandle, InputError> {
    let word = word.ok_or(InputError::MissingArgument {
        command,
        expected: "a cache handle",
    })?;
    word.trim_start_matches('#')
        .parse::<u64>()
        .map(CacheHandle::new)
        .map_err(|_| InputError::InvalidHandle(word.to_owned()))
}
