/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// `/peer <id>` selects a counterpart; `/peer` alone clears it.
    Peer(Option<String>),
    Call,
    End,
    Mute,
    Video,
    Share,
    Unshare,
    Help,
    Quit,
    Chat(String),
    Unknown(String),
    Empty,
}

pub const HELP: &str = "\
/peer <id>   select who to call (/peer alone clears)
/call        call the selected peer
/end         hang up
/mute        toggle the microphone
/video       toggle the camera
/share       share the screen
/unshare     go back to the camera
/quit        leave
anything else is sent as chat";

pub fn parse(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Chat(line.to_owned());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "peer" if arg.is_empty() => Input::Peer(None),
        "peer" => Input::Peer(Some(arg.to_owned())),
        "call" => Input::Call,
        "end" => Input::End,
        "mute" => Input::Mute,
        "video" => Input::Video,
        "share" => Input::Share,
        "unshare" => Input::Unshare,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_owned()),
    }
}
