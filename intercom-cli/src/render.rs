use colored::*;
use intercom::client::{CallState, ChatSender, ParticipantId, SessionPhase};

/// Turns successive state snapshots into terminal lines.
pub struct StatePrinter {
    self_id: ParticipantId,
    last: CallState,
}

impl StatePrinter {
    pub fn new(self_id: ParticipantId, initial: CallState) -> Self {
        Self {
            self_id,
            last: initial,
        }
    }

    /// Lines describing what changed since the previous snapshot.
    pub fn update(&mut self, next: &CallState) -> Vec<String> {
        let mut lines = Vec::new();
        let last = &self.last;

        if next.room != last.room {
            if next.room.is_idle() {
                lines.push("no peer selected".dimmed().to_string());
            } else {
                lines.push(format!("room {}", next.room).dimmed().to_string());
            }
        }

        if next.phase != last.phase {
            lines.push(phase_line(next.phase));
        }

        if next.chat_ready && !last.chat_ready {
            lines.push("chat channel open".green().to_string());
        }

        if next.audio_on != last.audio_on && next.in_call {
            let text = if next.audio_on { "microphone on" } else { "microphone muted" };
            lines.push(text.yellow().to_string());
        }
        if next.video_on != last.video_on && next.in_call {
            let text = if next.video_on { "camera on" } else { "camera off" };
            lines.push(text.yellow().to_string());
        }
        if next.screen_sharing != last.screen_sharing {
            let text = if next.screen_sharing {
                "sharing screen"
            } else {
                "screen sharing stopped"
            };
            lines.push(text.yellow().to_string());
        }

        let peer = next
            .room
            .counterpart_of(&self.self_id)
            .map(|p| p.to_string())
            .unwrap_or_else(|| "peer".to_owned());
        for entry in next.messages.iter().skip(last.messages.len()) {
            let line = match entry.sender {
                ChatSender::Local => format!("{} {}", "you:".blue().bold(), entry.text),
                ChatSender::Remote => format!("{} {}", format!("{}:", peer).magenta().bold(), entry.text),
            };
            lines.push(line);
        }

        if let Some(error) = &next.last_error {
            if next.last_error != last.last_error {
                lines.push(format!("error: {}", error).red().to_string());
            }
        }

        self.last = next.clone();
        lines
    }
}

fn phase_line(phase: SessionPhase) -> String {
    let text = format!("call {}", phase);
    match phase {
        SessionPhase::Active => text.green().bold().to_string(),
        SessionPhase::Idle => text.yellow().to_string(),
        _ => text.cyan().to_string(),
    }
}
