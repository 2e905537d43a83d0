use crate::state::{Id, Message, Reply};

/// A line of the conversation as the user sees it. `Pending` entries exist
/// only locally until the backend answers.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Pending(Message),
    Confirmed(Message),
}

impl Entry {
    pub fn message(&self) -> &Message {
        match self {
            Entry::Pending(message) | Entry::Confirmed(message) => message,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Entry::Pending(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn from_history(history: Vec<Message>) -> Self {
        Self {
            entries: history.into_iter().map(Entry::Confirmed).collect(),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends the outgoing message as pending and hands back the prompt to
    /// post. Blank input is not a message.
    pub fn begin(&mut self, input: &str) -> Option<String> {
        if input.trim().is_empty() {
            return None;
        }
        self.entries
            .push(Entry::Pending(Message::human(input.to_string())));
        Some(input.to_string())
    }

    /// The backend accepted the prompt: confirm what was pending and append
    /// its answer.
    pub fn answer(&mut self, reply: &Reply) {
        for entry in &mut self.entries {
            if let Entry::Pending(message) = entry {
                *entry = Entry::Confirmed(message.clone());
            }
        }
        self.entries.push(Entry::Confirmed(Message::ai(
            reply.message.clone(),
            reply.sources.clone(),
        )));
    }

    /// Replaces everything with the backend's own ordered history.
    pub fn reconcile(&mut self, history: Vec<Message>) {
        *self = Self::from_history(history);
    }

    /// The send failed: forget what never reached the backend.
    pub fn rollback(&mut self) {
        self.entries.retain(|entry| !entry.is_pending());
    }
}

/// Where the chat page is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatPhase {
    NoChatSelected,
    HistoryLoading(Id),
    HistoryLoaded(Id),
}

impl ChatPhase {
    pub fn active(&self) -> Option<&Id> {
        match self {
            ChatPhase::NoChatSelected => None,
            ChatPhase::HistoryLoading(id) | ChatPhase::HistoryLoaded(id) => Some(id),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ChatPhase::HistoryLoading(_))
    }

    /// A send during history loading would be overwritten by the older
    /// snapshot once it arrives.
    pub fn accepts_input(&self) -> bool {
        !self.is_loading()
    }
}

/// First characters of a chat id for the header.
pub fn short_id(id: &Id) -> String {
    id.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(message: &str, chat_id: &str) -> Reply {
        Reply {
            message: message.to_string(),
            sources: Some("(id=ab, city_name=Oslo)".to_string()),
            chat_id: Id::from(chat_id),
        }
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut transcript = Transcript::from_history(vec![Message::human("hi")]);
        let before = transcript.clone();
        assert_eq!(transcript.begin(""), None);
        assert_eq!(transcript.begin("   \n\t"), None);
        assert_eq!(transcript, before);
    }

    #[test]
    fn send_goes_from_pending_to_confirmed() {
        let mut transcript = Transcript::default();
        assert_eq!(transcript.begin("Where to surf?").as_deref(), Some("Where to surf?"));
        assert!(transcript.entries()[0].is_pending());

        transcript.answer(&reply("Try Ericeira.", "c1"));
        assert_eq!(
            transcript.entries(),
            &[
                Entry::Confirmed(Message::human("Where to surf?")),
                Entry::Confirmed(Message::ai(
                    "Try Ericeira.",
                    Some("(id=ab, city_name=Oslo)".to_string())
                )),
            ]
        );
    }

    #[test]
    fn reconcile_takes_backend_sequence_verbatim() {
        let mut transcript = Transcript::from_history(vec![Message::human("old")]);
        transcript.begin("local only");
        let history = vec![
            Message::human("old"),
            Message::ai("first", None),
            Message::human("second"),
            Message::ai("third", None),
        ];
        transcript.reconcile(history.clone());
        let messages: Vec<Message> = transcript
            .entries()
            .iter()
            .map(|entry| entry.message().clone())
            .collect();
        assert_eq!(messages, history);
        assert!(transcript.entries().iter().all(|entry| !entry.is_pending()));
    }

    #[test]
    fn rollback_drops_only_pending() {
        let mut transcript = Transcript::from_history(vec![Message::ai("welcome", None)]);
        transcript.begin("lost message");
        transcript.rollback();
        assert_eq!(
            transcript.entries(),
            &[Entry::Confirmed(Message::ai("welcome", None))]
        );
    }

    #[test]
    fn phases() {
        assert_eq!(ChatPhase::NoChatSelected.active(), None);
        let loading = ChatPhase::HistoryLoading(Id::Num(4));
        assert!(loading.is_loading());
        assert_eq!(loading.active(), Some(&Id::Num(4)));
        assert!(!ChatPhase::HistoryLoaded(Id::Num(4)).is_loading());
        assert!(!loading.accepts_input());
        assert!(ChatPhase::NoChatSelected.accepts_input());
        assert!(ChatPhase::HistoryLoaded(Id::Num(4)).accepts_input());
        assert_eq!(short_id(&Id::from("0123456789abcdef")), "01234567");
        assert_eq!(short_id(&Id::Num(12)), "12");
    }
}
