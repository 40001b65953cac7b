use crate::{actor::EntityId, audio::Sounds, events::Event};

/// A Message to be routed by the Level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    /// The entity that sent this message.
    /// If None, then the Level sent the message.
    pub sender_entity_id: Option<EntityId>,

    /// The entity to which to route this Message.
    /// If None, the message is global: the Level processes it, and for Signals
    /// forwards it to every obstacle except the sender.
    pub recipient_entity_id: Option<EntityId>,

    /// The event payload describing whatever happened
    pub event: Event,
}

impl Message {
    fn new(sender: Option<EntityId>, recipient: Option<EntityId>, event: Event) -> Self {
        Message {
            sender_entity_id: sender,
            recipient_entity_id: recipient,
            event,
        }
    }
}

pub trait MessageHandler {
    fn handle_message(&mut self, message: &Message);
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    pub messages: Vec<Message>,
}

impl Dispatcher {
    pub fn entity_to_global(&mut self, sender: EntityId, event: Event) {
        self.messages.push(Message::new(Some(sender), None, event));
    }

    pub fn entity_to_entity(&mut self, sender: EntityId, recipient: EntityId, event: Event) {
        self.messages
            .push(Message::new(Some(sender), Some(recipient), event));
    }

    pub fn global_to_entity(&mut self, recipient: EntityId, event: Event) {
        self.messages
            .push(Message::new(None, Some(recipient), event));
    }

    /// Convenience for the common case of asking the level to play a sound.
    pub fn play_sound(&mut self, sound: Sounds) {
        self.messages
            .push(Message::new(None, None, Event::PlaySound(sound)));
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    // The Level owns the dispatcher and is also the message handler, so dispatch
    // can't borrow self. Callers drain() first and hand the batch to dispatch().
    pub fn dispatch(messages: &[Message], handler: &mut dyn MessageHandler) {
        for m in messages {
            handler.handle_message(m);
        }
    }

    /// Returns the current message buffer, and clears it.
    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }
}

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        received: Vec<Message>,
    }

    impl MessageHandler for Recorder {
        fn handle_message(&mut self, message: &Message) {
            self.received.push(*message);
        }
    }

    #[test]
    fn messages_dispatch_in_send_order() {
        let mut dispatcher = Dispatcher::default();
        dispatcher.entity_to_entity(1, 2, Event::Signal);
        dispatcher.entity_to_global(2, Event::Signal);
        dispatcher.play_sound(Sounds::Switch);
        dispatcher.global_to_entity(7, Event::PlayerDied);

        let messages = dispatcher.drain();
        assert!(dispatcher.is_empty());

        let mut recorder = Recorder::default();
        Dispatcher::dispatch(&messages, &mut recorder);
        assert_eq!(
            recorder.received,
            vec![
                Message::new(Some(1), Some(2), Event::Signal),
                Message::new(Some(2), None, Event::Signal),
                Message::new(None, None, Event::PlaySound(Sounds::Switch)),
                Message::new(None, Some(7), Event::PlayerDied),
            ]
        );
    }
}
