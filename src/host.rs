use crate::events::RawEvent;
use crate::manager::{panic_message, FrameManager};
use crossbeam::channel::{self, Receiver, SendError, Sender, TryRecvError};
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, trace};

/// Sends raw input events to a [`Host`].
///
/// Senders can be cloned and moved to other threads (e.g. the windowing backend's event thread).
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: Sender<RawEvent>,
}

impl EventSender {
    /// Queues an event. Fails only if the host has been dropped.
    pub fn send(&self, event: RawEvent) -> Result<(), SendError<RawEvent>> {
        self.sender.send(event)
    }
}

/// Connects an input backend to a frame manager.
///
/// Events are queued by any number of [`EventSender`]s and applied in arrival order when the
/// host is polled, on the thread that owns the frame manager.
#[derive(Debug)]
pub struct Host {
    event_send: Sender<RawEvent>,
    event_recv: Receiver<RawEvent>,
}

impl Host {
    pub fn new() -> Host {
        let (event_send, event_recv) = channel::unbounded();
        Host {
            event_send,
            event_recv,
        }
    }

    /// Returns a new sender for this host's event queue.
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.event_send.clone(),
        }
    }

    /// Applies all queued events to the frame manager. Returns the number of events applied.
    ///
    /// A panic while applying one event is logged and does not affect the following events.
    pub fn poll(&mut self, manager: &mut FrameManager) -> usize {
        let mut count = 0;
        loop {
            match self.event_recv.try_recv() {
                Ok(event) => {
                    self.recv_raw_event(manager, event);
                    count += 1;
                }
                Err(TryRecvError::Empty) => break,
                // the host holds a sender itself
                Err(TryRecvError::Disconnected) => break,
            }
        }
        count
    }

    fn recv_raw_event(&mut self, manager: &mut FrameManager, event: RawEvent) {
        trace!("raw event {:?}", event);
        let result = panic::catch_unwind(AssertUnwindSafe(|| manager.apply(event)));
        if let Err(payload) = result {
            error!("failed to apply event {:?}: {}", event, panic_message(&*payload));
        }
    }
}

impl Default for Host {
    fn default() -> Host {
        Host::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::events::{KeyCode, MouseButton};
    use crate::frame::Frame;
    use crate::widgets::TextInput;
    use std::thread;

    #[test]
    fn test_events_apply_in_order() {
        let mut manager = FrameManager::new(&Settings::default());
        let frame = Frame::create(manager.tree_mut(), "input", 300, 200);
        manager.add_frame(frame, 0, 0).unwrap();
        let input = manager.tree_mut().insert(TextInput::new("", 100, 30));
        Frame::set_main_panel(manager.tree_mut(), frame, input).unwrap();
        manager.tree_mut().validate_layout(frame);
        let position = manager.tree().screen_position(input);

        let mut host = Host::new();
        let sender = host.sender();
        let events = vec![
            RawEvent::MouseDown {
                button: MouseButton::Left,
                x: position.x + 2,
                y: position.y + 2,
            },
            RawEvent::MouseUp {
                button: MouseButton::Left,
            },
            RawEvent::CharTyped('h'),
            RawEvent::CharTyped('i'),
            RawEvent::KeyDown(KeyCode::Shift),
            RawEvent::CharTyped('!'),
        ];
        thread::spawn(move || {
            for event in events {
                sender.send(event).unwrap();
            }
        })
        .join()
        .unwrap();

        assert_eq!(host.poll(&mut manager), 6);
        assert_eq!(manager.tree().widget::<TextInput>(input).unwrap().text(), "hi!");
        assert!(manager.keys().is_shift_pressed());
        assert_eq!(host.poll(&mut manager), 0);
    }

    #[test]
    fn test_resize() {
        let mut manager = FrameManager::new(&Settings::default());
        let mut host = Host::new();
        host.sender()
            .send(RawEvent::Resize {
                width: 640,
                height: 480,
            })
            .unwrap();
        host.poll(&mut manager);
        assert_eq!(manager.screen_size(), cgmath::Vector2::new(640, 480));
        assert_eq!(
            manager.tree().size(manager.main_panel()),
            cgmath::Vector2::new(640, 480)
        );
    }
}
