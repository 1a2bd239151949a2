use async_channel::{Receiver, Sender};

/// Fans events out to every live receiver.
#[derive(Debug)]
pub struct Subscribers<E> {
    senders: Vec<Sender<E>>,
}

impl<E> Subscribers<E> {
    pub fn new() -> Subscribers<E> {
        Subscribers {
            senders: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<E> {
        let (sender, receiver) = async_channel::unbounded();
        self.senders.push(sender);
        receiver
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

impl<E: Clone> Subscribers<E> {
    /// Sends `event` to every subscriber, dropping the ones whose receiver is gone.
    pub fn notify(&mut self, event: E) {
        let mut i = 0;
        while i < self.senders.len() {
            if i == self.senders.len() - 1 {
                if self.senders[i].try_send(event).is_err() {
                    self.senders.remove(i);
                }
                break;
            } else if self.senders[i].try_send(event.clone()).is_err() {
                self.senders.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Subscribers<E> {
        Subscribers::new()
    }
}
