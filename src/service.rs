use crossbeam_channel::{Receiver, Sender};
use std::{thread, thread::JoinHandle};

/// A worker thread talked to over a pair of unbounded channels. The
/// simulation runs as one of these; the transport layer holds the other
/// end.
pub struct Service<I, O> {
    sender: Sender<I>,
    receiver: Receiver<O>,
    handle: JoinHandle<()>,
}

impl<I: Send + 'static, O: Send + 'static> Service<I, O> {
    pub fn new(name: &str, f: impl FnOnce(Receiver<I>, Sender<O>) + Send + 'static) -> Self {
        let (sender, service_receiver) = crossbeam_channel::unbounded();
        let (service_sender, receiver) = crossbeam_channel::unbounded();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || f(service_receiver, service_sender))
            .unwrap();

        Self {
            sender,
            receiver,
            handle,
        }
    }

    pub fn send(&self, i: I) {
        let _ = self.sender.send(i);
    }

    pub fn recv(&mut self) -> impl Iterator<Item = O> + '_ {
        self.receiver.try_iter()
    }

    /// Blocks until the worker exits; send a stop command first.
    pub fn join(self) {
        let _ = self.handle.join();
    }
}
