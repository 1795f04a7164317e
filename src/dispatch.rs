use log::debug;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::client::{FetchError, RecommendationService};
use crate::models::RecommendationBundle;
use crate::session::Ticket;

#[derive(Debug)]
pub enum Completion {
    Recommendation {
        generation: u64,
        result: Result<RecommendationBundle, FetchError>,
    },
    Health(Result<String, FetchError>),
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Runs service calls on worker threads so the window keeps painting, and
/// hands the results back to the UI thread through a channel.
pub struct Dispatcher {
    service: Arc<dyn RecommendationService>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    wake: Waker,
}

impl Dispatcher {
    pub fn new(service: Arc<dyn RecommendationService>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            service,
            sender,
            receiver,
            wake: Arc::new(|| {}),
        }
    }

    /// Called from the worker after each completion is queued, e.g. to request a repaint.
    pub fn with_waker(mut self, wake: impl Fn() + Send + Sync + 'static) -> Self {
        let wake: Waker = Arc::new(wake);
        self.wake = wake;
        self
    }

    pub fn submit(&self, ticket: Ticket) {
        self.spawn(move |service| Completion::Recommendation {
            generation: ticket.generation,
            result: service.recommend(&ticket.profile),
        });
    }

    pub fn check_health(&self) {
        self.spawn(|service| Completion::Health(service.health()));
    }

    /// Completions that have arrived since the last poll, in arrival order.
    pub fn poll(&self) -> Vec<Completion> {
        self.receiver.try_iter().collect()
    }

    pub fn wait(&self, timeout: Duration) -> Option<Completion> {
        self.receiver.recv_timeout(timeout).ok()
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce(&dyn RecommendationService) -> Completion + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        let wake = Arc::clone(&self.wake);
        thread::spawn(move || {
            let completion = job(service.as_ref());
            if sender.send(completion).is_err() {
                debug!("window closed before the service answered");
                return;
            }
            wake();
        });
    }
}
