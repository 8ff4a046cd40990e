use tokio::sync::mpsc;

/// Posts a fallback message if the owning task ends without replying.
///
/// A spawned task that panics still unwinds through this guard, so the
/// runtime waiting on the inbox always hears back.
pub(crate) struct Reply<T> {
    tx: mpsc::UnboundedSender<T>,
    fallback: Option<T>,
}

impl<T> Reply<T> {
    pub(crate) fn new(tx: mpsc::UnboundedSender<T>, fallback: T) -> Self {
        Self {
            tx,
            fallback: Some(fallback),
        }
    }

    pub(crate) fn send(mut self, msg: T) {
        self.fallback = None;
        let _ = self.tx.send(msg);
    }

    /// Ends the task without posting anything.
    pub(crate) fn disarm(mut self) {
        self.fallback = None;
    }
}

impl<T> Drop for Reply<T> {
    fn drop(&mut self) {
        if let Some(msg) = self.fallback.take() {
            let _ = self.tx.send(msg);
        }
    }
}
