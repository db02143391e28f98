/* src/io/worker.rs */

use std::sync::Arc;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use super::Shared;
use crate::backend::Backend;
use crate::error::{OptError, OptResult};
use crate::value::OptionValue;

/// A write accepted by the caller and owned by the queue until applied.
#[derive(Debug)]
pub(crate) struct PendingWrite {
	pub name: String,
	pub value: OptionValue,
}

#[derive(Debug)]
pub(crate) enum Message {
	Write(PendingWrite),
	Shutdown,
}

/// Spawns the persistence thread and waits until its queue exists.
pub(crate) fn spawn<B: Backend>(
	shared: Arc<Shared<B>>,
) -> OptResult<(mpsc::Sender<Message>, JoinHandle<()>)> {
	let (ready_tx, ready_rx) = mpsc::sync_channel(1);

	let handle = thread::Builder::new()
		.name(shared.config.thread_name.clone())
		.spawn(move || {
			let (tx, rx) = mpsc::channel();
			if ready_tx.send(tx).is_err() {
				return;
			}
			drain(&shared, &rx);
		})?;

	let sender = ready_rx.recv().map_err(|_| OptError::QueueClosed)?;
	Ok((sender, handle))
}

/// Applies queued writes in arrival order until told to stop.
fn drain<B: Backend>(shared: &Shared<B>, rx: &mpsc::Receiver<Message>) {
	while let Ok(message) = rx.recv() {
		match message {
			Message::Write(write) => {
				match shared.apply(&write.name, &write.value) {
					Ok(()) => tracing::debug!("Persisted option '{}'", write.name),
					Err(e) => tracing::error!("Failed to persist option '{}': {}", write.name, e),
				}
				shared.pending.finish();
			}
			Message::Shutdown => break,
		}
	}
	tracing::debug!("Persistence thread stopped");
}
