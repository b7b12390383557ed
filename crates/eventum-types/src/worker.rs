//! Worker pool for blocking, CPU-bound jobs.
//!
//! Jobs are queued on one of two channels. Dedicated workers serve only the
//! immediate queue (password hashing), shared workers drain the immediate
//! queue first and then the normal one (token signing), so a burst of token
//! requests never starves password checks.

use flume::{Receiver, Sender};
use futures::channel::oneshot;
use std::{sync::Arc, thread};

use crate::prelude::*;

type Job = Box<dyn FnOnce() + Send>;
type JobQueue = Arc<Receiver<Job>>;

#[derive(Debug)]
pub struct WorkerPool {
	immed: Sender<Job>,
	normal: Sender<Job>,
}

impl WorkerPool {
	/// Creates `n_immed` workers for the immediate queue and `n_shared`
	/// workers serving both queues
	pub fn new(n_immed: usize, n_shared: usize) -> Self {
		let (immed, rx_immed) = flume::unbounded();
		let (normal, rx_normal) = flume::unbounded();

		let rx_immed = Arc::new(rx_immed);
		let rx_normal = Arc::new(rx_normal);

		for _ in 0..n_immed {
			let rx_immed = Arc::clone(&rx_immed);
			thread::spawn(move || worker_loop(&[rx_immed]));
		}

		for _ in 0..n_shared {
			let rx_immed = Arc::clone(&rx_immed);
			let rx_normal = Arc::clone(&rx_normal);
			thread::spawn(move || worker_loop(&[rx_immed, rx_normal]));
		}

		Self { immed, normal }
	}

	fn submit<F, T>(queue: &Sender<Job>, f: F) -> impl Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		let (res_tx, res_rx) = oneshot::channel();

		let job = Box::new(move || {
			let result = f();
			let _ignore = res_tx.send(result);
		});

		if queue.send(job).is_err() {
			error!("Failed to send job to worker queue");
		}

		async move {
			res_rx.await.map_err(|_| {
				error!("Worker dropped result channel (task may have panicked)");
				Error::Internal("worker task failed".into())
			})
		}
	}

	pub fn run<F, T>(&self, f: F) -> impl Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		Self::submit(&self.normal, f)
	}

	/// Like `run`, but flattens `ClResult<ClResult<T>>` into `ClResult<T>`.
	pub fn try_run<F, T>(&self, f: F) -> impl Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> ClResult<T> + Send + 'static,
		T: Send + 'static,
	{
		let fut = self.run(f);
		async move { fut.await? }
	}

	pub fn run_immed<F, T>(&self, f: F) -> impl Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		Self::submit(&self.immed, f)
	}

	/// Like `run_immed`, but flattens `ClResult<ClResult<T>>` into `ClResult<T>`.
	pub fn try_run_immed<F, T>(&self, f: F) -> impl Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> ClResult<T> + Send + 'static,
		T: Send + 'static,
	{
		let fut = self.run_immed(f);
		async move { fut.await? }
	}
}

fn worker_loop(queues: &[JobQueue]) {
	loop {
		// Try higher-priority queues first (non-blocking)
		let mut job = None;
		for rx in queues {
			if let Ok(j) = rx.try_recv() {
				job = Some(j);
				break;
			}
		}

		if let Some(job) = job {
			if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
				error!("Worker thread caught panic: {:?}", e);
			}
			continue;
		}

		let mut selector = flume::Selector::new();
		for rx in queues {
			selector = selector.recv(rx, |res| res);
		}

		match selector.wait() {
			Ok(job) => {
				if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
					error!("Worker thread caught panic: {:?}", e);
				}
			}
			// All senders dropped: the pool is gone
			Err(flume::RecvError::Disconnected) => break,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_run_returns_result() {
		let pool = WorkerPool::new(1, 1);
		let res = pool.run(|| 6 * 7).await.unwrap();
		assert_eq!(res, 42);
	}

	#[tokio::test]
	async fn test_try_run_immed_flattens_errors() {
		let pool = WorkerPool::new(1, 0);
		let res: ClResult<()> = pool.try_run_immed(|| Err(Error::Parse)).await;
		assert!(matches!(res, Err(Error::Parse)));
	}

	#[tokio::test]
	async fn test_try_run_on_shared_workers() {
		// No dedicated workers: only the shared ones can serve the normal queue
		let pool = WorkerPool::new(0, 1);
		assert_eq!(pool.try_run(|| Ok(5)).await.unwrap(), 5);
		let res: ClResult<()> = pool.try_run(|| Err(Error::Unauthorized)).await;
		assert!(matches!(res, Err(Error::Unauthorized)));
	}

	#[tokio::test]
	async fn test_panicking_job_reports_internal_error() {
		let pool = WorkerPool::new(0, 1);
		let res: ClResult<()> = pool.run(|| panic!("boom")).await;
		assert!(matches!(res, Err(Error::Internal(_))));
		// The worker survives the panic
		assert_eq!(pool.run(|| 1).await.unwrap(), 1);
	}
}

// vim: ts=4
