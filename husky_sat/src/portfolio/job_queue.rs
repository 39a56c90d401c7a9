/*!
A fixed pool of worker threads draining a FIFO of jobs.

The pool has three states: `Sleep`, `Working`, and `Terminate`.
Workers without a job --- or in a sleeping pool --- park on a per-worker wake channel, and the
`Sleep → Working` transition stamps every worker's state *before* waking any of them, so a
worker waking early cannot observe a stale pool state.

Jobs are dequeued in FIFO order, with no guarantee of which worker runs which job.
A worker may enqueue further jobs, including for itself.

Enqueueing does not wake a sleeping pool: the expected rhythm, inherited from the coordinator,
is to fill the queue while asleep and then transition to `Working`.
*/

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicI8, Ordering},
        Arc, Mutex,
    },
    thread::JoinHandle,
};

use crossbeam::channel::{bounded, Receiver, Sender};

use crate::misc::log::targets;

/// A job: any boxed callable to run once on a worker thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// The state of the pool, stamped onto each worker as it observes the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i8)]
pub enum PoolState {
    /// Workers park, whether or not jobs are queued.
    Sleep = 0,

    /// Workers drain the queue, parking only when it is empty.
    Working = 1,

    /// Workers exit after their current job.
    Terminate = -1,
}

impl PoolState {
    fn from_i8(raw: i8) -> PoolState {
        match raw {
            1 => PoolState::Working,
            -1 => PoolState::Terminate,
            _ => PoolState::Sleep,
        }
    }
}

struct QueueInner {
    jobs: Mutex<VecDeque<Job>>,
    state: AtomicI8,
    worker_states: Vec<AtomicI8>,
    wakers: Vec<Sender<()>>,
}

impl QueueInner {
    fn state(&self) -> PoolState {
        PoolState::from_i8(self.state.load(Ordering::Acquire))
    }

    fn wake_all(&self) {
        for waker in &self.wakers {
            // A full channel means a pending wake token, which is wake enough.
            let _ = waker.try_send(());
        }
    }
}

/// A pool of worker threads over a FIFO job store.
pub struct JobQueue {
    inner: Option<Arc<QueueInner>>,
    workers: Vec<JoinHandle<()>>,
}

impl JobQueue {
    /// A pool of `workers` threads, spun up immediately and asleep.
    pub fn new(workers: usize) -> Self {
        let mut queue = JobQueue {
            inner: None,
            workers: Vec::default(),
        };
        queue.init(workers);
        queue
    }

    /// Spin up `workers` threads, if none have been spun up before.
    pub fn init(&mut self, workers: usize) {
        if self.inner.is_some() || workers == 0 {
            return;
        }

        let mut wakers = Vec::with_capacity(workers);
        let mut parkers: Vec<Receiver<()>> = Vec::with_capacity(workers);
        for _ in 0..workers {
            let (sender, receiver) = bounded(1);
            wakers.push(sender);
            parkers.push(receiver);
        }

        let inner = Arc::new(QueueInner {
            jobs: Mutex::new(VecDeque::default()),
            state: AtomicI8::new(PoolState::Sleep as i8),
            worker_states: (0..workers)
                .map(|_| AtomicI8::new(PoolState::Sleep as i8))
                .collect(),
            wakers,
        });

        for (index, parker) in parkers.into_iter().enumerate() {
            let inner = inner.clone();
            self.workers.push(std::thread::spawn(move || {
                worker_loop(&inner, index, parker);
            }));
        }

        self.inner = Some(inner);
    }

    /// Enqueue `job`; always succeeds, the queue is unbounded.
    pub fn add_job(&self, job: Job) -> bool {
        match &self.inner {
            None => false,
            Some(inner) => {
                let mut jobs = match inner.jobs.lock() {
                    Ok(jobs) => jobs,
                    Err(poisoned) => poisoned.into_inner(),
                };
                jobs.push_back(job);
                true
            }
        }
    }

    /// Transition the pool to `state`.
    ///
    /// `Sleep → Working` stamps every worker before waking them.
    pub fn set_state(&self, state: PoolState) {
        let inner = match &self.inner {
            None => return,
            Some(inner) => inner,
        };

        if inner.state() == PoolState::Sleep && state == PoolState::Working {
            inner.state.store(state as i8, Ordering::Release);
            for worker_state in &inner.worker_states {
                worker_state.store(state as i8, Ordering::Release);
            }
            inner.wake_all();
        } else {
            inner.state.store(state as i8, Ordering::Release);
        }
    }

    /// True if no worker is currently executing a job.
    pub fn all_sleeping(&self) -> bool {
        match &self.inner {
            None => true,
            Some(inner) => inner
                .worker_states
                .iter()
                .all(|state| state.load(Ordering::Acquire) <= 0),
        }
    }

    /// Terminate the pool and join every worker.
    pub fn wait_terminate(&mut self) {
        if let Some(inner) = &self.inner {
            inner
                .state
                .store(PoolState::Terminate as i8, Ordering::Release);
            inner.wake_all();
        }
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Drop for JobQueue {
    fn drop(&mut self) {
        self.wait_terminate();
    }
}

fn worker_loop(inner: &QueueInner, index: usize, parker: Receiver<()>) {
    log::trace!(target: targets::QUEUE, "Worker {index} up");

    while inner.state() != PoolState::Terminate {
        let job = {
            let mut jobs = match inner.jobs.lock() {
                Ok(jobs) => jobs,
                Err(poisoned) => poisoned.into_inner(),
            };
            jobs.pop_front()
        };

        match job {
            None => {
                // Nothing to do: park until woken, then show the pool state.
                inner.worker_states[index].store(PoolState::Sleep as i8, Ordering::Release);
                if parker.recv().is_err() {
                    break;
                }
                inner.worker_states[index]
                    .store(inner.state() as i8, Ordering::Release);
            }

            Some(job) => job(),
        }

        // A sleeping pool parks workers between jobs.
        if inner.state() == PoolState::Sleep {
            inner.worker_states[index].store(PoolState::Sleep as i8, Ordering::Release);
            if parker.recv().is_err() {
                break;
            }
            inner.worker_states[index]
                .store(inner.state() as i8, Ordering::Release);
        }
    }

    inner.worker_states[index].store(PoolState::Terminate as i8, Ordering::Release);
    log::trace!(target: targets::QUEUE, "Worker {index} down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn spin_until(deadline: Duration, check: impl Fn() -> bool) -> bool {
        let timer = std::time::Instant::now();
        while timer.elapsed() < deadline {
            if check() {
                return true;
            }
            std::thread::yield_now();
        }
        check()
    }

    #[test]
    fn fifo_start_order() {
        let queue = JobQueue::new(1);
        let record = Arc::new(Mutex::new(Vec::default()));

        for label in 0..8 {
            let record = record.clone();
            queue.add_job(Box::new(move || {
                record.lock().expect("record available").push(label);
            }));
        }

        queue.set_state(PoolState::Working);
        assert!(spin_until(Duration::from_secs(5), || {
            record.lock().expect("record available").len() == 8
        }));
        assert_eq!(*record.lock().expect("record available"), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn sleeping_pool_defers_jobs() {
        let queue = JobQueue::new(2);
        let ran = Arc::new(AtomicI8::new(0));

        {
            let ran = ran.clone();
            queue.add_job(Box::new(move || {
                ran.store(1, Ordering::SeqCst);
            }));
        }

        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert!(queue.all_sleeping());

        queue.set_state(PoolState::Working);
        assert!(spin_until(Duration::from_secs(5), || {
            ran.load(Ordering::SeqCst) == 1
        }));
        assert!(spin_until(Duration::from_secs(5), || queue.all_sleeping()));
    }

    #[test]
    fn self_enqueue() {
        let queue = Arc::new(JobQueue::new(1));
        let ran = Arc::new(AtomicI8::new(0));

        {
            let queue_handle = queue.clone();
            let ran = ran.clone();
            queue.add_job(Box::new(move || {
                ran.fetch_add(1, Ordering::SeqCst);
                let ran_again = ran.clone();
                queue_handle.add_job(Box::new(move || {
                    ran_again.fetch_add(1, Ordering::SeqCst);
                }));
            }));
        }

        queue.set_state(PoolState::Working);
        assert!(spin_until(Duration::from_secs(5), || {
            ran.load(Ordering::SeqCst) == 2
        }));
    }

    #[test]
    fn terminate_joins() {
        let mut queue = JobQueue::new(3);
        queue.set_state(PoolState::Working);
        queue.wait_terminate();
        assert!(queue.all_sleeping());
    }
}
