use crate::pool::task::Task;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Ordered collection of pending tasks shared by the producer, the
/// workers and the progress monitor. Insertion order is the only
/// ordering guarantee. `clear` atomically abandons all queued work,
/// which is how cancellation propagates to the pool.
pub struct TaskQueue {
    inner: Mutex<VecDeque<Task>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub fn enqueue(&self, task: Task) {
        self.inner.lock().unwrap().push_back(task);
    }

    /// Oldest pending task, or `None` once the queue is empty. Delivery
    /// is exclusive: a task handed to one caller is gone for everyone
    /// else.
    pub fn dequeue(&self) -> Option<Task> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Pending count. Advisory only; it can race with concurrent
    /// dequeues.
    pub fn size(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::task::TaskKind;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use url::Url;

    fn login_task(n: usize) -> Task {
        Task::login(
            Url::parse("http://target.test/").unwrap(),
            "wp-login.php",
            "admin",
            &format!("pw{n}"),
        )
    }

    fn password(task: &Task) -> String {
        match task.kind() {
            TaskKind::Login { password, .. } => password.clone(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn dequeues_in_insertion_order() {
        let queue = TaskQueue::new();
        for n in 0..5 {
            queue.enqueue(login_task(n));
        }
        for n in 0..5 {
            assert_eq!(password(&queue.dequeue().unwrap()), format!("pw{n}"));
        }
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn clear_empties_the_queue() {
        let queue = TaskQueue::new();
        for n in 0..10 {
            queue.enqueue(login_task(n));
        }
        queue.clear();
        assert_eq!(queue.size(), 0);
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn concurrent_dequeue_delivers_each_task_once() {
        let queue = Arc::new(TaskQueue::new());
        for n in 0..200 {
            queue.enqueue(login_task(n));
        }

        let mut handles = Vec::new();
        for _ in 0..4 {
            let queue = Arc::clone(&queue);
            handles.push(thread::spawn(move || {
                let mut seen = Vec::new();
                while let Some(task) = queue.dequeue() {
                    seen.push(password(&task));
                }
                seen
            }));
        }

        let mut delivered = Vec::new();
        for handle in handles {
            delivered.extend(handle.join().unwrap());
        }

        let unique: HashSet<_> = delivered.iter().cloned().collect();
        assert_eq!(delivered.len(), 200);
        assert_eq!(unique.len(), 200);
        assert_eq!(queue.size(), 0);
    }

    #[test]
    fn clear_racing_with_dequeue_never_duplicates_delivery() {
        let queue = Arc::new(TaskQueue::new());
        for n in 0..500 {
            queue.enqueue(login_task(n));
        }

        let mut consumers = Vec::new();
        for _ in 0..3 {
            let queue = Arc::clone(&queue);
            consumers.push(thread::spawn(move || {
                let mut seen = Vec::new();
                while let Some(task) = queue.dequeue() {
                    seen.push(password(&task));
                }
                seen
            }));
        }

        let clearer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.clear())
        };

        let mut delivered = Vec::new();
        for consumer in consumers {
            delivered.extend(consumer.join().unwrap());
        }
        clearer.join().unwrap();

        let unique: HashSet<_> = delivered.iter().cloned().collect();
        assert_eq!(unique.len(), delivered.len());
        assert_eq!(queue.size(), 0);
        assert!(queue.dequeue().is_none());
    }
}
