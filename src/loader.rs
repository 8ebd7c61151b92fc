//! Loading queue
//!
//! Tracks named boot tasks (scene assets, audio, fonts) and narrates
//! their progress over the bus so a loading screen can follow along. A
//! failed task counts toward completion; the session starts without the
//! asset rather than hanging. A watchdog timeout forces completion if a
//! task never reports back, and anything that reports after that is
//! logged and dropped.

use crate::bus::{EventBus, GameEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Done,
    Failed,
}

struct Task {
    name: String,
    status: TaskStatus,
}

/// Boot-task tracker. Emits `loader.*` events as tasks resolve.
pub struct LoaderQueue {
    tasks: Vec<Task>,
    started: bool,
    completed: bool,
    elapsed: f32,
    timeout: f32,
}

impl LoaderQueue {
    pub fn new(timeout: f32) -> Self {
        Self {
            tasks: Vec::new(),
            started: false,
            completed: false,
            elapsed: 0.0,
            timeout,
        }
    }

    /// Register a task. Only valid before `start`.
    pub fn register(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.started {
            log::warn!("loader task '{}' registered after start, ignoring", name);
            return;
        }
        self.tasks.push(Task {
            name,
            status: TaskStatus::Pending,
        });
    }

    /// Announce the queue and begin the watchdog. An empty queue
    /// completes on the spot.
    pub fn start(&mut self, bus: &EventBus) {
        if self.started {
            return;
        }
        self.started = true;
        bus.publish(GameEvent::LoaderStarted {
            total: self.tasks.len(),
        });
        if self.tasks.is_empty() {
            self.finish(bus, false);
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn status(&self, name: &str) -> Option<TaskStatus> {
        self.tasks.iter().find(|t| t.name == name).map(|t| t.status)
    }

    pub fn fraction(&self) -> f32 {
        if self.tasks.is_empty() {
            return 1.0;
        }
        self.resolved() as f32 / self.tasks.len() as f32
    }

    /// Mark a task finished.
    pub fn mark_done(&mut self, name: &str, bus: &EventBus) {
        self.resolve(name, TaskStatus::Done, None, bus);
    }

    /// Mark a task failed. The failure is narrated but still counts as
    /// resolved; a missing texture is not worth a hung boot.
    pub fn mark_failed(&mut self, name: &str, message: impl Into<String>, bus: &EventBus) {
        self.resolve(name, TaskStatus::Failed, Some(message.into()), bus);
    }

    /// Advance the watchdog. Past the timeout the queue force-completes,
    /// leaving stragglers Pending.
    pub fn tick(&mut self, dt: f32, bus: &EventBus) {
        if !self.started || self.completed {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.timeout {
            let stuck: Vec<&str> = self
                .tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Pending)
                .map(|t| t.name.as_str())
                .collect();
            log::warn!(
                "loader timed out after {:.1}s with {} task(s) pending: {}",
                self.elapsed,
                stuck.len(),
                stuck.join(", ")
            );
            self.finish(bus, true);
        }
    }

    fn resolved(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Pending)
            .count()
    }

    fn resolve(&mut self, name: &str, status: TaskStatus, message: Option<String>, bus: &EventBus) {
        if self.completed {
            log::warn!("loader task '{}' reported after completion, ignoring", name);
            return;
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.name == name) else {
            log::warn!("unknown loader task '{}', ignoring", name);
            return;
        };
        if task.status != TaskStatus::Pending {
            log::warn!("loader task '{}' reported twice, ignoring", name);
            return;
        }
        task.status = status;
        if let Some(message) = message {
            log::warn!("loader task '{}' failed: {}", name, message);
            bus.publish(GameEvent::LoaderError {
                task: name.to_string(),
                message,
            });
        }
        let done = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .count();
        let failed = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Failed)
            .count();
        bus.publish(GameEvent::LoaderProgress {
            done,
            failed,
            total: self.tasks.len(),
            fraction: self.fraction(),
        });
        if done + failed == self.tasks.len() {
            self.finish(bus, false);
        }
    }

    fn finish(&mut self, bus: &EventBus, forced: bool) {
        if self.completed {
            return;
        }
        self.completed = true;
        log::info!(
            "loader complete: {}/{} tasks resolved{}",
            self.resolved(),
            self.tasks.len(),
            if forced { " (forced)" } else { "" }
        );
        bus.publish(GameEvent::LoaderCompleted { forced });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Topic;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn capture(bus: &EventBus, topic: Topic) -> Rc<RefCell<Vec<GameEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe(topic, move |event| {
            sink.borrow_mut().push(event.clone());
            Ok(())
        });
        seen
    }

    #[test]
    fn test_all_done_completes_once() {
        let bus = EventBus::new();
        let completions = capture(&bus, Topic::LoaderComplete);
        let progress = capture(&bus, Topic::LoaderProgress);

        let mut loader = LoaderQueue::new(10.0);
        loader.register("scene");
        loader.register("radio");
        loader.start(&bus);

        loader.mark_done("scene", &bus);
        assert!(!loader.is_complete());
        loader.mark_done("radio", &bus);
        assert!(loader.is_complete());

        assert_eq!(completions.borrow().len(), 1);
        assert_eq!(
            *completions.borrow().first().unwrap(),
            GameEvent::LoaderCompleted { forced: false }
        );
        assert_eq!(progress.borrow().len(), 2);
        assert_eq!(
            *progress.borrow().last().unwrap(),
            GameEvent::LoaderProgress {
                done: 2,
                failed: 0,
                total: 2,
                fraction: 1.0
            }
        );
    }

    #[test]
    fn test_failure_counts_toward_completion() {
        let bus = EventBus::new();
        let errors = capture(&bus, Topic::LoaderError);

        let mut loader = LoaderQueue::new(10.0);
        loader.register("scene");
        loader.register("fonts");
        loader.start(&bus);

        loader.mark_done("scene", &bus);
        loader.mark_failed("fonts", "404", &bus);

        assert!(loader.is_complete());
        assert_eq!(loader.status("fonts"), Some(TaskStatus::Failed));
        assert_eq!(
            *errors.borrow().first().unwrap(),
            GameEvent::LoaderError {
                task: "fonts".into(),
                message: "404".into()
            }
        );
    }

    #[test]
    fn test_timeout_forces_completion_and_ignores_stragglers() {
        let bus = EventBus::new();
        let completions = capture(&bus, Topic::LoaderComplete);

        let mut loader = LoaderQueue::new(2.0);
        loader.register("scene");
        loader.register("radio");
        loader.start(&bus);
        loader.mark_done("scene", &bus);

        loader.tick(1.0, &bus);
        assert!(!loader.is_complete());
        loader.tick(1.5, &bus);
        assert!(loader.is_complete());
        assert_eq!(
            *completions.borrow().first().unwrap(),
            GameEvent::LoaderCompleted { forced: true }
        );

        // The straggler stays Pending and its late report is dropped.
        assert_eq!(loader.status("radio"), Some(TaskStatus::Pending));
        loader.mark_done("radio", &bus);
        assert_eq!(loader.status("radio"), Some(TaskStatus::Pending));
        assert_eq!(completions.borrow().len(), 1);
    }

    #[test]
    fn test_empty_queue_completes_immediately() {
        let bus = EventBus::new();
        let completions = capture(&bus, Topic::LoaderComplete);
        let mut loader = LoaderQueue::new(5.0);
        loader.start(&bus);
        assert!(loader.is_complete());
        assert_eq!(loader.fraction(), 1.0);
        assert_eq!(completions.borrow().len(), 1);
    }

    #[test]
    fn test_register_after_start_is_refused() {
        let bus = EventBus::new();
        let mut loader = LoaderQueue::new(5.0);
        loader.register("scene");
        loader.start(&bus);
        loader.register("late");
        assert_eq!(loader.status("late"), None);
    }

    #[test]
    fn test_unknown_and_duplicate_reports_ignored() {
        let bus = EventBus::new();
        let progress = capture(&bus, Topic::LoaderProgress);
        let mut loader = LoaderQueue::new(5.0);
        loader.register("scene");
        loader.register("radio");
        loader.start(&bus);

        loader.mark_done("ghost", &bus);
        loader.mark_done("scene", &bus);
        loader.mark_done("scene", &bus);
        assert_eq!(progress.borrow().len(), 1);
        assert!(!loader.is_complete());
    }
}
