//! Grouping of tasks into board columns.

use std::collections::BTreeMap;

use crate::{Task, TaskStatus};

/// Board column a task lands in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Authoring,
    InProgress,
    Completed,
    /// Column created on the fly for a status the board has no fixed column for.
    Other(String),
}

impl Bucket {
    pub const FIXED: [Bucket; 3] = [Bucket::Authoring, Bucket::InProgress, Bucket::Completed];

    pub fn key(&self) -> &str {
        match self {
            Bucket::Authoring => "authoring",
            Bucket::InProgress => "inProgress",
            Bucket::Completed => "completed",
            Bucket::Other(raw) => raw,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Bucket::Authoring => "Authoring".to_string(),
            Bucket::InProgress => "In Progress".to_string(),
            Bucket::Completed => "Completed".to_string(),
            Bucket::Other(raw) => raw.clone(),
        }
    }

    /// Whether a card in this column opens the execution log when clicked.
    pub fn shows_logs(&self) -> bool {
        matches!(self, Bucket::InProgress | Bucket::Completed)
    }

    /// Only authoring cards can be edited and submitted.
    pub fn is_editable(&self) -> bool {
        matches!(self, Bucket::Authoring)
    }
}

/// Anything that carries a task status and can be placed on the board.
pub trait Bucketed {
    fn status(&self) -> &TaskStatus;
}

impl Bucketed for Task {
    fn status(&self) -> &TaskStatus {
        &self.status
    }
}

/// Items grouped by status. The three fixed columns always exist, in order;
/// unrecognized statuses get their own column after them.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskBuckets<T = Task> {
    authoring: Vec<T>,
    in_progress: Vec<T>,
    completed: Vec<T>,
    other: BTreeMap<String, Vec<T>>,
}

impl<T> Default for TaskBuckets<T> {
    fn default() -> Self {
        Self {
            authoring: Vec::new(),
            in_progress: Vec::new(),
            completed: Vec::new(),
            other: BTreeMap::new(),
        }
    }
}

impl<T: Bucketed> TaskBuckets<T> {
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut buckets = Self::default();
        for item in items {
            buckets.push(item);
        }
        buckets
    }

    /// Append to the column matching the item's status.
    pub fn push(&mut self, item: T) {
        let column = match item.status() {
            TaskStatus::Authoring => &mut self.authoring,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Completed => &mut self.completed,
            TaskStatus::Other(raw) => self.other.entry(raw.clone()).or_default(),
        };
        column.push(item);
    }
}

impl<T> TaskBuckets<T> {
    pub fn get(&self, bucket: &Bucket) -> &[T] {
        match bucket {
            Bucket::Authoring => &self.authoring,
            Bucket::InProgress => &self.in_progress,
            Bucket::Completed => &self.completed,
            Bucket::Other(raw) => self.other.get(raw).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Columns in display order: the fixed three, then the extra ones by name.
    pub fn columns(&self) -> impl Iterator<Item = (Bucket, &[T])> + '_ {
        Bucket::FIXED
            .into_iter()
            .map(move |bucket| {
                let items = self.get(&bucket);
                (bucket, items)
            })
            .chain(
                self.other
                    .iter()
                    .map(|(raw, items)| (Bucket::Other(raw.clone()), items.as_slice())),
            )
    }

    pub fn len(&self) -> usize {
        self.authoring.len()
            + self.in_progress.len()
            + self.completed.len()
            + self.other.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locate the first item matching `pred` along with the column it sits in.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<(Bucket, &T)> {
        self.columns()
            .find_map(|(bucket, items)| items.iter().find(|&item| pred(item)).map(|item| (bucket, item)))
    }

    pub fn find_mut(&mut self, mut pred: impl FnMut(&T) -> bool) -> Option<&mut T> {
        self.authoring
            .iter_mut()
            .chain(self.in_progress.iter_mut())
            .chain(self.completed.iter_mut())
            .chain(self.other.values_mut().flat_map(|items| items.iter_mut()))
            .find(|item| pred(&**item))
    }

    /// Add an item straight to the authoring column regardless of its status.
    pub fn push_authoring(&mut self, item: T) {
        self.authoring.push(item);
    }
}
