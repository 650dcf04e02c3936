//! Change notifications.
//!
//! Presentation code that caches listings subscribes here and refreshes when
//! a mutation has been applied and persisted. Callbacks run synchronously,
//! in subscription order, on the caller's thread.

use std::fmt;

use groupwise_models::GroupId;

/// A mutation that has been applied to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    StudentCreated { student_number: String },
    StudentUpdated { student_number: String },
    StudentDeleted { student_number: String },
    GroupCreated { group_id: GroupId },
    GroupUpdated { group_id: GroupId },
    GroupDeleted { group_id: GroupId },
    StudentAssigned {
        student_number: String,
        group_id: GroupId,
    },
    StudentUnassigned {
        student_number: String,
        group_id: GroupId,
    },
    StudentTransferred {
        student_number: String,
        from: Option<GroupId>,
        to: GroupId,
    },
}

impl RegistryEvent {
    /// Short dotted name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StudentCreated { .. } => "student.created",
            Self::StudentUpdated { .. } => "student.updated",
            Self::StudentDeleted { .. } => "student.deleted",
            Self::GroupCreated { .. } => "group.created",
            Self::GroupUpdated { .. } => "group.updated",
            Self::GroupDeleted { .. } => "group.deleted",
            Self::StudentAssigned { .. } => "membership.assigned",
            Self::StudentUnassigned { .. } => "membership.unassigned",
            Self::StudentTransferred { .. } => "membership.transferred",
        }
    }
}

type Subscriber = Box<dyn Fn(&RegistryEvent)>;

#[derive(Default)]
pub struct EventHub {
    subscribers: Vec<Subscriber>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&RegistryEvent) + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    pub fn publish(&self, event: &RegistryEvent) {
        for subscriber in &self.subscribers {
            subscriber(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
