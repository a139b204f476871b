//! Job lifecycle transitions.
//!
//! [`transition`] validates nothing about bay occupancy; whether a bay
//! already has an active job is the caller's check to make before
//! dispatching. Side effects come back as data so the function stays
//! pure.

use chrono::Utc;

use crate::job::{Job, JobStatus};
use crate::notification::{Notification, UserRole};

/// Outcome of a status transition: the updated job plus the
/// notifications the change calls for.
#[derive(Debug, Clone)]
pub struct Transition {
    pub job: Job,
    pub notifications: Vec<Notification>,
}

/// Apply a status transition to a job.
///
/// - IN_PROGRESS stamps `started_at` on the first transition only.
/// - COMPLETED stamps `completed_at`.
/// - A supplied note is appended whatever the target status.
/// - ON_HOLD alerts the MANAGER role; any transition on a job with a
///   linked customer notifies that customer.
pub fn transition(job: &Job, target: JobStatus, note: Option<&str>) -> Transition {
    let now = Utc::now();
    let mut updated = job.clone();

    updated.status = target;
    if target == JobStatus::InProgress && updated.started_at.is_none() {
        updated.started_at = Some(now);
    }
    if target == JobStatus::Completed {
        updated.completed_at = Some(now);
    }
    if let Some(note) = note {
        updated.notes.push(note.to_string());
    }

    let mut notifications = Vec::new();

    if target == JobStatus::OnHold {
        let bay = match updated.bay_id {
            Some(bay) => format!("Bay {bay}"),
            None => "unassigned".to_string(),
        };
        notifications.push(
            Notification::warning(format!(
                "Delay alert: {} ({bay}) placed on hold.",
                updated.car_model
            ))
            .for_role(UserRole::Manager),
        );
    }

    if let Some(customer_id) = updated.customer_id.clone() {
        let message = match target {
            JobStatus::Completed => {
                format!("Good news! Your {} is ready for pickup.", updated.car_model)
            }
            JobStatus::InProgress => {
                format!("Service started on your {}.", updated.car_model)
            }
            _ => format!("Your vehicle status updated: {}", target.label()),
        };
        notifications.push(Notification::info(message).for_user(customer_id));
    }

    Transition {
        job: updated,
        notifications,
    }
}
