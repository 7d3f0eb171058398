//! Reconciliador de actividades pendientes.
//!
//! Superpone un snapshot del poll en vivo sobre un workflow abierto del
//! timeline y sobre las actividades de ese workflow que el snapshot reporta
//! como pendientes. Sólo avanza registros abiertos: un workflow terminal o una
//! actividad ya resuelta en el log no se tocan.
use log::debug;

use crate::poll::{DescribeWorkflowResponse, PendingActivityInfo};
use crate::status::Status;
use crate::timeline::{Activity, Timeline, TimelineItem, TimelineRecord};

/// Qué cambió al aplicar un snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub workflow_patched: bool,
    pub activities_patched: usize,
}

/// Aplica `snapshot` al workflow en `position`.
pub fn reconcile(timeline: &mut Timeline, position: usize, snapshot: &DescribeWorkflowResponse) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    let Some(wf) = timeline.items.get_mut(position).and_then(TimelineItem::as_workflow_mut) else {
        debug!("reconcile: position {position} is not a workflow");
        return report;
    };
    if wf.is_terminal() {
        debug!("reconcile: workflow {} already {}; untouched", wf.workflow_id, wf.status);
        return report;
    }

    let info = &snapshot.workflow_execution_info;
    if !info.status.is_empty() {
        wf.status = Status::for_execution_status(&info.status);
    }
    if let Some(start) = info.start_time {
        wf.start_time = start;
    }
    if info.close_time.is_some() {
        wf.end_time = info.close_time;
    }
    if let Some(parent) = info.parent_execution.as_ref() {
        wf.parent_workflow_id = Some(parent.workflow_id.clone());
        wf.parent_run_id = Some(parent.run_id.clone());
    }
    report.workflow_patched = true;

    let owner = wf.workflow_id.clone();
    for pending in &snapshot.pending_activities {
        match find_open_activity(timeline, &owner, &pending.activity_id) {
            Some(act) => {
                apply_pending(act, pending);
                report.activities_patched += 1;
            }
            None => debug!("reconcile: no open activity {} in workflow {owner}", pending.activity_id),
        }
    }
    report
}

/// Último registro abierto con ese `activityId` dentro del workflow dueño.
fn find_open_activity<'a>(timeline: &'a mut Timeline, owner: &str, activity_id: &str) -> Option<&'a mut Activity> {
    timeline.items
            .iter_mut()
            .rev()
            .filter_map(TimelineItem::as_activity_mut)
            .find(|a| a.workflow_id == owner && a.activity_id == activity_id && !a.is_terminal())
}

fn apply_pending(act: &mut Activity, pending: &PendingActivityInfo) {
    act.attempts = Some(pending.attempt);
    if pending.attempt > 1 {
        act.set_status(Status::Retrying);
    } else if act.status == Status::Scheduled {
        act.set_status(Status::Pending);
    }
    act.last_started_time = pending.last_started_time;
    act.last_attempt_complete_time = pending.last_attempt_complete_time;
    act.last_worker_identity = pending.last_worker_identity.clone();
    if let Some(failure) = pending.last_failure.as_ref() {
        act.last_failure = Some(failure.to_string());
    }
}
