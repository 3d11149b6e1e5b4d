// src/app/worker.rs
use fitness_planner_lib::{PendingSubmission, PlanError, SettledSubmission, WorkflowApi};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use tokio::runtime;
use tracing::{error, warn};

/// Runs `pending` on its own thread so the draw loop keeps going.
///
/// The form stays in `Submitting` until the returned receiver yields and the
/// result is handed to `PlannerForm::finish_submit`.
pub fn spawn_submission<A>(api: Arc<A>, pending: PendingSubmission) -> Receiver<SettledSubmission>
where
    A: WorkflowApi + Send + Sync + 'static,
{
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let settled = match runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt.block_on(pending.execute(&*api)),
            Err(e) => {
                error!("Failed to build async runtime for submission: {}", e);
                pending.settle(Err(PlanError::Network(format!(
                    "could not start request runtime: {e}"
                ))))
            }
        };
        if sender.send(settled).is_err() {
            warn!("Submission settled after the UI stopped listening");
        }
    });
    receiver
}
