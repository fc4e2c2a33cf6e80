use crate::model::{FormResponse, SubmissionPayload};
use crate::services::api::ApiError;
use crate::ui::{AppState, ToastLevel};
use crate::widgets::form;

#[derive(Debug)]
pub enum AppMsg {
    SubmitFinished {
        outcome: Result<FormResponse, ApiError>,
    },
}

#[derive(Debug)]
pub enum Effect {
    Submit {
        payload: SubmissionPayload,
    },
    ShowToast {
        text: String,
        level: ToastLevel,
        seconds: u64,
    },
}

pub fn update(state: &mut AppState, msg: AppMsg) -> Vec<Effect> {
    let mut effects: Vec<Effect> = Vec::new();
    match msg {
        AppMsg::SubmitFinished { outcome } => {
            state.submitting = false;
            state.status_text = None;
            if let Some(fw) = state.form.as_mut() {
                fw.form.submitting = false;
            }
            match outcome {
                Ok(resp) => {
                    tracing::info!(response = %resp.message, "form submission accepted");
                    // form data is discarded once a submission succeeds
                    if let Some(fw) = state.form.as_mut() {
                        form::reset_to_defaults(&mut fw.form);
                        fw.form.message = None;
                    }
                    effects.push(Effect::ShowToast {
                        text: format!("Submitted: {}", resp.message),
                        level: ToastLevel::Success,
                        seconds: 3,
                    });
                    state.last_response = Some(resp);
                }
                Err(err) => {
                    tracing::error!(error = %err, "form submission failed");
                    if let Some(fw) = state.form.as_mut() {
                        fw.form.message = Some("Submission failed, resubmit to retry".into());
                    }
                    effects.push(Effect::ShowToast {
                        text: format!("Submission failed: {err}"),
                        level: ToastLevel::Error,
                        seconds: 4,
                    });
                }
            }
        }
    }
    effects
}
