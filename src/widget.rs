//! The upload widget: gestures in, one upload out, three-way view switching.
//!
//! ```text
//!            invalid type (alert)
//!              ┌────┐
//!              ▼    │
//!           ┌──────────┐  valid PDF   ┌───────────┐  success  ┌──────────┐
//!  start ──▶│   Idle   │─────────────▶│  Pending  │──────────▶│  Result  │
//!           └──────────┘              └───────────┘           └──────────┘
//!              ▲  ▲        error (alert)    │                      │
//!              │  └─────────────────────────┘                      │
//!              └──────────────────────── reset ────────────────────┘
//! ```
//!
//! Only the idle state offers the drop zone, so gestures that need it are
//! ignored in the other two states. `submit` holds `&mut self` across the
//! network call, which keeps a second upload from starting while one is in
//! flight.

use crate::config::{UploadOptions, PDF_MIME};
use crate::error::{ErrorKind, UploadError};
use crate::file::SelectedFile;
use crate::messages::Messages;
use crate::transport::{UploadReceipt, Uploader};
use crate::view::{Region, View, ViewState};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A user gesture delivered to the widget.
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    /// The drop zone was clicked.
    Click,
    /// The file picker closed with this selection.
    FileChosen(Vec<SelectedFile>),
    /// A drag entered or moved over the drop zone.
    DragOver,
    /// A drag left the drop zone.
    DragLeave,
    /// Files were dropped on the drop zone.
    Drop(Vec<SelectedFile>),
    /// The reset button in the result panel was clicked.
    Reset,
}

/// How a submission ended.
#[derive(Debug)]
pub enum Submission {
    /// The file was rejected locally; nothing was sent.
    Refused(UploadError),
    /// The service processed the file.
    Completed(UploadReceipt),
    /// The request failed or the service reported an error.
    Failed(UploadError),
}

impl Submission {
    pub fn is_completed(&self) -> bool {
        matches!(self, Submission::Completed(_))
    }
}

/// Mediates between file selection gestures, one upload and the view.
pub struct UploadWidget<V, U> {
    view: V,
    uploader: U,
    messages: Messages,
    state: ViewState,
    /// Drop zone content as rendered at construction, restored on reset.
    initial_drop_zone: String,
}

impl<V: View, U: Uploader> UploadWidget<V, U> {
    /// Attach to `view`, snapshotting its drop zone and showing the idle
    /// region.
    pub fn new(mut view: V, uploader: U, messages: Messages) -> Self {
        let initial_drop_zone = view.drop_zone_content();
        show_only(&mut view, ViewState::Idle);
        Self {
            view,
            uploader,
            messages,
            state: ViewState::Idle,
            initial_drop_zone,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn uploader(&self) -> &U {
        &self.uploader
    }

    /// Process one gesture. Returns the outcome when it triggered a
    /// submission.
    pub async fn handle(&mut self, event: WidgetEvent) -> Option<Submission> {
        match event {
            WidgetEvent::Reset => {
                self.reset();
                None
            }
            _ if self.state != ViewState::Idle => {
                debug!("Ignoring {:?} while {:?}: drop zone hidden", event, self.state);
                None
            }
            WidgetEvent::Click => {
                self.view.open_file_picker();
                None
            }
            WidgetEvent::DragOver => {
                self.view.set_drop_active(true);
                None
            }
            WidgetEvent::DragLeave => {
                self.view.set_drop_active(false);
                None
            }
            WidgetEvent::Drop(files) => {
                self.view.set_drop_active(false);
                self.submit_first(files).await
            }
            WidgetEvent::FileChosen(files) => self.submit_first(files).await,
        }
    }

    /// Consume gestures until the sender side is dropped.
    pub async fn run(&mut self, mut events: mpsc::Receiver<WidgetEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event).await;
        }
        debug!("Event channel closed in state {:?}", self.state);
    }

    async fn submit_first(&mut self, files: Vec<SelectedFile>) -> Option<Submission> {
        let extra = files.len().saturating_sub(1);
        let file = files.into_iter().next()?;
        if extra > 0 {
            debug!("Ignoring {} additional file(s)", extra);
        }
        Some(self.submit(file).await)
    }

    /// Validate, upload and show the outcome of one file.
    pub async fn submit(&mut self, file: SelectedFile) -> Submission {
        if !file.is_pdf() {
            warn!("Refusing '{}': declared type '{}' is not {}", file.name(), file.mime(), PDF_MIME);
            self.view.alert(self.messages.only_pdf());
            return Submission::Refused(UploadError::NotAPdf {
                mime: file.mime().to_string(),
            });
        }

        self.transition(ViewState::Pending);
        let options: UploadOptions = self.view.options();
        info!("Submitting '{}' ({} bytes)", file.name(), file.len());

        match self.uploader.upload(file, options).await {
            Ok(receipt) => {
                info!("Processed as '{}' at {}", receipt.filename, receipt.download_url);
                self.transition(ViewState::Result);
                self.view.show_result(&receipt.filename, &receipt.download_url);
                Submission::Completed(receipt)
            }
            Err(e) => {
                warn!("Upload failed: {}", e);
                self.transition(ViewState::Idle);
                let message = match (e.kind(), &e) {
                    (ErrorKind::Application, UploadError::Rejected { message }) => {
                        self.messages.server_error(message)
                    }
                    _ => self.messages.upload_failed().to_string(),
                };
                self.view.alert(&message);
                Submission::Failed(e)
            }
        }
    }

    /// Return to the idle drop zone with its original content and an empty
    /// file input.
    pub fn reset(&mut self) {
        if self.state == ViewState::Pending {
            debug!("Ignoring reset while an upload is in flight");
            return;
        }
        self.view.set_drop_zone_content(&self.initial_drop_zone);
        self.transition(ViewState::Idle);
        self.view.clear_file_input();
    }

    fn transition(&mut self, to: ViewState) {
        debug!("View {:?} -> {:?}", self.state, to);
        show_only(&mut self.view, to);
        self.state = to;
    }
}

fn show_only<V: View>(view: &mut V, state: ViewState) {
    let shown = state.region();
    for region in Region::ALL {
        view.set_visible(region, region == shown);
    }
}
