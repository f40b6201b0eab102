//! The page surface the widget drives.
//!
//! The widget never renders anything itself. It talks to a [`View`], which
//! owns the three regions (drop zone, status, result), the two option
//! checkboxes, the hidden file input and the alert box. A browser page, a
//! terminal, or the in-memory [`MemoryView`] used by tests can all sit
//! behind the trait.

use crate::config::UploadOptions;

/// Which region of the page is currently visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewState {
    /// Drop zone visible, waiting for a file.
    #[default]
    Idle,
    /// Status indicator visible, an upload is in flight.
    Pending,
    /// Result panel visible, showing the processed file.
    Result,
}

impl ViewState {
    /// The one region shown in this state.
    pub fn region(self) -> Region {
        match self {
            ViewState::Idle => Region::DropZone,
            ViewState::Pending => Region::Status,
            ViewState::Result => Region::Result,
        }
    }
}

/// The three mutually exclusive page regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// `#drop-zone`
    DropZone,
    /// `#status-container`
    Status,
    /// `#result-container`
    Result,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::DropZone, Region::Status, Region::Result];

    /// Element id of the region in the page markup.
    pub fn element_id(self) -> &'static str {
        match self {
            Region::DropZone => "drop-zone",
            Region::Status => "status-container",
            Region::Result => "result-container",
        }
    }
}

/// Everything the widget needs from the page.
///
/// Implementations only mutate presentation; they never call back into the
/// widget. User gestures reach the widget as
/// [`crate::widget::WidgetEvent`]s instead.
pub trait View {
    /// Show or hide one region.
    fn set_visible(&mut self, region: Region, visible: bool);

    /// Toggle the drop zone's drag-over highlight.
    fn set_drop_active(&mut self, active: bool);

    /// Current rendered content of the drop zone.
    fn drop_zone_content(&self) -> String;

    /// Replace the drop zone's rendered content.
    fn set_drop_zone_content(&mut self, content: &str);

    /// State of the `make-searchable` and `enhance-image` checkboxes.
    fn options(&self) -> UploadOptions;

    /// Open the file picker (`file-input`). The choice arrives later as a
    /// `FileChosen` event.
    fn open_file_picker(&mut self);

    /// Forget the file input's retained selection.
    fn clear_file_input(&mut self);

    /// Fill `new-filename` and the `download-btn` target.
    fn show_result(&mut self, filename: &str, download_url: &str);

    /// Blocking notification. Returns once the user has dismissed it.
    fn alert(&mut self, message: &str);
}

/// A headless page that records everything the widget does to it.
#[derive(Debug, Clone)]
pub struct MemoryView {
    drop_zone_visible: bool,
    status_visible: bool,
    result_visible: bool,
    /// Drag-over highlight on the drop zone.
    pub drop_active: bool,
    /// Drop zone content.
    pub drop_zone: String,
    /// Checkbox state.
    pub options: UploadOptions,
    /// `Some` while the file input retains a selection.
    pub file_input: Option<String>,
    /// Times the picker was opened.
    pub picker_opened: usize,
    /// `new-filename` text.
    pub filename: Option<String>,
    /// `download-btn` href.
    pub download_url: Option<String>,
    /// Every alert shown, oldest first.
    pub alerts: Vec<String>,
}

/// Initial drop zone content of the service's page.
pub const DEFAULT_DROP_ZONE: &str =
    "<div class=\"icon\">📄</div><p>Drop a PDF here or click to choose a file</p>";

impl MemoryView {
    pub fn new() -> Self {
        Self::with_drop_zone(DEFAULT_DROP_ZONE)
    }

    pub fn with_drop_zone(content: impl Into<String>) -> Self {
        Self {
            drop_zone_visible: true,
            status_visible: false,
            result_visible: false,
            drop_active: false,
            drop_zone: content.into(),
            options: UploadOptions::default(),
            file_input: None,
            picker_opened: 0,
            filename: None,
            download_url: None,
            alerts: Vec::new(),
        }
    }

    pub fn is_visible(&self, region: Region) -> bool {
        match region {
            Region::DropZone => self.drop_zone_visible,
            Region::Status => self.status_visible,
            Region::Result => self.result_visible,
        }
    }

    /// Regions currently shown.
    pub fn visible_regions(&self) -> Vec<Region> {
        Region::ALL
            .into_iter()
            .filter(|r| self.is_visible(*r))
            .collect()
    }

    /// Simulate the user picking `name` in the file input.
    pub fn choose(&mut self, name: impl Into<String>) {
        self.file_input = Some(name.into());
    }
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for MemoryView {
    fn set_visible(&mut self, region: Region, visible: bool) {
        match region {
            Region::DropZone => self.drop_zone_visible = visible,
            Region::Status => self.status_visible = visible,
            Region::Result => self.result_visible = visible,
        }
    }

    fn set_drop_active(&mut self, active: bool) {
        self.drop_active = active;
    }

    fn drop_zone_content(&self) -> String {
        self.drop_zone.clone()
    }

    fn set_drop_zone_content(&mut self, content: &str) {
        self.drop_zone = content.to_string();
    }

    fn options(&self) -> UploadOptions {
        self.options
    }

    fn open_file_picker(&mut self) {
        self.picker_opened += 1;
    }

    fn clear_file_input(&mut self) {
        self.file_input = None;
    }

    fn show_result(&mut self, filename: &str, download_url: &str) {
        self.filename = Some(filename.to_string());
        self.download_url = Some(download_url.to_string());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
