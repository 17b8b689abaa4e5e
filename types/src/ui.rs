/// UI configuration options derived from the config store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    /// Upper bound on frame width in columns.
    pub max_frame_width: u16,
}

impl UiOptions {
    pub const DEFAULT_MAX_FRAME_WIDTH: u16 = 100;
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            ascii_only: false,
            high_contrast: false,
            max_frame_width: Self::DEFAULT_MAX_FRAME_WIDTH,
        }
    }
}
