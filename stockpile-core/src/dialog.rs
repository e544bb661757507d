//! The notification dialog, which doubles as the delete confirmation.
//!
//! A pending delete id exists only inside [`DialogState::ConfirmDelete`].
//! Showing any other notice, or hiding the dialog, replaces that state, so
//! the id can never outlive the prompt that asked about it.

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Hidden,
    /// Informational message with a single dismiss action
    Notice(String),
    /// Waiting for the user to confirm or cancel a delete
    ConfirmDelete { id: String, prompt: String },
}

#[derive(Debug, Clone, Default)]
pub struct Dialog {
    state: DialogState,
}

impl Dialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state != DialogState::Hidden
    }

    /// The text currently shown, if any
    pub fn message(&self) -> Option<&str> {
        match &self.state {
            DialogState::Hidden => None,
            DialogState::Notice(message) => Some(message),
            DialogState::ConfirmDelete { prompt, .. } => Some(prompt),
        }
    }

    /// The id awaiting confirmation, if any
    pub fn pending_delete(&self) -> Option<&str> {
        match &self.state {
            DialogState::ConfirmDelete { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Shows a notice. Any pending delete is dropped.
    pub fn notify(&mut self, message: impl Into<String>) {
        if let Some(id) = self.pending_delete() {
            debug!(id, "pending delete discarded by notice");
        }
        self.state = DialogState::Notice(message.into());
    }

    /// Asks for confirmation before deleting `id`. `name` is used in the
    /// prompt when known.
    pub fn request_delete(&mut self, id: impl Into<String>, name: Option<&str>) {
        let prompt = format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            name.unwrap_or("this item")
        );
        self.state = DialogState::ConfirmDelete {
            id: id.into(),
            prompt,
        };
    }

    /// Hides the dialog, dropping any pending delete
    pub fn dismiss(&mut self) {
        self.state = DialogState::Hidden;
    }

    /// Same as [`Dialog::dismiss`]; named for the cancel button
    pub fn cancel(&mut self) {
        self.dismiss();
    }

    /// Hides the dialog and hands back the id to delete, if the dialog was
    /// asking for one. From any other state nothing is returned.
    pub fn confirm(&mut self) -> Option<String> {
        match std::mem::take(&mut self.state) {
            DialogState::ConfirmDelete { id, .. } => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_then_confirm() {
        let mut dialog = Dialog::new();
        dialog.request_delete("x1", Some("Widget"));

        assert_eq!(dialog.pending_delete(), Some("x1"));
        assert!(dialog.message().unwrap().contains("\"Widget\""));
        assert_eq!(dialog.confirm(), Some("x1".to_string()));
        assert_eq!(dialog.state(), &DialogState::Hidden);
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut dialog = Dialog::new();
        dialog.request_delete("x1", None);
        assert!(dialog.message().unwrap().contains("this item"));

        dialog.cancel();
        assert!(!dialog.is_visible());
        assert_eq!(dialog.confirm(), None);
    }

    #[test]
    fn test_notice_replaces_pending_delete() {
        let mut dialog = Dialog::new();
        dialog.request_delete("x1", Some("Widget"));
        dialog.notify("Item added successfully!");

        assert_eq!(dialog.pending_delete(), None);
        assert_eq!(dialog.message(), Some("Item added successfully!"));
        assert_eq!(dialog.confirm(), None, "OK on a notice must not delete");
    }

    #[test]
    fn test_confirm_when_hidden() {
        let mut dialog = Dialog::new();
        assert_eq!(dialog.confirm(), None);
    }
}
