//! Fire-and-forget user notices (the site's toasts) and the clipboard seam.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives notices. Nothing is ever read back from it.
pub trait Notifier: Send {
    fn notify(&mut self, notice: Notice);
}

/// Collects notices in order so they can be rendered with the next page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Notices(Vec<Notice>);

impl Notices {
    #[must_use]
    pub fn as_slice(&self) -> &[Notice] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Notice> {
        self.0
    }
}

impl From<Vec<Notice>> for Notices {
    fn from(value: Vec<Notice>) -> Self {
        Self(value)
    }
}

impl Notifier for Notices {
    fn notify(&mut self, notice: Notice) {
        self.0.push(notice);
    }
}

/// Write-only text clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str);
}
