use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient notification shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

pub trait Toaster: Send + Sync {
    fn show(&self, toast: Toast);
}
