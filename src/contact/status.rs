use crate::config::STATUS_AUTO_HIDE_MS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusView {
    pub text: String,
    pub kind: StatusKind,
    pub visible: bool,
}

impl StatusView {
    pub fn class_name(&self) -> String {
        format!("form-status {}", self.kind.as_str())
    }
}

/// A pending request to hide the banner, valid only while no newer message
/// has been shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoHide {
    pub generation: u64,
    pub after_ms: u32,
}

/// The single status line under the contact form. Each `show` replaces the
/// previous message and bumps the generation.
#[derive(Debug, Default)]
pub struct StatusBanner {
    generation: u64,
    current: Option<StatusView>,
}

impl StatusBanner {
    pub fn show(&mut self, text: impl Into<String>, kind: StatusKind) -> Option<AutoHide> {
        self.generation += 1;
        self.current = Some(StatusView {
            text: text.into(),
            kind,
            visible: true,
        });
        (kind == StatusKind::Success).then_some(AutoHide {
            generation: self.generation,
            after_ms: STATUS_AUTO_HIDE_MS,
        })
    }

    /// Hides the banner if `generation` is still the latest message. Returns
    /// whether anything changed.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        match &mut self.current {
            Some(view) if view.visible => {
                view.visible = false;
                true
            }
            _ => false,
        }
    }

    pub fn view(&self) -> Option<&StatusView> {
        self.current.as_ref()
    }
}
