//! Optional embedding host (chat platform web-app container).
//!
//! The game talks to its container only through [`EmbeddingHost`]. A page
//! opened directly in a browser gets [`NoHost`], whose methods do nothing.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("dark") { ColorScheme::Dark } else { ColorScheme::Light }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Haptic {
    Success,
    Error,
}

impl Haptic {
    pub fn as_str(self) -> &'static str {
        match self {
            Haptic::Success => "success",
            Haptic::Error => "error",
        }
    }
}

pub trait EmbeddingHost {
    /// Whether a real container is present.
    fn is_embedded(&self) -> bool {
        false
    }

    /// Startup handshake: signal readiness and take the full viewport.
    fn ready(&self) {}

    fn color_scheme(&self) -> ColorScheme {
        ColorScheme::Light
    }

    fn haptic(&self, _signal: Haptic) {}

    /// Offer `text` through the host's share popup. Returns false when the
    /// host has no share dialog, so the caller can fall back.
    fn share(&self, _text: &str) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoHost;

impl EmbeddingHost for NoHost {}
