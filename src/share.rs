//! Result sharing with a three-step fallback: host popup, platform share
//! sheet, clipboard.

use crate::host::EmbeddingHost;

pub const SHARE_TITLE: &str = "Auto Quiz";

pub fn share_text(percent: u32) -> String {
    format!("I scored {percent}% in the Auto Quiz! Can you beat it?")
}

/// Browser-side share capabilities.
pub trait PlatformShare {
    /// Open the platform share sheet. Returns false when unsupported.
    fn native_share(&self, title: &str, text: &str) -> bool;

    /// Copy `text`; the implementation shows its own confirmation notice.
    fn copy_to_clipboard(&self, text: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareRoute {
    Host,
    Native,
    Clipboard,
}

pub fn dispatch_share(
    host: &dyn EmbeddingHost,
    platform: &dyn PlatformShare,
    text: &str,
) -> ShareRoute {
    let route = if host.share(text) {
        ShareRoute::Host
    } else if platform.native_share(SHARE_TITLE, text) {
        ShareRoute::Native
    } else {
        platform.copy_to_clipboard(text);
        ShareRoute::Clipboard
    };
    log::debug!("result shared via {route:?}");
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NoHost;
    use std::cell::RefCell;

    struct FakePlatform {
        has_share: bool,
        shared: RefCell<Vec<String>>,
        copied: RefCell<Vec<String>>,
    }

    impl FakePlatform {
        fn new(has_share: bool) -> Self {
            Self { has_share, shared: RefCell::default(), copied: RefCell::default() }
        }
    }

    impl PlatformShare for FakePlatform {
        fn native_share(&self, _title: &str, text: &str) -> bool {
            if self.has_share {
                self.shared.borrow_mut().push(text.to_string());
            }
            self.has_share
        }

        fn copy_to_clipboard(&self, text: &str) {
            self.copied.borrow_mut().push(text.to_string());
        }
    }

    struct SharingHost;

    impl EmbeddingHost for SharingHost {
        fn share(&self, _text: &str) -> bool {
            true
        }
    }

    #[test]
    fn text_embeds_percent() {
        assert!(share_text(80).contains("80%"));
    }

    #[test]
    fn host_wins() {
        let platform = FakePlatform::new(true);
        assert_eq!(dispatch_share(&SharingHost, &platform, "x"), ShareRoute::Host);
        assert!(platform.shared.borrow().is_empty());
    }

    #[test]
    fn native_then_clipboard() {
        let platform = FakePlatform::new(true);
        assert_eq!(dispatch_share(&NoHost, &platform, "x"), ShareRoute::Native);
        assert_eq!(platform.shared.borrow().len(), 1);

        let platform = FakePlatform::new(false);
        assert_eq!(dispatch_share(&NoHost, &platform, "y"), ShareRoute::Clipboard);
        assert_eq!(*platform.copied.borrow(), vec!["y".to_string()]);
    }
}
