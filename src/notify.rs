use tracing::{error, info};

/// Fire-and-forget user feedback. Nothing returned here is consumed.
pub trait Notifier {
    /// Show a persistent "working" indicator until [`Notifier::dismiss`].
    fn loading(&mut self, message: &str);
    fn info(&mut self, message: &str, detail: Option<&str>);
    fn success(&mut self, message: &str, detail: Option<&str>);
    fn error(&mut self, message: &str, detail: Option<&str>);
    fn dismiss(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Loading,
    Info,
    Success,
    Error,
}

/// One notification, as the terminal UI keeps it for its status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: Level,
    pub message: String,
    pub detail: Option<String>,
}

impl Toast {
    fn new(level: Level, message: &str, detail: Option<&str>) -> Self {
        Self {
            level,
            message: message.to_string(),
            detail: detail.map(str::to_string),
        }
    }
}

/// Remembers the most recent notification; dismissing clears only a loading one.
#[derive(Debug, Default)]
pub struct ToastNotifier {
    pub current: Option<Toast>,
}

impl Notifier for ToastNotifier {
    fn loading(&mut self, message: &str) {
        self.current = Some(Toast::new(Level::Loading, message, None));
    }

    fn info(&mut self, message: &str, detail: Option<&str>) {
        self.current = Some(Toast::new(Level::Info, message, detail));
    }

    fn success(&mut self, message: &str, detail: Option<&str>) {
        self.current = Some(Toast::new(Level::Success, message, detail));
    }

    fn error(&mut self, message: &str, detail: Option<&str>) {
        self.current = Some(Toast::new(Level::Error, message, detail));
    }

    fn dismiss(&mut self) {
        if self.current.as_ref().is_some_and(|t| t.level == Level::Loading) {
            self.current = None;
        }
    }
}

/// Routes notifications to the log; used by the one-shot CLI.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn loading(&mut self, message: &str) {
        info!("{message}");
    }

    fn info(&mut self, message: &str, detail: Option<&str>) {
        info!(detail = detail.unwrap_or_default(), "{message}");
    }

    fn success(&mut self, message: &str, detail: Option<&str>) {
        info!(detail = detail.unwrap_or_default(), "{message}");
    }

    fn error(&mut self, message: &str, detail: Option<&str>) {
        error!(detail = detail.unwrap_or_default(), "{message}");
    }

    fn dismiss(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismiss_only_clears_loading() {
        let mut n = ToastNotifier::default();
        n.loading("Extracting colors...");
        n.dismiss();
        assert_eq!(n.current, None);

        n.error("error loading image", None);
        n.dismiss();
        assert_eq!(n.current.as_ref().map(|t| t.level), Some(Level::Error));
    }

    #[test]
    fn latest_notification_wins() {
        let mut n = ToastNotifier::default();
        n.info("Color already exists", Some("This color is already in your list"));
        n.success("extracted 3 colors from image", None);
        let toast = n.current.unwrap();
        assert_eq!(toast.level, Level::Success);
        assert_eq!(toast.detail, None);
    }
}
