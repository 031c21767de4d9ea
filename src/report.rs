use crate::import::ImportTally;

pub const KEY_IMPORT_SUCCESS: &str = "QuestImport.Notifications.ImportSuccess";
pub const KEY_IMPORT_PARTIAL: &str = "QuestImport.Notifications.ImportPartial";
pub const KEY_IMPORT_FAILED: &str = "QuestImport.Notifications.ImportFailed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub key: &'static str,
    pub params: Vec<(&'static str, usize)>,
}

/// Maps the end-of-batch tally to at most one notification.
pub fn report(tally: ImportTally) -> Option<Notification> {
    let (severity, key, params) = match (tally.success, tally.fail) {
        (0, 0) => return None,
        (success, 0) => (Severity::Info, KEY_IMPORT_SUCCESS, vec![("count", success)]),
        (0, _) => (Severity::Error, KEY_IMPORT_FAILED, Vec::new()),
        (success, fail) => (
            Severity::Warning,
            KEY_IMPORT_PARTIAL,
            vec![("success", success), ("fail", fail)],
        ),
    };
    Some(Notification {
        severity,
        key,
        params,
    })
}

/// English text for a notification, with `{param}` placeholders filled in.
pub fn render(notification: &Notification) -> String {
    let template = match notification.key {
        KEY_IMPORT_SUCCESS => "Imported {count} quest(s).",
        KEY_IMPORT_PARTIAL => "Imported {success} quest(s); {fail} could not be imported.",
        KEY_IMPORT_FAILED => "Quest import failed.",
        other => other,
    };
    notification
        .params
        .iter()
        .fold(template.to_owned(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), &value.to_string())
        })
}
