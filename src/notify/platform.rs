//! Platform notification capability.
//!
//! The scheduler only needs a permission answer and a way to show a message.
//! [`DesktopNotifier`] provides both over the freedesktop notification
//! service on the session bus, using zbus's blocking API.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use zbus::blocking::Connection;
use zbus::zvariant::Value;

use crate::constants::{NOTIFICATION_EXPIRE_MS, NOTIFICATION_ICON};

/// Whether notifications may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    /// Not decided yet; resolved on first request.
    #[serde(rename = "ask", alias = "undecided")]
    Undecided,
}

/// Something that can show notifications.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationPlatform {
    fn query_permission(&self) -> Permission;

    /// Ask for permission. Only called while the answer is undecided.
    fn request_permission(&self) -> Permission;

    /// Show a notification. Notifications sharing a `tag` replace each other.
    fn dispatch(&self, title: &str, body: &str, tag: &str) -> Result<()>;
}

/// D-Bus proxy for the freedesktop notification service.
#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: &HashMap<&str, &Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;

    /// Returns (name, vendor, version, spec_version).
    fn get_server_information(&self) -> zbus::Result<(String, String, String, String)>;
}

/// Desktop notifications over the session bus.
///
/// "Permission" on the desktop is a user setting: `granted` and `denied` are
/// taken as-is, `ask` resolves to granted the first time a notification
/// server answers on the bus. Until one does, every request is refused for
/// that call only.
pub struct DesktopNotifier {
    permission: Mutex<Permission>,
    connection: Mutex<Option<Connection>>,
    /// Server-side notification id last shown for each tag.
    shown: Mutex<HashMap<String, u32>>,
}

impl DesktopNotifier {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission: Mutex::new(permission),
            connection: Mutex::new(None),
            shown: Mutex::new(HashMap::new()),
        }
    }

    /// Session bus connection, opened on first use.
    fn connection(&self) -> Result<Connection> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| anyhow::anyhow!("Notifier connection lock poisoned"))?;
        if let Some(connection) = guard.as_ref() {
            return Ok(connection.clone());
        }

        let connection = Connection::session().context("Failed to connect to the session bus")?;
        *guard = Some(connection.clone());
        Ok(connection)
    }

    fn probe_server(&self) -> Result<String> {
        let connection = self.connection()?;
        let proxy = NotificationsProxyBlocking::new(&connection)
            .context("Failed to create notification proxy")?;
        let (name, _vendor, version, _spec) = proxy
            .get_server_information()
            .context("Notification server did not answer")?;
        Ok(format!("{name} {version}"))
    }
}

impl NotificationPlatform for DesktopNotifier {
    fn query_permission(&self) -> Permission {
        self.permission
            .lock()
            .map(|permission| *permission)
            .unwrap_or(Permission::Denied)
    }

    fn request_permission(&self) -> Permission {
        match self.probe_server() {
            Ok(server) => {
                log_debug!("Notification server available: {server}");
                if let Ok(mut permission) = self.permission.lock() {
                    *permission = Permission::Granted;
                }
                Permission::Granted
            }
            Err(e) => {
                // No answer is not a refusal; stay undecided and probe again next time.
                log_warning!("Notifications unavailable: {e:#}");
                Permission::Denied
            }
        }
    }

    fn dispatch(&self, title: &str, body: &str, tag: &str) -> Result<()> {
        let connection = self.connection()?;
        let proxy = NotificationsProxyBlocking::new(&connection)
            .context("Failed to create notification proxy")?;

        let replaces_id = self
            .shown
            .lock()
            .ok()
            .and_then(|shown| shown.get(tag).copied())
            .unwrap_or(0);

        let tag_value = Value::from(tag);
        let urgency = Value::from(1u8);
        let hints: HashMap<&str, &Value<'_>> = HashMap::from([
            ("x-dunst-stack-tag", &tag_value),
            ("x-canonical-private-synchronous", &tag_value),
            ("urgency", &urgency),
        ]);

        let id = proxy
            .notify(
                "smoon",
                replaces_id,
                NOTIFICATION_ICON,
                title,
                body,
                &[],
                &hints,
                NOTIFICATION_EXPIRE_MS,
            )
            .context("Notification server rejected the notification")?;

        if let Ok(mut shown) = self.shown.lock() {
            shown.insert(tag.to_string(), id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[derive(Deserialize)]
    struct Wrapper {
        permission: Permission,
    }

    #[test]
    fn test_permission_parses_config_values() {
        let parse = |s: &str| {
            toml::from_str::<Wrapper>(&format!("permission = \"{s}\"")).map(|w| w.permission)
        };
        assert_eq!(parse("granted").unwrap(), Permission::Granted);
        assert_eq!(parse("denied").unwrap(), Permission::Denied);
        assert_eq!(parse("ask").unwrap(), Permission::Undecided);
        assert_eq!(parse("undecided").unwrap(), Permission::Undecided);
        assert!(parse("maybe").is_err());
    }

    #[test]
    #[serial]
    fn test_unreachable_bus_stays_undecided() {
        let dir = tempdir().unwrap();
        let original = std::env::var("DBUS_SESSION_BUS_ADDRESS").ok();
        let address = format!("unix:path={}", dir.path().join("no-bus").display());
        unsafe {
            std::env::set_var("DBUS_SESSION_BUS_ADDRESS", address);
        }

        let notifier = DesktopNotifier::new(Permission::Undecided);
        let first = notifier.request_permission();
        let after_first = notifier.query_permission();
        let second = notifier.request_permission();

        unsafe {
            match original {
                Some(val) => std::env::set_var("DBUS_SESSION_BUS_ADDRESS", val),
                None => std::env::remove_var("DBUS_SESSION_BUS_ADDRESS"),
            }
        }

        assert_eq!(first, Permission::Denied);
        assert_eq!(after_first, Permission::Undecided);
        assert_eq!(second, Permission::Denied);
        assert_eq!(notifier.query_permission(), Permission::Undecided);
    }

    #[test]
    fn test_configured_permission_is_reported() {
        assert_eq!(
            DesktopNotifier::new(Permission::Denied).query_permission(),
            Permission::Denied
        );
        assert_eq!(
            DesktopNotifier::new(Permission::Granted).query_permission(),
            Permission::Granted
        );
    }
}
