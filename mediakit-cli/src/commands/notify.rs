// ============================================================================
// mediakit-cli/src/commands/notify.rs
// ============================================================================
//
// NOTIFY COMMAND: Show, edit, persist and test notification settings

use mediakit_core::notifications::{
    Notifier, NotifyConfig, NotifyConfigStore, TASK_PLACEHOLDER, build_notifiers, parse_body,
    parse_headers,
};
use mediakit_core::terminal_output::{
    print_error, print_section, print_status, print_success, print_warning,
};
use mediakit_core::CoreError;

use super::show;
use crate::cli::{GlobalArgs, NotifyAction, NotifyUpdateArgs};
use crate::error::{CliErrorContext, CliResult};

pub fn run_notify(action: NotifyAction, global: &GlobalArgs) -> CliResult<()> {
    let store = NotifyConfigStore::new(&global.notify_config);
    match action {
        NotifyAction::Show => {
            let (config, loaded) = store.load();
            print_config(&store, &config, loaded);
            Ok(())
        }
        NotifyAction::Update(args) => {
            let (mut config, _) = store.load();
            apply_update(&mut config, args)?;
            store
                .save(&config)
                .cli_context("Saving notification settings")?;
            print_success(&format!("Saved {}", show(store.path())));
            Ok(())
        }
        NotifyAction::Save => {
            let (config, _) = store.load();
            store
                .save(&config)
                .cli_context("Saving notification settings")?;
            print_success(&format!("Saved {}", show(store.path())));
            Ok(())
        }
        NotifyAction::Delete => {
            if store.delete() {
                print_success(&format!("Removed {}", show(store.path())));
                Ok(())
            } else {
                Err(CoreError::OperationFailed(format!(
                    "Failed to delete {}",
                    show(store.path())
                )))
            }
        }
        NotifyAction::Test { task } => send_test(&store, &task),
    }
}

/// Applies the given flags to `config`, validating webhook JSON first.
pub fn apply_update(config: &mut NotifyConfig, args: NotifyUpdateArgs) -> CliResult<()> {
    if let Some(headers) = &args.webhook_headers {
        parse_headers(headers)?;
    }
    if let Some(body) = &args.webhook_body {
        // `{task}` may sit inside a JSON string, so validate with it filled in.
        parse_body(&body.replace(TASK_PLACEHOLDER, "task"))?;
    }

    if args.enable {
        config.enabled = true;
    }
    if args.disable {
        config.enabled = false;
    }
    if let Some(v) = args.feishu_webhook {
        config.feishu_webhook = v;
    }
    if let Some(v) = args.feishu_title {
        config.feishu_title = v;
    }
    if let Some(v) = args.feishu_content {
        config.feishu_content = v;
    }
    if let Some(v) = args.feishu_color {
        config.feishu_color = v;
    }
    if let Some(v) = args.webhook_url {
        config.webhook_url = v;
    }
    if let Some(v) = args.webhook_headers {
        config.webhook_headers = v;
    }
    if let Some(v) = args.webhook_body {
        config.webhook_body = v;
    }
    if let Some(v) = args.ntfy_topic {
        config.ntfy_topic = (!v.trim().is_empty()).then_some(v);
    }
    Ok(())
}

fn print_config(store: &NotifyConfigStore, config: &NotifyConfig, loaded: bool) {
    let or_unset = |value: &str| {
        if value.trim().is_empty() {
            "(not set)".to_string()
        } else {
            value.to_string()
        }
    };

    print_section("Notifications");
    let source = if loaded { "file" } else { "defaults" };
    print_status("Config", &format!("{} ({})", show(store.path()), source), false);
    print_status("Enabled", if config.enabled { "yes" } else { "no" }, true);
    print_status("Feishu webhook", &or_unset(&config.feishu_webhook), false);
    print_status("Feishu title", &config.feishu_title, false);
    print_status("Feishu content", &config.feishu_content, false);
    print_status("Feishu color", &config.feishu_color, false);
    print_status("Webhook URL", &or_unset(&config.webhook_url), false);
    print_status("Webhook headers", &config.webhook_headers, false);
    print_status("Webhook body", &config.webhook_body, false);
    print_status(
        "ntfy topic",
        &or_unset(config.ntfy_topic.as_deref().unwrap_or_default()),
        false,
    );
}

fn send_test(store: &NotifyConfigStore, task: &str) -> CliResult<()> {
    let (config, _) = store.load();
    let notifiers = build_notifiers(&config, task);
    if notifiers.is_empty() {
        return Err(CoreError::Config(
            "No notification channel configured".to_string(),
        ));
    }

    print_section("Notification Test");
    let mut failed = 0;
    for (channel, notifier) in notifiers {
        match notifier.and_then(|n| n.send()) {
            Ok(()) => print_success(&format!("{}: sent", channel)),
            Err(e) => {
                failed += 1;
                print_error(&format!("{}: {}", channel, e));
            }
        }
    }
    if !config.enabled {
        print_warning("Automatic notifications are disabled (notify update --enable)");
    }

    if failed == 0 {
        Ok(())
    } else {
        Err(CoreError::NotificationError(format!(
            "{} channel(s) failed",
            failed
        )))
    }
}
