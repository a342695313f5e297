use crate::caller_info::CallerInfo;
use crate::config::LoggerConfig;
use crate::formatter::{
    ansi_color, format_browser, format_browser_debug_tag, format_terminal, meta_prefix, LogLine,
    ANSI_META, ANSI_RESET, CSS_META,
};
use crate::log_sink::{ConsoleMethod, Role};
use serde_json::json;

fn caller() -> CallerInfo {
    CallerInfo {
        file_name: Some("src/foo.ts".into()),
        line_number: Some(12),
        column_number: Some(5),
        function_name: Some("handler".into()),
        full_path: Some("/app/src/foo.ts".into()),
    }
}

fn line<'a>(role: Role, method: ConsoleMethod, caller: &'a CallerInfo) -> LogLine<'a> {
    LogLine {
        role,
        method,
        message: "hello",
        args: &[],
        caller,
        timestamp: Some("10:11:12.013"),
        editor_link: None,
    }
}

#[test]
fn test_full_prefix_with_defaults() {
    let caller = caller();
    let prefix = meta_prefix(
        &line(Role::Server, ConsoleMethod::Info, &caller),
        &LoggerConfig::default(),
    );
    assert_eq!(prefix, "[10:11:12.013] [SERVER/INFO] src/foo.ts:12:5");
}

#[test]
fn test_prefix_parts_follow_toggles() {
    let caller = caller();
    let line = line(Role::Client, ConsoleMethod::Warn, &caller);

    let config = LoggerConfig {
        show_timestamp: false,
        show_line_number: false,
        ..Default::default()
    };
    assert_eq!(meta_prefix(&line, &config), "[CLIENT/WARN] src/foo.ts");

    let config = LoggerConfig {
        show_file_name: false,
        show_function_name: true,
        ..Default::default()
    };
    assert_eq!(
        meta_prefix(&line, &config),
        "[10:11:12.013] [CLIENT/WARN] in handler()"
    );
}

#[test]
fn test_missing_caller_leaves_only_tag() {
    let caller = CallerInfo::default();
    let config = LoggerConfig {
        show_timestamp: false,
        show_function_name: true,
        ..Default::default()
    };
    let prefix = meta_prefix(&line(Role::Server, ConsoleMethod::Log, &caller), &config);
    assert_eq!(prefix, "[SERVER/LOG]");
}

#[test]
fn test_zero_line_number_is_not_shown() {
    let caller = CallerInfo {
        line_number: Some(0),
        ..caller()
    };
    let config = LoggerConfig {
        show_timestamp: false,
        ..Default::default()
    };
    let prefix = meta_prefix(&line(Role::Server, ConsoleMethod::Log, &caller), &config);
    assert_eq!(prefix, "[SERVER/LOG] src/foo.ts");
}

#[test]
fn test_terminal_output_uses_ansi_colors() {
    let caller = caller();
    let call = format_terminal(
        &line(Role::Server, ConsoleMethod::Error, &caller),
        &LoggerConfig::default(),
    );
    assert_eq!(call.method, ConsoleMethod::Error);
    assert_eq!(
        call.format,
        format!(
            "{ANSI_META}[10:11:12.013] [SERVER/ERROR] src/foo.ts:12:5{ANSI_RESET} \n{}→{ANSI_RESET} hello",
            ansi_color(ConsoleMethod::Error)
        )
    );
    assert!(call.styles.is_empty());
}

#[test]
fn test_terminal_output_without_colors_has_no_escape_codes() {
    let caller = caller();
    let mut line = line(Role::Server, ConsoleMethod::Warn, &caller);
    let args = [json!({"id": 1})];
    line.args = &args;
    line.editor_link = Some("vscode://file//app/src/foo.ts:12");
    let config = LoggerConfig {
        use_colors: false,
        ..Default::default()
    };

    let call = format_terminal(&line, &config);
    let rendered = call.render();
    assert!(!rendered.contains('\x1b'));
    assert_eq!(
        rendered,
        "[10:11:12.013] [SERVER/WARN] src/foo.ts:12:5 \n→ hello {\"id\":1}\n📁 vscode://file//app/src/foo.ts:12"
    );
}

#[test]
fn test_terminal_args_are_passed_through() {
    let caller = caller();
    let mut line = line(Role::Server, ConsoleMethod::Log, &caller);
    let args = [json!({"a": [1, 2]}), json!("two"), json!(null)];
    line.args = &args;
    let call = format_terminal(&line, &LoggerConfig::default());
    assert_eq!(call.args, args.to_vec());
    assert_eq!(call.message, "hello");
}

#[test]
fn test_browser_output_uses_css_styles() {
    let caller = caller();
    let call = format_browser(
        &line(Role::Client, ConsoleMethod::Info, &caller),
        &LoggerConfig::default(),
    );
    assert_eq!(
        call.format,
        "%c[10:11:12.013] [CLIENT/INFO] src/foo.ts:12:5%c → hello"
    );
    assert_eq!(
        call.styles,
        vec![
            CSS_META.to_string(),
            "color: #3b82f6; font-weight: normal;".to_string()
        ]
    );
}

#[test]
fn test_browser_output_without_colors_is_plain() {
    let caller = caller();
    let config = LoggerConfig {
        use_colors: false,
        show_timestamp: false,
        ..Default::default()
    };
    let call = format_browser(&line(Role::Client, ConsoleMethod::Log, &caller), &config);
    assert_eq!(call.format, "[CLIENT/LOG] src/foo.ts:12:5 → hello");
    assert!(call.styles.is_empty());
    assert!(!call.format.contains("%c"));
}

#[test]
fn test_debug_tag_call() {
    let call = format_browser_debug_tag("cache miss", &[json!(3)]);
    assert_eq!(call.method, ConsoleMethod::Log);
    assert_eq!(call.format, "%c[DEBUG]%c cache miss");
    assert_eq!(call.styles.len(), 2);
    assert_eq!(call.render(), "[DEBUG] cache miss 3");
}

#[test]
fn test_percent_c_in_message_survives_terminal_render() {
    let caller = CallerInfo::default();
    let mut line = line(Role::Server, ConsoleMethod::Info, &caller);
    line.message = "retry 100%complete";
    let config = LoggerConfig {
        show_timestamp: false,
        ..Default::default()
    };

    let call = format_terminal(&line, &config);
    assert!(call.render().contains("retry 100%complete"));

    let plain = LoggerConfig {
        use_colors: false,
        ..config
    };
    assert_eq!(
        format_terminal(&line, &plain).render(),
        "[SERVER/INFO] \n→ retry 100%complete"
    );
}

#[test]
fn test_percent_c_in_message_survives_browser_render() {
    let caller = CallerInfo::default();
    let mut line = line(Role::Client, ConsoleMethod::Log, &caller);
    line.message = "width 50%c of %c";
    let config = LoggerConfig {
        show_timestamp: false,
        ..Default::default()
    };

    let styled = format_browser(&line, &config);
    assert_eq!(styled.styles.len(), 2);
    assert_eq!(styled.render(), "[CLIENT/LOG] → width 50%c of %c");

    let plain = LoggerConfig {
        use_colors: false,
        ..config
    };
    assert_eq!(
        format_browser(&line, &plain).render(),
        "[CLIENT/LOG] → width 50%c of %c"
    );
}
