use std::path::Path;

/// Resolve a possibly relative path against the current directory.
/// Falls back to the given path unchanged when the directory is unavailable.
pub fn absolute_path(relative: &str) -> String {
    let path = Path::new(relative);
    if path.is_absolute() {
        return relative.to_string();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path).to_string_lossy().into_owned(),
        Err(_) => relative.to_string(),
    }
}

/// Editor-specific deep link for `file_path:line`. Unknown editors get the VS Code scheme.
pub fn editor_url(editor: &str, file_path: &str, line_number: u32) -> String {
    let absolute = absolute_path(file_path);

    match editor.trim().to_lowercase().as_str() {
        "cursor" => format!("cursor://file/{absolute}:{line_number}"),
        "webstorm" | "idea" => format!("webstorm://open?file={absolute}&line={line_number}"),
        "sublime" | "subl" => format!("sublime://open?file={absolute}&line={line_number}"),
        "atom" => format!("atom://open?file={absolute}&line={line_number}"),
        _ => format!("vscode://file/{absolute}:{line_number}"),
    }
}
