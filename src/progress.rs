use indicatif::ProgressStyle;

/// Style for the batch bar while projects are being processed.
/// - Yellow spinner, a bar of finished projects, and the latest project name.
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "\x1b[33m{spinner}\x1b[0m [{bar:30}] {pos}/{len} {wide_msg}",
    )
    .unwrap()
    .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"])
    .progress_chars("=> ")
}

/// Style used once every project has finished.
/// - Green check mark followed by the final message.
pub fn ok_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[32m✔\x1b[0m {wide_msg}").unwrap()
}

/// Style used when at least one project failed.
/// - Red cross followed by the final message.
pub fn err_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[31m✘\x1b[0m {wide_msg}").unwrap()
}
