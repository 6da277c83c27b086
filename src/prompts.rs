pub const FRAME_BACKGROUND: &str = include_str!("../data/prompts/frame_background.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Image prompt for a decorative frame background about `subject`.
pub fn frame_background(subject: &str) -> String {
    render(FRAME_BACKGROUND, &[("subject", subject)])
}
