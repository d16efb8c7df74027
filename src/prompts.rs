use crate::{Error, Result};

pub const FABLE_SYSTEM: &str = include_str!("../data/prompts/fable_system.txt");
pub const FABLE_USER: &str = include_str!("../data/prompts/fable_user.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// Whitespace inside the braces is ignored, so `{{ age }}` and `{{age}}` are
/// equivalent. An unclosed `{{`, an empty name or a name missing from `vars`
/// is a [`Error::Template`]. Substituted values are copied verbatim and never
/// scanned for placeholders themselves.
pub fn render(template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let end = after_open.find("}}").ok_or_else(|| {
            Error::Template(format!(
                "unclosed placeholder at byte {}",
                template.len() - rest.len() + start
            ))
        })?;

        let key = after_open[..end].trim();
        if key.is_empty() {
            return Err(Error::Template("empty placeholder name".to_string()));
        }

        let value = vars
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
            .ok_or_else(|| Error::Template(format!("undefined placeholder '{}'", key)))?;
        result.push_str(value);

        rest = &after_open[end + 2..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Render the user-level instruction for one fable request.
pub fn render_fable_prompt(
    age: u32,
    world_description: &str,
    main_character: &str,
    num_images: usize,
) -> Result<String> {
    let age = age.to_string();
    let num_images = num_images.to_string();

    render(
        FABLE_USER,
        &[
            ("age", &age),
            ("world_description", world_description),
            ("main_character", main_character),
            ("num_images", &num_images),
        ],
    )
}
