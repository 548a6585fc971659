//! Per-kind control markup.
//!
//! `attrs` is a pre-rendered attribute string from
//! [`render_attrs`](super::render_attrs); everything else is escaped here.

use super::{html_escape, loose_eq};

/// Renders an `<input>` of the given type with a value.
pub fn text_input(input_type: &str, name: &str, id: &str, value: &str, attrs: &str) -> String {
    format!(
        r#"<input type="{}" name="{}" id="{}" value="{}"{attrs}>"#,
        html_escape(input_type),
        html_escape(name),
        html_escape(id),
        html_escape(value)
    )
}

/// Renders a file input; never pre-filled.
pub fn file_input(name: &str, id: &str, attrs: &str) -> String {
    text_input("file", name, id, "", attrs)
}

/// Renders a `<textarea>` whose body is the value.
pub fn textarea(name: &str, id: &str, value: &str, attrs: &str) -> String {
    format!(
        r#"<textarea name="{}" id="{}"{attrs}>{}</textarea>"#,
        html_escape(name),
        html_escape(id),
        html_escape(value)
    )
}

/// Renders a `<select>`; the option matching `value` is selected.
pub fn select(
    name: &str,
    id: &str,
    choices: &[(&str, &str)],
    value: &str,
    attrs: &str,
) -> String {
    let mut options = String::new();
    for (opt_value, label) in choices {
        let selected_attr = if loose_eq(opt_value, value) {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            r#"<option value="{}"{selected_attr}>{}</option>"#,
            html_escape(opt_value),
            html_escape(label)
        ));
    }

    format!(
        r#"<select name="{}" id="{}"{attrs}>{options}</select>"#,
        html_escape(name),
        html_escape(id)
    )
}

/// Renders one radio button per choice; the choice matching `value` is checked.
pub fn radio_group(
    name: &str,
    id: &str,
    choices: &[(&str, &str)],
    value: &str,
    attrs: &str,
) -> String {
    choices
        .iter()
        .map(|(opt_value, label)| {
            choice_input("radio", name, id, opt_value, label, loose_eq(opt_value, value), attrs)
        })
        .collect()
}

/// Renders one checkbox per choice, named `name[]`; members of `selected` are checked.
pub fn checkbox_group(
    name: &str,
    id: &str,
    choices: &[(&str, &str)],
    selected: &[&str],
    attrs: &str,
) -> String {
    let array_name = format!("{name}[]");
    choices
        .iter()
        .map(|(opt_value, label)| {
            let checked = selected.iter().any(|v| loose_eq(opt_value, v));
            choice_input("checkbox", &array_name, id, opt_value, label, checked, attrs)
        })
        .collect()
}

/// Renders a lone checkbox submitting `1`.
pub fn single_checkbox(name: &str, id: &str, checked: bool, attrs: &str) -> String {
    let checked_attr = if checked { " checked" } else { "" };
    format!(
        r#"<input type="checkbox" name="{}" id="{}" value="1"{checked_attr}{attrs}>"#,
        html_escape(name),
        html_escape(id)
    )
}

fn choice_input(
    input_type: &str,
    name: &str,
    id: &str,
    opt_value: &str,
    label: &str,
    checked: bool,
    attrs: &str,
) -> String {
    let option_id = html_escape(&format!("{id}_{opt_value}"));
    let checked_attr = if checked { " checked" } else { "" };
    format!(
        r#"<div><input type="{input_type}" name="{}" id="{option_id}" value="{}"{checked_attr}{attrs}><label for="{option_id}">{}</label></div>"#,
        html_escape(name),
        html_escape(opt_value),
        html_escape(label)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input() {
        let html = text_input("email", "email", "email-field", "a@b.com", r#" class="x""#);
        assert_eq!(
            html,
            r#"<input type="email" name="email" id="email-field" value="a@b.com" class="x">"#
        );
    }

    #[test]
    fn test_textarea_escapes_body() {
        let html = textarea("message", "message", "</textarea><b>", "");
        assert_eq!(
            html,
            r#"<textarea name="message" id="message">&lt;/textarea&gt;&lt;b&gt;</textarea>"#
        );
    }

    #[test]
    fn test_select() {
        let html = select("subject", "subject", &[("1", "1"), ("2", "2")], "2", "");
        assert!(html.contains(r#"<option value="2" selected>2</option>"#));
        assert!(html.contains(r#"<option value="1">1</option>"#));
    }

    #[test]
    fn test_select_without_match() {
        let html = select("subject", "subject", &[("a", "A"), ("b", "B")], "z", "");
        assert!(!html.contains("selected"));
    }

    #[test]
    fn test_radio_group() {
        let html = radio_group("size", "size", &[("s", "Small"), ("l", "Large")], "l", " required");
        assert!(html.contains(
            r#"<input type="radio" name="size" id="size_l" value="l" checked required><label for="size_l">Large</label>"#
        ));
        assert!(html.contains(r#"id="size_s" value="s" required>"#));
    }

    #[test]
    fn test_checkbox_group() {
        let html = checkbox_group(
            "tags",
            "tags",
            &[("a", "A"), ("b", "B"), ("c", "C")],
            &["a", "c"],
            "",
        );
        assert!(html.contains(r#"name="tags[]" id="tags_a" value="a" checked>"#));
        assert!(html.contains(r#"name="tags[]" id="tags_b" value="b">"#));
        assert!(html.contains(r#"name="tags[]" id="tags_c" value="c" checked>"#));
    }
}
