//! Form rendering.

use ironhtml::html;
use ironhtml::typed::Element;
use ironhtml_elements::Div;

use crate::error::{FieldError, ValidationErrors};
use crate::schema::{FieldDescriptor, FieldKind, FormSchema};
use crate::submission::{FieldValue, Submission};
use crate::widgets::render_control;

const MULTIPART: &str = "multipart/form-data";

/// Renders one field block: label, control and inline error.
pub fn render_field(
    field: &FieldDescriptor,
    value: Option<&FieldValue>,
    error: Option<&FieldError>,
) -> String {
    let id = field.element_id();
    let label_text = field.label.clone();
    let messages: Vec<String> = error.map(ToString::to_string).into_iter().collect();

    let label_el = html! {
        label.for_(#id) { #label_text }
    };
    let control = render_control(field, value);

    html! { div.class("form-group") }
        .raw(label_el.render())
        .raw(&control)
        .children(messages.as_slice(), |message, div: Element<Div>| {
            div.class("error").text(message)
        })
        .render()
}

/// Renders the complete form.
///
/// Sticky values come from the submission channel matching the form method;
/// file fields are never pre-filled. `errors` is normally the result of the
/// validation pass that just ran over the same submission.
pub fn render_form(
    schema: &FormSchema,
    submission: &Submission,
    errors: &ValidationErrors,
) -> String {
    let action = schema.action();
    let method = schema.method().as_str();

    let mut form = html! {
        form.action(#action).method(#method)
    };
    if schema.has_file_field() {
        form = form.attr("enctype", MULTIPART);
    }

    for field in schema.fields() {
        let value = match field.kind {
            FieldKind::File => None,
            _ => submission.value(schema.method(), &field.name),
        };
        let field_html = render_field(field, value, errors.get(&field.name));
        form = form.child::<Div, _>(|d| d.raw(&field_html));
    }

    form.child::<Div, _>(|d| {
        let btn = html! {
            button.type_("submit") { "Submit" }
        };
        d.raw(btn.render())
    })
    .render()
}
