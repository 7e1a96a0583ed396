//! Form components for maud templates.

use maud::{html, Markup, Render};

/// A form container element.
#[derive(Debug)]
pub struct Form<'a> {
    /// Form action URL
    pub action: &'a str,
    /// HTTP method ("get" or "post")
    pub method: &'a str,
    /// Form content (inputs, buttons, etc.)
    pub content: Markup,
    /// Enable multipart/form-data encoding
    pub multipart: bool,
}

impl<'a> Form<'a> {
    /// Create a new form with the given action and method.
    #[must_use]
    pub fn new(action: &'a str, method: &'a str, content: Markup) -> Self {
        Self {
            action,
            method,
            content,
            multipart: false,
        }
    }

    /// Create a POST form.
    #[must_use]
    pub fn post(action: &'a str, content: Markup) -> Self {
        Self::new(action, "post", content)
    }

    /// Enable multipart/form-data encoding (for file uploads).
    #[must_use]
    pub fn multipart(mut self) -> Self {
        self.multipart = true;
        self
    }
}

impl Render for Form<'_> {
    fn render(&self) -> Markup {
        html! {
            form
                action=(self.action)
                method=(self.method)
                enctype=[self.multipart.then_some("multipart/form-data")]
            {
                (self.content)
            }
        }
    }
}

/// An input element.
#[derive(Debug, Clone)]
pub struct Input<'a> {
    pub name: &'a str,
    /// Input type ("text", "password", "file", "hidden", etc.)
    pub r#type: &'a str,
    pub value: Option<&'a str>,
    pub required: bool,
    pub id: Option<&'a str>,
    pub autocomplete: Option<&'a str>,
    /// `accept` attribute for file inputs
    pub accept: Option<&'a str>,
}

impl<'a> Input<'a> {
    /// Create a new input with the given name and type.
    #[must_use]
    pub fn new(name: &'a str, r#type: &'a str) -> Self {
        Self {
            name,
            r#type,
            value: None,
            required: false,
            id: None,
            autocomplete: None,
            accept: None,
        }
    }

    #[must_use]
    pub fn text(name: &'a str) -> Self {
        Self::new(name, "text")
    }

    #[must_use]
    pub fn password(name: &'a str) -> Self {
        Self::new(name, "password")
    }

    #[must_use]
    pub fn file(name: &'a str) -> Self {
        Self::new(name, "file")
    }

    #[must_use]
    pub fn hidden(name: &'a str, value: &'a str) -> Self {
        Self::new(name, "hidden").value(value)
    }

    #[must_use]
    pub fn value(mut self, value: &'a str) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn autocomplete(mut self, autocomplete: &'a str) -> Self {
        self.autocomplete = Some(autocomplete);
        self
    }

    #[must_use]
    pub fn accept(mut self, accept: &'a str) -> Self {
        self.accept = Some(accept);
        self
    }
}

impl Render for Input<'_> {
    fn render(&self) -> Markup {
        html! {
            input
                type=(self.r#type)
                name=(self.name)
                value=[self.value]
                required[self.required]
                id=[self.id]
                autocomplete=[self.autocomplete]
                accept=[self.accept];
        }
    }
}

/// A textarea element.
#[derive(Debug)]
pub struct TextArea<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
    pub placeholder: Option<&'a str>,
    pub rows: Option<u32>,
    pub required: bool,
    pub id: Option<&'a str>,
}

impl<'a> TextArea<'a> {
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            value: None,
            placeholder: None,
            rows: None,
            required: false,
            id: None,
        }
    }

    #[must_use]
    pub fn value(mut self, value: &'a str) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    #[must_use]
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }
}

impl Render for TextArea<'_> {
    fn render(&self) -> Markup {
        html! {
            textarea
                name=(self.name)
                placeholder=[self.placeholder]
                rows=[self.rows]
                required[self.required]
                id=[self.id]
            {
                @if let Some(value) = self.value {
                    (value)
                }
            }
        }
    }
}

/// A select dropdown element.
#[derive(Debug)]
pub struct Select<'a> {
    pub name: &'a str,
    pub options: Vec<SelectOption<'a>>,
    pub selected: Option<&'a str>,
    pub id: Option<&'a str>,
}

impl<'a> Select<'a> {
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            options: Vec::new(),
            selected: None,
            id: None,
        }
    }

    #[must_use]
    pub fn option(mut self, value: &'a str, label: &'a str) -> Self {
        self.options.push(SelectOption::new(value, label));
        self
    }

    #[must_use]
    pub fn selected_opt(mut self, selected: Option<&'a str>) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }
}

impl Render for Select<'_> {
    fn render(&self) -> Markup {
        html! {
            select name=(self.name) id=[self.id] {
                @for opt in &self.options {
                    option
                        value=(opt.value)
                        selected[self.selected == Some(opt.value)]
                    {
                        (opt.label)
                    }
                }
            }
        }
    }
}

/// An option for a select element.
#[derive(Debug, Clone)]
pub struct SelectOption<'a> {
    pub value: &'a str,
    pub label: &'a str,
}

impl<'a> SelectOption<'a> {
    #[must_use]
    pub fn new(value: &'a str, label: &'a str) -> Self {
        Self { value, label }
    }
}

/// A form group container for label + input + help text + field error.
#[derive(Debug)]
pub struct FormGroup<'a> {
    /// Label text
    pub label: &'a str,
    /// Input ID (also used for label's `for` attribute)
    pub id: &'a str,
    /// The input element
    pub input: Markup,
    pub help: Option<&'a str>,
    pub error: Option<&'a str>,
}

impl<'a> FormGroup<'a> {
    #[must_use]
    pub fn new(label: &'a str, id: &'a str, input: Markup) -> Self {
        Self {
            label,
            id,
            input,
            help: None,
            error: None,
        }
    }

    #[must_use]
    pub fn help(mut self, help: &'a str) -> Self {
        self.help = Some(help);
        self
    }

    /// Attach a validation error; `None` renders nothing.
    #[must_use]
    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

impl Render for FormGroup<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="form-group" {
                label for=(self.id) { (self.label) }
                (self.input)
                @if let Some(help) = self.help {
                    small { (help) }
                }
                @if let Some(error) = self.error {
                    small class="field-error" { (error) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_multipart() {
        let form = Form::post("/create/", html! {}).multipart();
        let html = form.render().into_string();
        assert!(html.contains(r#"method="post""#));
        assert!(html.contains(r#"enctype="multipart/form-data""#));
    }

    #[test]
    fn test_input_attributes() {
        let html = Input::password("password")
            .id("id_password")
            .required()
            .autocomplete("current-password")
            .render()
            .into_string();
        assert!(html.contains(r#"type="password""#));
        assert!(html.contains(r#"id="id_password""#));
        assert!(html.contains("required"));
        assert!(html.contains(r#"autocomplete="current-password""#));
    }

    #[test]
    fn test_textarea_escapes_value() {
        let html = TextArea::new("text")
            .value("<script>alert(1)</script>")
            .render()
            .into_string();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_select_marks_selected() {
        let html = Select::new("group")
            .option("", "---------")
            .option("3", "Cats")
            .selected_opt(Some("3"))
            .render()
            .into_string();
        assert!(html.contains(r#"<option value="3" selected>Cats</option>"#));
        assert!(html.contains(r#"<option value="">---------</option>"#));
    }

    #[test]
    fn test_form_group_error() {
        let html = FormGroup::new("Text", "id_text", html! {})
            .error(Some("This field is required."))
            .render()
            .into_string();
        assert!(html.contains(r#"<small class="field-error">This field is required.</small>"#));
    }
}
