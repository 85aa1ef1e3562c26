//! Server-rendered survey pages.
//!
//! Each page is one plain HTML document rendered from `templates/survey.html`: a title block, an
//! optional notice, and the form for the session's current section. Every input is a
//! single-line text box; nothing is validated in the browser.

use minijinja::{context, Environment, Value};
use survey_core::questions::{FieldSpec, SECTION_1, SECTION_2};
use survey_core::wire::Page;
use survey_core::{SessionId, SUBMIT_SUCCESS_MESSAGE};

pub const PAGE_TITLE: &str = "Diabetes Health Survey";

const INTRO: &str = "This survey collects important information about your health and diabetes \
management. Your responses provide valuable insights that help us better understand your needs \
and support you effectively in managing diabetes.";

const SURVEY_TEMPLATE: &str = include_str!("../templates/survey.html");

/// Message shown above the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The previous submission was stored.
    Submitted,
    /// Section 2 was posted for a session that has nothing staged.
    SectionOneFirst,
}

impl Notice {
    fn kind(&self) -> &'static str {
        match self {
            Notice::Submitted => "success",
            Notice::SectionOneFirst => "warning",
        }
    }

    fn text(&self) -> &'static str {
        match self {
            Notice::Submitted => SUBMIT_SUCCESS_MESSAGE,
            Notice::SectionOneFirst => {
                "Please complete the first section before submitting medication details."
            }
        }
    }
}

/// Renders the full page for `page` of session `id`.
///
/// The template is an `.html` template, so every interpolated value is HTML-escaped.
pub fn render_page(
    id: &SessionId,
    page: Page,
    notice: Option<Notice>,
) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("survey.html", SURVEY_TEMPLATE)?;

    let (fields, button) = match page {
        Page::Section1 => (SECTION_1, "Next"),
        Page::Section2 => (SECTION_2, "Submit"),
    };

    env.get_template("survey.html")?.render(context! {
        title => PAGE_TITLE,
        intro => INTRO,
        notice => notice.map(|n| context! { kind => n.kind(), text => n.text() }),
        section => page.as_str(),
        session_id => id.to_string(),
        fields => fields.iter().map(field_context).collect::<Vec<_>>(),
        button => button,
    })
}

fn field_context(field: &FieldSpec) -> Value {
    context! {
        key => field.key,
        label => field.label,
        placeholder => field.placeholder,
    }
}
