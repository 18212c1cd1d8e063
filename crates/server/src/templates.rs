//! Page templates, compiled into the binary.

use axum::response::Html;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use crate::ServerError;

const TEMPLATES: [(&str, &str); 6] = [
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("terms.html", include_str!("../templates/terms.html")),
    ("payment.html", include_str!("../templates/payment.html")),
    ("auth.html", include_str!("../templates/auth.html")),
    ("admin.html", include_str!("../templates/admin.html")),
];

/// Builds the environment; `.html` templates are autoescaped.
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    for (name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

pub fn render(
    env: &Environment<'static>,
    name: &str,
    context: impl Serialize,
) -> Result<Html<String>, ServerError> {
    let html = env.get_template(name)?.render(context)?;
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_templates_compile() {
        let env = environment().unwrap();
        for (name, _) in TEMPLATES {
            assert!(env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn user_text_is_escaped() {
        let env = environment().unwrap();
        let html = render(
            &env,
            "payment.html",
            minijinja::context! { payment => minijinja::context! { name => "<b>Ana</b>" } },
        )
        .unwrap();
        assert!(!html.0.contains("<b>Ana</b>"));
        assert!(html.0.contains("&lt;b&gt;Ana"));
    }
}
