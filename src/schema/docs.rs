use minijinja::{context, Environment};

use super::SchemaError;

const VIEWER_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{{ title }}</title>
  {% if icon %}<link rel="icon" href="{{ icon }}" />{% endif %}
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({
        url: {{ spec_url|tojson }},
        dom_id: "#swagger-ui",
      });
    };
  </script>
</body>
</html>
"##;

/// Render the HTML viewer page pointing at `spec_url`.
///
/// # Errors
///
/// [`SchemaError::Render`] if the template fails to render.
pub fn render_docs_page(
    spec_url: &str,
    title: &str,
    icon: Option<&str>,
) -> Result<String, SchemaError> {
    let mut env = Environment::new();
    env.add_template("swagger_ui.html", VIEWER_TEMPLATE)
        .map_err(|e| SchemaError::Render(e.to_string()))?;
    let tmpl = env
        .get_template("swagger_ui.html")
        .map_err(|e| SchemaError::Render(e.to_string()))?;
    tmpl.render(context! { spec_url, title, icon })
        .map_err(|e| SchemaError::Render(e.to_string()))
}
