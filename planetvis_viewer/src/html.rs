//! Hand-off of the assembled scene to the browser renderer.
//!
//! The page loads plotly.js and passes it the serialized figure, which
//! carries the markers, frames, buttons and slider.

use crate::error::ViewerError;
use planetvis_core::Scene;
use std::path::Path;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Renders a standalone HTML page showing the scene.
pub fn render_html(scene: &Scene, title: &str) -> Result<String, ViewerError> {
    let figure = escape_script(&scene.to_json()?);
    
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
<style>
html, body {{ margin: 0; height: 100%; background: rgb(17,17,17); }}
#scene {{ width: 100vw; height: 100vh; }}
</style>
</head>
<body>
<div id="scene"></div>
<script>
const figure = {figure};
Plotly.newPlot("scene", figure);
</script>
</body>
</html>
"#,
        title = escape_html(title),
        cdn = PLOTLY_CDN,
        figure = figure,
    ))
}

/// Writes the scene page to `path`.
pub fn write_html(scene: &Scene, title: &str, path: &Path) -> Result<(), ViewerError> {
    let page = render_html(scene, title)?;
    std::fs::write(path, page).map_err(|e| ViewerError::output(path, e))?;
    tracing::info!("Wrote interactive scene to {:?}", path);
    Ok(())
}

/// Writes the raw figure JSON to `path`.
pub fn write_json(scene: &Scene, path: &Path) -> Result<(), ViewerError> {
    let json = serde_json::to_string_pretty(scene)?;
    std::fs::write(path, json).map_err(|e| ViewerError::output(path, e))?;
    tracing::info!("Wrote figure JSON to {:?}", path);
    Ok(())
}

/// Escapes markup characters in JSON bound for a `<script>` block.
///
/// These characters only occur inside JSON strings, where `\u003c` and
/// friends decode to the same text, so no `</script>` or `<!--` survives.
fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
