//! Fixture factories for split tests
//!
//! Builders produce panel sources in the standard layout so unit and
//! integration tests do not each hand-roll their own TypeScript strings.

/// The prologue and class opening shared by every fixture.
fn panel_prelude() -> String {
    "import * as vscode from 'vscode';\nimport * as path from 'path';\n\nconst CURRENT_DATA_VERSION = 2;\n\ninterface Block {\n    id: string;\n    text: string;\n}\n\ninterface PanelState {\n    version: number;\n    blocks: Block[];\n}\n\nexport class CanvasPanel {\n    private _state: PanelState | undefined;\n\n".to_string()
}

fn panel_epilogue() -> &'static str {
    "\n\n    public dispose() {\n        this._state = undefined;\n    }\n}\n"
}

/// A standard panel source whose method carries the given region
/// contents.
pub fn panel_source(style: &str, body: &str, script: &str) -> String {
    let mut out = panel_prelude();
    out.push_str("    private _getHtmlContent(): string {\n        return `<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    <title>Panel</title>\n    <style>\n");
    out.push_str(style);
    out.push_str("\n    </style>\n</head>\n<body>\n");
    out.push_str(body);
    out.push_str("\n    <script>\n");
    out.push_str(script);
    out.push_str("\n    </script>\n</body>\n</html>`;\n    }");
    out.push_str(panel_epilogue());
    out
}

/// A panel source with no script element at all.
pub fn panel_source_without_script(style: &str, body: &str) -> String {
    let mut out = panel_prelude();
    out.push_str("    private _getHtmlContent(): string {\n        return `<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    <title>Panel</title>\n    <style>\n");
    out.push_str(style);
    out.push_str("\n    </style>\n</head>\n<body>\n");
    out.push_str(body);
    out.push_str("\n</body>\n</html>`;\n    }");
    out.push_str(panel_epilogue());
    out
}

/// A malformed panel source whose style element sits inside the body, so
/// the style and body regions overlap.
pub fn panel_source_with_style_in_body(style: &str, body: &str) -> String {
    let mut out = panel_prelude();
    out.push_str("    private _getHtmlContent(): string {\n        return `<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <title>Panel</title>\n</head>\n<body>\n    <style>\n");
    out.push_str(style);
    out.push_str("\n    </style>\n");
    out.push_str(body);
    out.push_str("\n</body>\n</html>`;\n    }");
    out.push_str(panel_epilogue());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_carries_the_given_contents() {
        let source = panel_source("A{}", "<p>x</p>", "go()");
        assert!(source.contains("A{}"));
        assert!(source.contains("<p>x</p>"));
        assert!(source.contains("go()"));
        assert!(source.contains("const CURRENT_DATA_VERSION = 2;"));
        assert!(source.contains("public dispose()"));
    }

    #[test]
    fn scriptless_fixture_has_no_script_element() {
        let source = panel_source_without_script("A{}", "<p>x</p>");
        assert!(!source.contains("<script>"));
    }
}
