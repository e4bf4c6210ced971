//! HTML pages served by the upload service.

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
        .upload-form { border: 2px dashed #ccc; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
        .file-input { margin-bottom: 20px; }
        .submit-btn { background: #4CAF50; color: white; padding: 10px 20px; border: none; border-radius: 4px; cursor: pointer; }
        .result { margin-top: 20px; padding: 15px; border-radius: 4px; }
        .success { background: #e8f5e9; color: #2e7d32; }
        .error { background: #ffebee; color: #c62828; }
        .download-btn { background: #1976d2; color: white; padding: 10px 20px; border-radius: 4px; text-decoration: none; display: inline-block; margin-top: 15px; }
        a.back { color: #1976d2; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

pub fn index_page() -> String {
    layout(
        "Medical PDF to CSV Converter",
        r#"    <h1>Medical PDF to CSV Converter</h1>
    <div class="upload-form">
        <form action="/upload" method="post" enctype="multipart/form-data">
            <div class="file-input">
                <input type="file" name="pdf" accept=".pdf,application/pdf" required>
            </div>
            <button type="submit" class="submit-btn">Upload and Convert</button>
        </form>
    </div>"#,
    )
}

/// `file_name` must already be a safe output name
pub fn success_page(file_name: &str, records: usize) -> String {
    layout(
        "Conversion Success",
        &format!(
            r#"    <div class="result success">
        <h2>Conversion Successful!</h2>
        <p>Your PDF has been converted to CSV format ({records} rows).</p>
        <a href="/output/{name}" class="download-btn" download>Download CSV</a>
        <br><br>
        <a href="/" class="back">Convert another file</a>
    </div>"#,
            name = escape_html(file_name)
        ),
    )
}

pub fn error_page(heading: &str, message: &str) -> String {
    layout(
        "Conversion Error",
        &format!(
            r#"    <div class="result error">
        <h2>{heading}</h2>
        <p>{message}</p>
        <a href="/" class="back">Try again</a>
    </div>"#,
            heading = escape_html(heading),
            message = escape_html(message)
        ),
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
