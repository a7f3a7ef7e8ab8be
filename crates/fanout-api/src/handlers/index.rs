use axum::response::Html;

const INDEX_HTML: &str = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Upload images</title>
  </head>
  <body>
    <form id="upload" action="/uploads/v2" method="post" enctype="multipart/form-data">
      <input type="file" name="files" accept="image/png,image/jpeg,image/webp" multiple>
      <button type="submit">Upload</button>
    </form>
    <progress id="progress" value="0" max="100"></progress>
    <p id="result"></p>
    <script>
      const progress = document.getElementById("progress");
      const result = document.getElementById("result");
      const events = new EventSource("/uploads/progress");
      let session = null;

      events.addEventListener("session", (e) => { session = e.data; });
      events.addEventListener("upload", (e) => {
        const data = JSON.parse(e.data);
        if (data.bytesExpected > 0) {
          progress.value = Math.round((data.bytesReceived / data.bytesExpected) * 100);
        }
      });

      document.getElementById("upload").addEventListener("submit", async (e) => {
        e.preventDefault();
        const headers = session ? { "X-Upload-Session": session } : {};
        const response = await fetch("/uploads/v2", {
          method: "POST",
          headers,
          body: new FormData(e.target),
        });
        result.textContent = await response.text();
      });
    </script>
  </body>
</html>
"#;

/// Minimal upload form wired to the progress stream.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
