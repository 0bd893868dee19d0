//! Public intake form

use super::{banner_script, page};

const FORM_STYLE: &str = r#"
  .wrap { max-width: 28rem; margin: 3rem auto; padding: 0 1rem; }
  .card { background: #fff; border-radius: 1rem; box-shadow: 0 20px 25px -5px rgba(0,0,0,.1); overflow: hidden; }
  .card header { background: linear-gradient(90deg, #2563eb, #9333ea); color: #fff; padding: 1.5rem; }
  .card header h1 { margin: 0; font-size: 1.5rem; }
  .card header p { margin: .25rem 0 0; color: #dbeafe; }
  form { padding: 1.5rem; }
  label.field { display: block; font-size: .875rem; font-weight: 500; color: #374151; margin: 1rem 0 .25rem; }
  input[type=text], input[type=email], input[type=tel] {
    width: 100%; padding: .75rem 1rem; border: 1px solid #d1d5db; border-radius: .5rem; font-size: 1rem; }
  .drop { display: block; border: 2px dashed #d1d5db; border-radius: .5rem; padding: 1.5rem 1rem;
          text-align: center; cursor: pointer; color: #374151; font-size: .875rem; }
  .drop:hover { border-color: #60a5fa; }
  .drop input { display: none; }
  button[type=submit] { width: 100%; margin-top: 1.5rem; padding: .75rem 1rem; border-radius: .5rem; font-size: .875rem; }
  .admin-link { display: block; text-align: center; margin-top: 1rem; color: #2563eb; font-size: .875rem; text-decoration: none; }
"#;

const FORM_BODY: &str = r#"
<div class="wrap">
  <div class="card">
    <header>
      <h1>Personal Details Form</h1>
      <p>Please fill in your information</p>
    </header>
    <form id="intake-form" action="/api/submit" method="post" enctype="multipart/form-data">
      <div id="success" class="banner success hidden"></div>
      <div id="error" class="banner error hidden"></div>

      <label class="field" for="name">Full Name</label>
      <input type="text" id="name" name="name" required>

      <label class="field" for="email">Email</label>
      <input type="email" id="email" name="email" required>

      <label class="field" for="phone">Phone Number</label>
      <input type="tel" id="phone" name="phone" required>

      <span class="field">Documents</span>
      <label class="drop">
        <input type="file" id="documents" name="documents" multiple>
        <span id="documents-label">Click to upload documents</span>
      </label>

      <span class="field">Images</span>
      <label class="drop">
        <input type="file" id="images" name="images" multiple accept="image/*">
        <span id="images-label">Click to upload images</span>
      </label>

      <button type="submit" class="btn" id="submit">Submit Form</button>
      <a class="admin-link" href="/admin">View Admin Dashboard &rarr;</a>
    </form>
  </div>
</div>
"#;

const FORM_SCRIPT: &str = r#"
const form = document.getElementById('intake-form');
const submit = document.getElementById('submit');

function describeSelection(input, noun, empty) {
  const label = document.getElementById(input.id + '-label');
  label.textContent = input.files.length > 0 ? input.files.length + ' ' + noun + ' selected' : empty;
}

const documentsInput = document.getElementById('documents');
const imagesInput = document.getElementById('images');
documentsInput.addEventListener('change', () => describeSelection(documentsInput, 'file(s)', 'Click to upload documents'));
imagesInput.addEventListener('change', () => describeSelection(imagesInput, 'image(s)', 'Click to upload images'));

form.addEventListener('submit', async (event) => {
  event.preventDefault();
  submit.disabled = true;
  submit.textContent = 'Processing...';

  try {
    const response = await fetch('/api/submit', { method: 'POST', body: new FormData(form) });
    if (!response.ok) {
      let message = 'Submission failed';
      try { message = (await response.json()).error || message; } catch (_) {}
      throw new Error(message);
    }

    form.reset();
    describeSelection(documentsInput, 'file(s)', 'Click to upload documents');
    describeSelection(imagesInput, 'image(s)', 'Click to upload images');
    showBanner('success', 'Form submitted successfully!');
  } catch (err) {
    showBanner('error', err.message || 'Unknown error');
  } finally {
    submit.disabled = false;
    submit.textContent = 'Submit Form';
  }
});
"#;

/// Render the intake form page
pub fn render_form(banner_timeout_ms: u64) -> String {
    let body = format!(
        "{FORM_BODY}<script>{}{FORM_SCRIPT}</script>",
        banner_script(banner_timeout_ms)
    );
    page("Personal Details Form", FORM_STYLE, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_fields_present() {
        let html = render_form(3000);
        for field in [r#"name="name""#, r#"name="email""#, r#"name="phone""#] {
            assert!(html.contains(field), "missing {field}");
        }
        assert!(html.contains(r#"name="documents" multiple"#));
        assert!(html.contains(r#"accept="image/*""#));
        assert!(html.contains("setTimeout(() => el.classList.add('hidden'), 3000)"));
    }
}
