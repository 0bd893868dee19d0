//! Admin dashboard listing every submission

use std::fmt::Write;

use super::{banner_script, escape_html, page};
use crate::types::Submission;

const DASHBOARD_STYLE: &str = r#"
  .wrap { max-width: 80rem; margin: 0 auto; padding: 1.5rem; }
  .top { display: flex; flex-wrap: wrap; justify-content: space-between; align-items: center; margin-bottom: 2rem; gap: 1rem; }
  .top h1 { margin: 0; font-size: 1.875rem; }
  .count { padding: .25rem .75rem; border-radius: 9999px; font-size: .875rem; background: #dbeafe; color: #1e40af; }
  .empty { text-align: center; padding: 3rem 0; }
  .empty h3 { margin: 0; font-size: 1.125rem; }
  .empty p { margin: .25rem 0 0; font-size: .875rem; color: #6b7280; }
  .table-card { background: #fff; border-radius: .75rem; border: 1px solid #e5e7eb; overflow-x: auto; }
  table { width: 100%; border-collapse: collapse; }
  th { background: #f9fafb; text-align: left; padding: .75rem 1.5rem; font-size: .75rem; font-weight: 500;
       color: #6b7280; text-transform: uppercase; letter-spacing: .05em; }
  th.actions, td.actions { text-align: right; }
  td { padding: 1rem 1.5rem; border-top: 1px solid #e5e7eb; font-size: .875rem; white-space: nowrap; }
  tr:hover td { background: #f9fafb; }
  .muted { color: #6b7280; }
  .chips { display: flex; flex-wrap: wrap; gap: .25rem; max-width: 20rem; }
  .chip { padding: .125rem .625rem; border-radius: 9999px; font-size: .75rem; font-weight: 500; }
  .chip.doc { background: #dbeafe; color: #1e40af; }
  .chip.img { background: #f3e8ff; color: #6b21a8; }
  .download { padding: .375rem .75rem; font-size: .75rem; }
"#;

const DASHBOARD_SCRIPT: &str = r#"
document.querySelectorAll('time[datetime]').forEach((el) => {
  el.textContent = new Date(el.getAttribute('datetime')).toLocaleString();
});

const CRC_TABLE = (() => {
  const table = new Uint32Array(256);
  for (let n = 0; n < 256; n++) {
    let c = n;
    for (let k = 0; k < 8; k++) c = c & 1 ? 0xedb88320 ^ (c >>> 1) : c >>> 1;
    table[n] = c >>> 0;
  }
  return table;
})();

function crc32(bytes) {
  let c = 0xffffffff;
  for (let i = 0; i < bytes.length; i++) c = CRC_TABLE[(c ^ bytes[i]) & 0xff] ^ (c >>> 8);
  return (c ^ 0xffffffff) >>> 0;
}

// Stored (uncompressed) zip; entries are { name, data: Uint8Array }
function packZip(entries) {
  const encoder = new TextEncoder();
  const parts = [];
  const central = [];
  let offset = 0;

  for (const entry of entries) {
    const name = encoder.encode(entry.name);
    const data = entry.data;
    const crc = crc32(data);

    const local = new DataView(new ArrayBuffer(30));
    local.setUint32(0, 0x04034b50, true);
    local.setUint16(4, 20, true);
    local.setUint16(6, 0x0800, true);
    local.setUint16(12, 0x21, true);
    local.setUint32(14, crc, true);
    local.setUint32(18, data.length, true);
    local.setUint32(22, data.length, true);
    local.setUint16(26, name.length, true);
    parts.push(local, name, data);

    const header = new DataView(new ArrayBuffer(46));
    header.setUint32(0, 0x02014b50, true);
    header.setUint16(4, 20, true);
    header.setUint16(6, 20, true);
    header.setUint16(8, 0x0800, true);
    header.setUint16(14, 0x21, true);
    header.setUint32(16, crc, true);
    header.setUint32(20, data.length, true);
    header.setUint32(24, data.length, true);
    header.setUint16(28, name.length, true);
    header.setUint32(38, entry.name.endsWith('/') ? 0x10 : 0, true);
    header.setUint32(42, offset, true);
    central.push(header, name);

    offset += 30 + name.length + data.length;
  }

  const centralSize = central.reduce((n, part) => n + part.byteLength, 0);
  const end = new DataView(new ArrayBuffer(22));
  end.setUint32(0, 0x06054b50, true);
  end.setUint16(8, entries.length, true);
  end.setUint16(10, entries.length, true);
  end.setUint32(12, centralSize, true);
  end.setUint32(16, offset, true);

  return new Blob([...parts, ...central, end], { type: 'application/zip' });
}

function filenames(value) {
  return value ? value.split(',').filter((f) => f.length > 0) : [];
}

// One request per file; the first failure aborts the whole archive
async function gatherFiles(folder, documents, images) {
  const wanted = [
    ...documents.map((file) => ['documents', file]),
    ...images.map((file) => ['images', file]),
  ];

  return Promise.all(wanted.map(async ([dir, file]) => {
    const response = await fetch('/api/download?file=' + encodeURIComponent(file));
    if (!response.ok) throw new Error('Failed to fetch ' + file);
    return { name: folder + '/' + dir + '/' + file, data: new Uint8Array(await response.arrayBuffer()) };
  }));
}

document.querySelectorAll('button.download').forEach((button) => {
  button.addEventListener('click', async () => {
    const name = button.dataset.name;
    const folder = name.replace(/[^a-z0-9]/gi, '_') || 'submission';
    button.disabled = true;
    button.textContent = 'Preparing';

    try {
      const files = await gatherFiles(
        folder,
        filenames(button.dataset.documents),
        filenames(button.dataset.images),
      );
      const blob = packZip([{ name: folder + '/', data: new Uint8Array(0) }, ...files]);

      const url = URL.createObjectURL(blob);
      const a = document.createElement('a');
      a.href = url;
      a.download = name + '_submission.zip';
      document.body.appendChild(a);
      a.click();
      document.body.removeChild(a);
      URL.revokeObjectURL(url);

      showBanner('success', 'Downloaded ' + name + "'s files successfully!");
    } catch (err) {
      showBanner('error', 'Download failed: ' + (err.message || 'Unknown error'));
    } finally {
      button.disabled = false;
      button.textContent = 'Download';
    }
  });
});
"#;

/// Render the dashboard for `submissions` (already in creation order)
pub fn render_dashboard(submissions: &[Submission], banner_timeout_ms: u64) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<div class="wrap">
  <div class="top">
    <h1>Form Submissions Dashboard</h1>
    <span class="count">{} submissions</span>
  </div>
  <div id="error" class="banner error hidden"></div>
  <div id="success" class="banner success hidden"></div>
"#,
        submissions.len()
    );

    if submissions.is_empty() {
        body.push_str(
            r#"  <div class="empty">
    <h3>No submissions yet</h3>
    <p>Submitted forms will appear here</p>
  </div>
"#,
        );
    } else {
        body.push_str(
            r#"  <div class="table-card">
  <table>
    <thead>
      <tr><th>ID</th><th>Name</th><th>Email</th><th>Documents</th><th>Images</th><th>Submitted</th><th class="actions">Actions</th></tr>
    </thead>
    <tbody>
"#,
        );
        for submission in submissions {
            render_row(&mut body, submission);
        }
        body.push_str("    </tbody>\n  </table>\n  </div>\n");
    }

    body.push_str("</div>\n");
    let _ = write!(
        body,
        "<script>{}{DASHBOARD_SCRIPT}</script>",
        banner_script(banner_timeout_ms)
    );

    page("Form Submissions Dashboard", DASHBOARD_STYLE, &body)
}

fn render_row(out: &mut String, submission: &Submission) {
    let name = escape_html(&submission.name);

    let _ = write!(
        out,
        r#"      <tr>
        <td>{id}</td>
        <td>{name}</td>
        <td class="muted">{email}</td>
        <td><div class="chips">{documents}</div></td>
        <td><div class="chips">{images}</div></td>
        <td class="muted"><time datetime="{created}">{created_display}</time></td>
        <td class="actions"><button class="btn download" data-name="{name}" data-documents="{document_list}" data-images="{image_list}">Download</button></td>
      </tr>
"#,
        id = submission.id,
        email = escape_html(&submission.email),
        documents = chips(&submission.documents, "doc"),
        images = chips(&submission.images, "img"),
        document_list = escape_html(&submission.documents.join(",")),
        image_list = escape_html(&submission.images.join(",")),
        created = submission.created_at.to_rfc3339(),
        created_display = submission.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
}

fn chips(filenames: &[String], class: &str) -> String {
    filenames
        .iter()
        .map(|f| format!(r#"<span class="chip {}">{}</span>"#, class, escape_html(f)))
        .collect()
}
